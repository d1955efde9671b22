//! Test helpers for update flow tests

pub mod release;

pub use release::*;
