//! Release source implementations

pub mod github;

pub use github::GitHubReleaseSource;
