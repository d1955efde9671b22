//! Self-update layer
//!
//! This module resolves the latest published release, decides whether it is
//! newer than the running version, and downloads and verifies the installer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│   Version   │     │ Downloader  │────▶│   Verify    │
//! │  (latest)   │     │  (compare)  │     │  (stream)   │     │  (sha512)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        ▼                                       │
//! ┌─────────────┐                         ┌─────────────┐
//! │   Sources   │                         │   Checker   │
//! │  (GitHub)   │                         │ (workflow)  │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: `UpdateChecker`, the check → download → verify workflow
//! - [`downloader`]: Streaming download with bounded redirects and cleanup
//! - [`error`]: Error type shared by every stage
//! - [`release`]: Release metadata, descriptors and asset naming
//! - [`resolver`]: Selects the newer release and the asset for this platform
//! - [`source`]: Trait for fetching release metadata
//! - [`sources`]: Concrete release sources (GitHub Releases)
//! - [`verify`]: SHA-512 integrity checks
//! - [`version`]: Dotted version parsing and comparison

pub mod checker;
pub mod downloader;
pub mod error;
pub mod release;
pub mod resolver;
pub mod source;
pub mod sources;
pub mod verify;
pub mod version;

pub use checker::UpdateChecker;
pub use error::UpdateError;
pub use release::ReleaseDescriptor;
