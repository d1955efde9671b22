//! SHA-512 integrity checks for downloaded installers

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha512};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::warn;

/// Outcome of checking a file against an expected digest
#[derive(Debug)]
pub enum Verification {
    Match,
    Mismatch { actual: String },
    Unreadable(std::io::Error),
}

impl Verification {
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }
}

/// Base64 SHA-512 of the whole file
pub async fn digest_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha512::new();
    let mut buffer = vec![0; 64 * 1024];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(STANDARD.encode(hasher.finalize()))
}

/// Compare the file's base64 SHA-512 with `expected`, byte for byte
pub async fn check(path: &Path, expected: &str) -> Verification {
    match digest_file(path).await {
        Ok(actual) if actual == expected => Verification::Match,
        Ok(actual) => Verification::Mismatch { actual },
        Err(e) => {
            warn!("Failed to read {:?} for verification: {}", path, e);
            Verification::Unreadable(e)
        }
    }
}

/// True only when the file is readable and its digest equals `expected`
pub async fn verify(path: &Path, expected: &str) -> bool {
    check(path, expected).await.is_match()
}
