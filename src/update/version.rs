//! Dotted version parsing and comparison

use std::fmt;

/// `major.minor.patch` key used to order release versions.
///
/// This is deliberately looser than semver: pre-release tags, build metadata
/// and any fourth segment are not distinguished from the numeric prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTriple {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTriple {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string, coercing missing or non-numeric segments to 0.
    ///
    /// Examples:
    /// - "v1.2.3" -> (1, 2, 3)
    /// - "1.2" -> (1, 2, 0)
    /// - "1.x.3" -> (1, 0, 3)
    /// - "1.2.3-beta.1" -> (1, 2, 3)
    pub fn parse(version: &str) -> Self {
        let mut segments = strip_v_prefix(version.trim())
            .split('.')
            .map(numeric_prefix);

        let mut next = || segments.next().unwrap_or(0);
        Self::new(next(), next(), next())
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Leading digits of a segment, or 0 when there are none.
/// Values too large for `u64` saturate to `u64::MAX`.
fn numeric_prefix(segment: &str) -> u64 {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    if end == 0 {
        return 0;
    }
    segment[..end].parse().unwrap_or(u64::MAX)
}

/// Strip a single leading `v` from a tag (`v1.2.3` -> `1.2.3`)
pub fn strip_v_prefix(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Returns true iff `candidate` is strictly newer than `current`
pub fn is_newer(current: &str, candidate: &str) -> bool {
    VersionTriple::parse(candidate) > VersionTriple::parse(current)
}
