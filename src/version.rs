//! Release metadata and version comparison for the update banner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Latest published release, as reported by the release feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag, e.g. `v1.5.0`
    #[serde(rename = "tag_name")]
    pub tag: String,
    #[serde(rename = "html_url")]
    pub url: String,
}

impl ReleaseInfo {
    /// The tag without its leading `v`.
    pub fn version(&self) -> &str {
        strip_tag_prefix(&self.tag)
    }
}

/// A `MAJOR.MINOR.PATCH` triple compared numerically, component by component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    /// Parses `1.4.0` or `v1.4.0`. Missing minor/patch components count as 0;
    /// a pre-release or build suffix on the patch component is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = strip_tag_prefix(text.trim());
        let mut parts = text.split('.');

        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(p) => leading_number(p)?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn strip_tag_prefix(tag: &str) -> &str {
    tag.strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag)
}

fn leading_number(part: &str) -> Option<u64> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part.get(..end)?.parse().ok()
}

/// `1.5.0-rc1` is a pre-release; `1.5.0+build.7` is not.
pub fn is_prerelease(version: &str) -> bool {
    version
        .split('+')
        .next()
        .is_some_and(|core| core.contains('-'))
}

/// Returns the release version (without `v`) when it is strictly newer than
/// `current`. Pre-release and unparseable versions never count as newer.
pub fn newer_release(current: &str, release: &ReleaseInfo) -> Option<String> {
    if is_prerelease(release.version()) {
        return None;
    }
    let current = SemVer::parse(current)?;
    let latest = SemVer::parse(&release.tag)?;
    (latest > current).then(|| release.version().to_string())
}

#[cfg(test)]
#[path = "tests/version_tests.rs"]
mod tests;
