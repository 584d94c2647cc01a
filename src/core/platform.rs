//! Supported platforms and their minimum deployment versions.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// An operating system a package can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "iOS")]
    Ios,
    #[serde(alias = "macOS", alias = "osx")]
    Macos,
    #[serde(alias = "tvOS")]
    Tvos,
    #[serde(alias = "watchOS")]
    Watchos,
    #[serde(alias = "macCatalyst")]
    Maccatalyst,
    Linux,
}

impl Platform {
    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Macos => "macOS",
            Platform::Tvos => "tvOS",
            Platform::Watchos => "watchOS",
            Platform::Maccatalyst => "Mac Catalyst",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A minimum version constraint for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRequirement {
    pub platform: Platform,
    pub min_version: Version,
}

impl fmt::Display for PlatformRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.min_version;
        if v.patch == 0 {
            write!(f, "{} {}.{}", self.platform, v.major, v.minor)
        } else {
            write!(f, "{} {}", self.platform, v)
        }
    }
}

/// Parse a deployment or tools version leniently.
///
/// Accepts `11`, `v11`, `11.0`, and `13.4.1`; missing components are zero.
pub fn parse_version(text: &str) -> Option<Version> {
    let text = text.trim();
    let text = text
        .strip_prefix('v')
        .or_else(|| text.strip_prefix('V'))
        .unwrap_or(text);

    let parts: Vec<&str> = text.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_forms() {
        assert_eq!(parse_version("11"), Some(Version::new(11, 0, 0)));
        assert_eq!(parse_version("v11"), Some(Version::new(11, 0, 0)));
        assert_eq!(parse_version("13.4"), Some(Version::new(13, 4, 0)));
        assert_eq!(parse_version(" 13.4.1 "), Some(Version::new(13, 4, 1)));
    }

    #[test]
    fn test_parse_version_rejects_garbage() {
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("eleven"), None);
        assert_eq!(parse_version("11."), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("-1"), None);
    }

    #[test]
    fn test_requirement_display() {
        let req = PlatformRequirement {
            platform: Platform::Ios,
            min_version: Version::new(11, 0, 0),
        };
        assert_eq!(req.to_string(), "iOS 11.0");
    }
}
