//! Version diagnostics printed once the runtime is up.

use core::fmt::{self, Display, Formatter};

use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionError {
    Empty,
    MissingComponent,
    InvalidNumber,
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::Empty => f.write_str("empty version string"),
            VersionError::MissingComponent => f.write_str("expected major.minor.patch"),
            VersionError::InvalidNumber => f.write_str("version component is not a number"),
        }
    }
}

impl Version {
    /// Parse `major.minor.patch`, ignoring any `-pre` or `+build` suffix.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VersionError::Empty);
        }
        let core = text
            .split(|c| c == '-' || c == '+')
            .next()
            .unwrap_or(text);

        let mut parts = core.split('.');
        let mut next = || -> Result<u16, VersionError> {
            parts
                .next()
                .ok_or(VersionError::MissingComponent)?
                .parse()
                .map_err(|_| VersionError::InvalidNumber)
        };
        let version = Version {
            major: next()?,
            minor: next()?,
            patch: next()?,
        };
        if parts.next().is_some() {
            return Err(VersionError::InvalidNumber);
        }
        Ok(version)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.major, self.minor, self.patch)
    }
}

/// Log `<name>: major minor patch` for each entry.
///
/// Entries that fail to parse are skipped, the first error is returned.
pub fn log_versions(entries: &[(&str, &str)]) -> Result<(), VersionError> {
    let mut first_error = None;
    for (name, text) in entries {
        match Version::parse(text) {
            Ok(version) => info!("{}: {}", name, version),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_parse() {
        assert_eq!(
            Version::parse("1.12.1"),
            Ok(Version {
                major: 1,
                minor: 12,
                patch: 1
            })
        );
        assert_eq!(
            Version::parse(" 8.3.7-dev+abc "),
            Ok(Version {
                major: 8,
                minor: 3,
                patch: 7
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        assert_eq!(Version::parse("1.2"), Err(VersionError::MissingComponent));
        assert_eq!(Version::parse("1.x.2"), Err(VersionError::InvalidNumber));
        assert_eq!(Version::parse("1.2.3.4"), Err(VersionError::InvalidNumber));
    }

    #[test]
    fn test_display_matches_runtime_banner() {
        let version = Version::parse("8.3.7").unwrap();
        assert_eq!(format!("{}", version), "8 3 7");
    }

    #[test]
    fn test_log_versions_reports_first_error() {
        assert_eq!(log_versions(&[("slint", "1.12.1")]), Ok(()));
        assert_eq!(
            log_versions(&[("slint", "1.12.1"), ("firmware", "1.0"), ("x", "")]),
            Err(VersionError::MissingComponent)
        );
    }
}
