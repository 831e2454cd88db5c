//! Build version used to scope cache bucket names.

use std::fmt;

use crate::error::VersionError;

/// Opaque identifier of one deployed build.
///
/// Constant for the lifetime of a worker instance; a new deploy installs a
/// new worker with a new version, which is what invalidates old buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Result<Self, VersionError> {
        let version = version.into();
        if version.is_empty() {
            return Err(VersionError::Empty);
        }
        if version.chars().any(char::is_whitespace) {
            return Err(VersionError::Whitespace(version));
        }
        Ok(Self(version))
    }

    /// Version derived from a build timestamp in milliseconds since the epoch.
    pub fn from_unix_millis(millis: u128) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert_eq!(Version::new(""), Err(VersionError::Empty));
        assert!(matches!(
            Version::new("1 2"),
            Err(VersionError::Whitespace(_))
        ));
    }

    #[test]
    fn test_from_unix_millis() {
        let version = Version::from_unix_millis(1_760_745_600_000);
        assert_eq!(version.as_str(), "1760745600000");
        assert_eq!("2".parse::<Version>().unwrap().to_string(), "2");
    }
}
