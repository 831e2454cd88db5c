//! Cache bucket naming.
//!
//! Bucket names are the only persisted format the router owns:
//! `{prefix}-{kind}-v{version}`. Anything starting with `{prefix}-` belongs
//! to this application; of those, only the three names for the running
//! version are current.

use std::fmt;

use crate::version::Version;

/// The three bucket kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    /// Precached app shell, filled on install.
    Static,
    /// Pages and miscellaneous GET responses.
    Dynamic,
    /// API responses.
    Api,
}

impl BucketKind {
    pub const ALL: [BucketKind; 3] = [Self::Static, Self::Dynamic, Self::Api];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket names for one application prefix and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNames {
    prefix: String,
    static_name: String,
    dynamic_name: String,
    api_name: String,
}

impl BucketNames {
    pub fn new(prefix: &str, version: &Version) -> Self {
        let name = |kind: BucketKind| format!("{}-{}-v{}", prefix, kind, version);
        Self {
            prefix: prefix.to_string(),
            static_name: name(BucketKind::Static),
            dynamic_name: name(BucketKind::Dynamic),
            api_name: name(BucketKind::Api),
        }
    }

    /// Current bucket name for `kind`.
    pub fn name(&self, kind: BucketKind) -> &str {
        match kind {
            BucketKind::Static => &self.static_name,
            BucketKind::Dynamic => &self.dynamic_name,
            BucketKind::Api => &self.api_name,
        }
    }

    /// All three current names, static first.
    pub fn current(&self) -> [&str; 3] {
        [&self.static_name, &self.dynamic_name, &self.api_name]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.current().contains(&name)
    }

    /// Whether a bucket belongs to this application (any version).
    pub fn is_owned(&self, name: &str) -> bool {
        name.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }

    /// Owned by this application but not one of the current names.
    pub fn is_stale(&self, name: &str) -> bool {
        self.is_owned(name) && !self.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(version: &str) -> BucketNames {
        BucketNames::new("app", &Version::new(version).unwrap())
    }

    #[test]
    fn test_naming_convention() {
        let names = names("2");
        assert_eq!(names.name(BucketKind::Static), "app-static-v2");
        assert_eq!(names.name(BucketKind::Dynamic), "app-dynamic-v2");
        assert_eq!(names.name(BucketKind::Api), "app-api-v2");
        assert_eq!(
            names.current(),
            ["app-static-v2", "app-dynamic-v2", "app-api-v2"]
        );
    }

    #[test]
    fn test_ownership() {
        let names = names("2");
        assert!(names.is_owned("app-static-v1"));
        assert!(names.is_owned("app-static-v2"));
        assert!(!names.is_owned("unrelated-other-cache"));
        assert!(!names.is_owned("application-cache"));
        assert!(!names.is_owned("app"));
    }

    #[test]
    fn test_staleness() {
        let names = names("2");
        assert!(names.is_stale("app-static-v1"));
        assert!(names.is_stale("app-api-v1"));
        assert!(!names.is_stale("app-api-v2"));
        assert!(!names.is_stale("workbox-precache"));
    }
}
