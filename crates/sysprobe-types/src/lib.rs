use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable snapshot of the machine under inspection, as produced by the
/// detection backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Raw platform name (e.g. "redhat"). Legacy backends may report
    /// mixed-case or space-separated names.
    pub name: String,
    /// Ancestor families, most specific first (e.g. `["redhat", "fedora", "linux", "unix"]`).
    #[serde(default, alias = "families")]
    pub family_hierarchy: Vec<String>,
    /// Release version string, absent when the backend could not determine one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default)]
    pub arch: String,
}

/// Canonical semantic key of a single support constraint.
///
/// Underscore and hyphen spellings, as well as the `os_*`/`platform_*`
/// prefixes, collapse onto the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKey {
    /// Framework version gate; accepted and ignored.
    Inspec,
    /// `os_family`, `os-family`, `platform_family`, `platform-family`
    Family,
    /// `os`, `platform`
    Platform,
    /// `os_name`, `os-name`, `platform_name`, `platform-name`
    Name,
    Release,
    /// Any unrecognised key. Never satisfied.
    Unknown(String),
}

impl ConstraintKey {
    /// Resolve a declared key spelling to its canonical variant.
    pub fn resolve(raw: &str) -> Self {
        match raw {
            "inspec" => Self::Inspec,
            "os_family" | "os-family" | "platform_family" | "platform-family" => Self::Family,
            "os" | "platform" => Self::Platform,
            "os_name" | "os-name" | "platform_name" | "platform-name" => Self::Name,
            "release" => Self::Release,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Inspec => "inspec",
            Self::Family => "platform_family",
            Self::Platform => "platform",
            Self::Name => "platform_name",
            Self::Release => "release",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ConstraintKey {
    fn from(raw: &str) -> Self {
        Self::resolve(raw)
    }
}

impl From<String> for ConstraintKey {
    fn from(raw: String) -> Self {
        Self::resolve(&raw)
    }
}

impl From<&ConstraintKey> for ConstraintKey {
    fn from(key: &ConstraintKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value returned by a key lookup on a platform identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Errors raised while ingesting platform or constraint data from outside
/// the process. Matching itself is total and never produces one.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to read config at {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("No [platform] table in config")]
    MissingPlatform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_aliases_resolve_to_one_key() {
        for raw in ["os_family", "os-family", "platform_family", "platform-family"] {
            assert_eq!(ConstraintKey::resolve(raw), ConstraintKey::Family, "{raw}");
        }
    }

    #[test]
    fn name_and_platform_aliases() {
        for raw in ["os_name", "os-name", "platform_name", "platform-name"] {
            assert_eq!(ConstraintKey::resolve(raw), ConstraintKey::Name, "{raw}");
        }
        assert_eq!(ConstraintKey::resolve("os"), ConstraintKey::Platform);
        assert_eq!(ConstraintKey::resolve("platform"), ConstraintKey::Platform);
        assert_eq!(ConstraintKey::resolve("release"), ConstraintKey::Release);
        assert_eq!(ConstraintKey::resolve("inspec"), ConstraintKey::Inspec);
    }

    #[test]
    fn unknown_key_keeps_spelling() {
        let key = ConstraintKey::resolve("os-version");
        assert_eq!(key, ConstraintKey::Unknown("os-version".into()));
        assert_eq!(key.to_string(), "os-version");
    }

    #[test]
    fn key_resolution_is_case_sensitive() {
        assert!(matches!(ConstraintKey::resolve("OS"), ConstraintKey::Unknown(_)));
    }

    #[test]
    fn descriptor_accepts_families_alias() {
        let json = r#"{"name":"ubuntu","families":["debian","linux","unix"],"arch":"aarch64"}"#;
        let d: PlatformDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.family_hierarchy, vec!["debian", "linux", "unix"]);
        assert_eq!(d.release, None);
        assert_eq!(d.arch, "aarch64");
    }

    #[test]
    fn attribute_value_display() {
        assert_eq!(AttributeValue::Text("7.4".into()).to_string(), "7.4");
        let list = AttributeValue::List(vec!["linux".into(), "unix".into()]);
        assert_eq!(list.to_string(), "linux, unix");
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));
        assert!(list.as_text().is_none());
    }

    #[test]
    fn probe_error_display() {
        let err = ProbeError::ConfigRead {
            path: PathBuf::from("/etc/sysprobe.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/etc/sysprobe.toml"));
        assert!(ProbeError::ConfigParse("bad".into()).to_string().contains("bad"));
        assert!(ProbeError::MissingPlatform.to_string().contains("[platform]"));
    }
}
