//! Probe configuration – reads `sysprobe.toml`.
//!
//! ```toml
//! [platform]
//! name = "redhat"
//! families = ["redhat", "fedora", "linux", "unix"]
//! release = "7.4"
//! arch = "x86_64"
//!
//! [[supports]]
//! os_family = "unix"
//!
//! [[supports]]
//! os_name = "windows"
//! release = "10.*"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use sysprobe_platform::SupportSpecification;
use sysprobe_types::{PlatformDescriptor, ProbeError};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "sysprobe.toml";

/// Parsed contents of a probe config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeConfig {
    /// Detected platform, as reported by the detection backend.
    #[serde(default)]
    pub platform: Option<PlatformDescriptor>,

    /// Support constraints; absent means supported everywhere.
    #[serde(default)]
    pub supports: SupportSpecification,
}

impl ProbeConfig {
    /// The platform descriptor, or [`ProbeError::MissingPlatform`].
    pub fn platform(&self) -> Result<&PlatformDescriptor, ProbeError> {
        self.platform.as_ref().ok_or(ProbeError::MissingPlatform)
    }
}

/// Parse a config from TOML text.
pub fn parse(raw: &str) -> Result<ProbeConfig, ProbeError> {
    toml::from_str(raw).map_err(|e| ProbeError::ConfigParse(e.to_string()))
}

/// Load a config from `path` and apply `SYSPROBE_*` overrides from the
/// process environment.
pub fn load_from(path: &Path) -> Result<ProbeConfig, ProbeError> {
    let raw = fs::read_to_string(path).map_err(|source| ProbeError::ConfigRead {
        path: PathBuf::from(path),
        source,
    })?;
    let mut cfg = parse(&raw)?;
    if let Some(platform) = cfg.platform.as_mut() {
        apply_overrides(platform, |k| std::env::var(k).ok());
    }
    Ok(cfg)
}

/// Patch `platform` from `lookup` (normally the process environment).
///
/// | Variable | Field |
/// |---|---|
/// | `SYSPROBE_PLATFORM_NAME` | `name` |
/// | `SYSPROBE_PLATFORM_RELEASE` | `release` |
/// | `SYSPROBE_PLATFORM_ARCH` | `arch` |
/// | `SYSPROBE_PLATFORM_FAMILIES` | `family_hierarchy` (comma separated) |
pub fn apply_overrides(platform: &mut PlatformDescriptor, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SYSPROBE_PLATFORM_NAME") {
        platform.name = v;
    }
    if let Some(v) = lookup("SYSPROBE_PLATFORM_RELEASE") {
        platform.release = Some(v);
    }
    if let Some(v) = lookup("SYSPROBE_PLATFORM_ARCH") {
        platform.arch = v;
    }
    if let Some(v) = lookup("SYSPROBE_PLATFORM_FAMILIES") {
        platform.family_hierarchy = v
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use sysprobe_types::ConstraintKey;

    const SAMPLE: &str = r#"
[platform]
name = "redhat"
families = ["redhat", "fedora", "linux", "unix"]
release = "7.4"
arch = "x86_64"

[[supports]]
os_name = "centos"

[[supports]]
os-family = "unix"
release = "7.*"
"#;

    #[test]
    fn parse_sample() {
        let cfg = parse(SAMPLE).unwrap();
        let platform = cfg.platform().unwrap();
        assert_eq!(platform.name, "redhat");
        assert_eq!(platform.family_hierarchy.len(), 4);
        assert_eq!(platform.release.as_deref(), Some("7.4"));

        let groups = cfg.supports.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].pairs()[0].0, ConstraintKey::Name);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn supports_default_to_empty() {
        let cfg = parse("[platform]\nname = \"debian\"\n").unwrap();
        assert!(cfg.supports.is_empty());
        assert_eq!(cfg.platform().unwrap().arch, "");
    }

    #[test]
    fn missing_platform_is_an_error() {
        let cfg = parse("[[supports]]\nos = \"linux\"\n").unwrap();
        assert!(matches!(cfg.platform(), Err(ProbeError::MissingPlatform)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(parse("[platform"), Err(ProbeError::ConfigParse(_))));
        assert!(matches!(
            parse("[[supports]]\nos = [\"linux\"]\n"),
            Err(ProbeError::ConfigParse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let cfg = load_from(file.path()).unwrap();
        assert_eq!(cfg.supports.groups().len(), 2);
    }

    #[test]
    fn load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from(&dir.path().join(DEFAULT_CONFIG));
        assert!(matches!(result, Err(ProbeError::ConfigRead { .. })));
    }

    #[test]
    fn overrides_patch_descriptor() {
        let mut platform = parse(SAMPLE).unwrap().platform.unwrap();
        let env: HashMap<&str, &str> = [
            ("SYSPROBE_PLATFORM_NAME", "centos"),
            ("SYSPROBE_PLATFORM_RELEASE", "8.2"),
            ("SYSPROBE_PLATFORM_FAMILIES", "rhel, linux,,unix"),
        ]
        .into_iter()
        .collect();
        apply_overrides(&mut platform, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(platform.name, "centos");
        assert_eq!(platform.release.as_deref(), Some("8.2"));
        assert_eq!(platform.arch, "x86_64");
        assert_eq!(platform.family_hierarchy, vec!["rhel", "linux", "unix"]);
    }

    #[test]
    fn no_overrides_leave_descriptor_untouched() {
        let original = parse(SAMPLE).unwrap().platform.unwrap();
        let mut platform = original.clone();
        apply_overrides(&mut platform, |_| None);
        assert_eq!(platform, original);
    }
}
