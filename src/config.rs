//! Pin configuration loading
//!
//! The pin policy table and build-time allow-lists are data, not code.
//! A default table ships with the crate; `--config` replaces it.

use crate::error::ConfigError;
use crate::resolver::{PackageRule, PinPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

/// Built-in pin configuration
pub const DEFAULT_CONFIG: &str = include_str!("../config/pins.toml");

/// Policy table consulted by the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinConfig {
    /// Policy for packages without an entry in `packages`
    #[serde(default)]
    pub default_policy: PinPolicy,
    /// Per-package rules keyed by package name
    #[serde(default)]
    pub packages: BTreeMap<String, PackageRule>,
}

impl PinConfig {
    /// Parses configuration from TOML text; `origin` names the source in errors
    pub fn from_toml(content: &str, origin: impl AsRef<Path>) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::toml_parse_error(origin.as_ref(), e.to_string()))
    }

    /// Loads configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let config = Self::from_toml(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            packages = config.packages.len(),
            "loaded pin configuration"
        );
        Ok(config)
    }

    /// Loads `path` if given, otherwise the built-in table
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Returns the built-in configuration
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG, "<builtin>/pins.toml")
    }

    /// Adds or replaces a package rule (builder pattern)
    pub fn with_package(mut self, name: impl Into<String>, rule: PackageRule) -> Self {
        self.packages.insert(name.into(), rule);
        self
    }

    /// Pin policy for `name`, falling back to the default policy
    pub fn policy_for(&self, name: &str) -> PinPolicy {
        self.packages
            .get(name)
            .map_or(self.default_policy, |rule| rule.policy)
    }

    /// Build-time allow-list for `name`, if it has one
    pub fn supported_for(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.packages.get(name).and_then(|rule| rule.supported.as_ref())
    }

    /// Returns true if `version` may be used for a build-time pin of `name`
    pub fn supports(&self, name: &str, version: &str) -> bool {
        self.packages
            .get(name)
            .map_or(true, |rule| rule.supports(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_config() {
        let config = PinConfig::builtin().unwrap();
        assert_eq!(config.default_policy, PinPolicy::AlwaysPin);
        assert_eq!(config.policy_for("python"), PinPolicy::AlwaysPin);
        assert_eq!(config.policy_for("numpy"), PinPolicy::PinOnBuildOnly);
        assert_eq!(config.policy_for("perl"), PinPolicy::AlwaysPin);
        assert!(config.supports("numpy", "1.8"));
        assert!(config.supports("numpy", "1.10"));
        assert!(!config.supports("numpy", "1.9"));
        assert!(config.supports("python", "9.9"));
        assert!(config.supported_for("python").is_none());
        assert_eq!(
            config.packages["numpy"].env.as_deref(),
            Some("CONDA_NPY")
        );
    }

    #[test]
    fn test_with_package() {
        let config = PinConfig::default().with_package(
            "scipy",
            PackageRule::new(PinPolicy::PinOnBuildOnly).with_supported(["0.16"]),
        );
        assert_eq!(config.policy_for("scipy"), PinPolicy::PinOnBuildOnly);
        assert!(!config.supports("scipy", "0.15"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_policy = \"build-only\"\n[packages.r-base]\nenv = \"CONDA_R\""
        )
        .unwrap();

        let config = PinConfig::load(file.path()).unwrap();
        assert_eq!(config.default_policy, PinPolicy::PinOnBuildOnly);
        assert_eq!(config.policy_for("r-base"), PinPolicy::AlwaysPin);
        assert_eq!(config.policy_for("other"), PinPolicy::PinOnBuildOnly);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PinConfig::load("/nonexistent/pins.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = PinConfig::from_toml("default_policy = \"sometimes\"", "pins.toml").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
        assert!(err.to_string().contains("pins.toml"));
    }

    #[test]
    fn test_load_or_default() {
        let config = PinConfig::load_or_default(None).unwrap();
        assert_eq!(config, PinConfig::builtin().unwrap());
    }
}
