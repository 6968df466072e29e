//! Per-package pin policies

use crate::domain::DependencyRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// When an unconstrained dependency gets pinned to its override
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinPolicy {
    /// Pinned in every role (e.g. the interpreter itself)
    #[default]
    #[serde(rename = "always")]
    AlwaysPin,
    /// Pinned only for build requirements (ABI matters at compile time only)
    #[serde(rename = "build-only")]
    PinOnBuildOnly,
}

impl PinPolicy {
    /// Returns true if an unconstrained spec in `role` gets pinned
    pub fn applies_to(&self, role: DependencyRole) -> bool {
        match self {
            PinPolicy::AlwaysPin => true,
            PinPolicy::PinOnBuildOnly => role == DependencyRole::Build,
        }
    }
}

impl fmt::Display for PinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinPolicy::AlwaysPin => f.write_str("always"),
            PinPolicy::PinOnBuildOnly => f.write_str("build-only"),
        }
    }
}

/// Pinning rules for one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageRule {
    /// Pin policy for unconstrained specs
    #[serde(default)]
    pub policy: PinPolicy,
    /// `major.minor` versions allowed for build-time pins; `None` allows any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported: Option<BTreeSet<String>>,
    /// Environment variable holding this package's override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
}

impl PackageRule {
    /// Creates a rule with the given policy and no allow-list
    pub fn new(policy: PinPolicy) -> Self {
        Self {
            policy,
            supported: None,
            env: None,
        }
    }

    /// Sets the build-time allow-list
    pub fn with_supported<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the override environment variable
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Returns true if `version` may be used for a build-time pin
    pub fn supports(&self, version: &str) -> bool {
        self.supported
            .as_ref()
            .map_or(true, |allowed| allowed.contains(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_applies_to() {
        assert!(PinPolicy::AlwaysPin.applies_to(DependencyRole::Run));
        assert!(PinPolicy::AlwaysPin.applies_to(DependencyRole::Build));
        assert!(!PinPolicy::PinOnBuildOnly.applies_to(DependencyRole::Run));
        assert!(PinPolicy::PinOnBuildOnly.applies_to(DependencyRole::Build));
    }

    #[test]
    fn test_rule_supports_without_allow_list() {
        let rule = PackageRule::new(PinPolicy::AlwaysPin);
        assert!(rule.supports("9.99"));
    }

    #[test]
    fn test_rule_supports_with_allow_list() {
        let rule = PackageRule::new(PinPolicy::PinOnBuildOnly).with_supported(["1.7", "1.8"]);
        assert!(rule.supports("1.8"));
        assert!(!rule.supports("1.9"));
    }

    #[test]
    fn test_policy_serde_names() {
        let rule: PackageRule = toml::from_str(
            r#"
policy = "build-only"
env = "CONDA_NPY"
supported = ["1.7"]
"#,
        )
        .unwrap();
        assert_eq!(rule.policy, PinPolicy::PinOnBuildOnly);
        assert_eq!(rule.env.as_deref(), Some("CONDA_NPY"));
        assert!(rule.supports("1.7"));

        let default_rule: PackageRule = toml::from_str("").unwrap();
        assert_eq!(default_rule.policy, PinPolicy::AlwaysPin);
    }

    #[test]
    fn test_rule_rejects_unknown_fields() {
        assert!(toml::from_str::<PackageRule>("polcy = \"always\"").is_err());
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(PinPolicy::AlwaysPin.to_string(), "always");
        assert_eq!(PinPolicy::PinOnBuildOnly.to_string(), "build-only");
    }
}
