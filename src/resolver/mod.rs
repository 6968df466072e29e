//! Dependency version-pin resolution
//!
//! Rewrites a declared [`VersionSpec`] into a concrete, environment-aware
//! spec:
//! - Explicit versions are returned untouched
//! - `x.x` placeholders are replaced by the normalized override plus `*`
//! - Unconstrained specs are pinned according to the package's [`PinPolicy`]
//!
//! Build-role pins of packages with an allow-list must land on a
//! supported `major.minor` version.

mod policy;

pub use policy::{PackageRule, PinPolicy};

use crate::config::PinConfig;
use crate::domain::{DependencyRole, OverrideVersion, VersionSpec};
use crate::error::ResolveError;
use std::collections::HashMap;

/// Override versions keyed by package name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinOverrides {
    versions: HashMap<String, OverrideVersion>,
}

impl PinOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads each configured package's override from the process environment
    pub fn from_env(config: &PinConfig) -> Self {
        Self::from_lookup(config, |var| std::env::var(var).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(config: &PinConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Self::new();
        for (package, rule) in &config.packages {
            let Some(var) = rule.env.as_deref() else {
                continue;
            };
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => {
                    tracing::debug!(package = %package, var, value = %value, "override from environment");
                    overrides.set(package.clone(), value.trim());
                }
                _ => {}
            }
        }
        overrides
    }

    /// Adds or replaces an override (builder pattern)
    pub fn with(mut self, package: impl Into<String>, version: impl Into<OverrideVersion>) -> Self {
        self.set(package, version);
        self
    }

    /// Adds or replaces an override
    pub fn set(&mut self, package: impl Into<String>, version: impl Into<OverrideVersion>) {
        self.versions.insert(package.into(), version.into());
    }

    /// Override registered for `package`
    pub fn get(&self, package: &str) -> Option<&OverrideVersion> {
        self.versions.get(package)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Resolves version pins against a [`PinConfig`]
#[derive(Debug, Clone)]
pub struct VersionSpecResolver {
    config: PinConfig,
}

impl VersionSpecResolver {
    /// Creates a resolver for the given policy table
    pub fn new(config: PinConfig) -> Self {
        Self { config }
    }

    /// Returns the policy table
    pub fn config(&self) -> &PinConfig {
        &self.config
    }

    /// Resolves a single spec
    ///
    /// Never mutates `spec`; an unchanged result is a clone.
    pub fn resolve(
        &self,
        spec: &VersionSpec,
        override_version: Option<&OverrideVersion>,
        role: DependencyRole,
    ) -> Result<VersionSpec, ResolveError> {
        match &spec.version {
            Some(expr) if expr.is_explicit() => {
                tracing::debug!(spec = %spec, "explicit version, keeping as declared");
                Ok(spec.clone())
            }
            Some(_) => {
                let value = override_version
                    .ok_or_else(|| ResolveError::missing_override(&spec.name))?;
                self.pin(spec, value, role)
            }
            None => {
                let Some(value) = override_version else {
                    return Ok(spec.clone());
                };
                let policy = self.config.policy_for(&spec.name);
                if !policy.applies_to(role) {
                    tracing::debug!(spec = %spec, %policy, %role, "policy does not pin in this role");
                    return Ok(spec.clone());
                }
                self.pin(spec, value, role)
            }
        }
    }

    /// Resolves a batch of specs, each with the override registered for its package
    ///
    /// Stops at the first failure.
    pub fn resolve_all(
        &self,
        specs: &[VersionSpec],
        overrides: &PinOverrides,
        role: DependencyRole,
    ) -> Result<Vec<VersionSpec>, ResolveError> {
        specs
            .iter()
            .map(|spec| self.resolve(spec, overrides.get(&spec.name), role))
            .collect()
    }

    fn pin(
        &self,
        spec: &VersionSpec,
        value: &OverrideVersion,
        role: DependencyRole,
    ) -> Result<VersionSpec, ResolveError> {
        let version = value
            .normalize()
            .ok_or_else(|| ResolveError::invalid_override(&spec.name, value.to_string()))?;

        if role == DependencyRole::Build && !self.config.supports(&spec.name, &version) {
            tracing::debug!(
                package = %spec.name,
                %version,
                supported = ?self.config.supported_for(&spec.name),
                "build pin outside allow-list"
            );
            return Err(ResolveError::unsupported_version(&spec.name, version));
        }

        let pinned = VersionSpec::wildcard_pinned(&spec.name, version);
        tracing::debug!(from = %spec, to = %pinned, %role, "pinned dependency");
        Ok(pinned)
    }
}

impl Default for VersionSpecResolver {
    fn default() -> Self {
        Self::new(PinConfig::default())
    }
}
