//! Dependency role definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The context a dependency is used in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyRole {
    /// Compile/link-time requirement
    Build,
    /// Execution-time requirement
    #[default]
    Run,
}

impl DependencyRole {
    /// Returns the requirement section name for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyRole::Build => "build",
            DependencyRole::Run => "run",
        }
    }
}

impl FromStr for DependencyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(DependencyRole::Build),
            "run" => Ok(DependencyRole::Run),
            other => Err(format!(
                "invalid dependency role '{}': expected 'build' or 'run'",
                other
            )),
        }
    }
}

impl fmt::Display for DependencyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_run() {
        assert_eq!(DependencyRole::default(), DependencyRole::Run);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("build".parse(), Ok(DependencyRole::Build));
        assert_eq!("RUN".parse(), Ok(DependencyRole::Run));
        assert!("host".parse::<DependencyRole>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DependencyRole::Build.to_string(), "build");
        assert_eq!(DependencyRole::Run.to_string(), "run");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&DependencyRole::Build).unwrap();
        assert_eq!(json, "\"build\"");
        let role: DependencyRole = serde_json::from_str("\"run\"").unwrap();
        assert_eq!(role, DependencyRole::Run);
    }
}
