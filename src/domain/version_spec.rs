//! Dependency specification values
//!
//! A dependency declaration has the text form `name[ version][ build]`:
//! - `numpy` - no constraint
//! - `numpy x.x` - placeholder, filled from the configured override
//! - `numpy 1.9.0 py27_2` - exact version with build string
//! - `numpy 1.8*` - wildcard-pinned (any patch/build of 1.8)

use crate::error::SpecParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal version token that stands in for a configured override
pub const PLACEHOLDER: &str = "x.x";

/// Match-any marker appended to wildcard-pinned versions
pub const WILDCARD_SUFFIX: char = '*';

/// The version expression of a dependency specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum VersionExpr {
    /// `x.x`, requires an override at resolve time
    Placeholder,
    /// A literal version, kept verbatim
    Exact(String),
    /// A normalized `major.minor` value followed by the wildcard suffix
    WildcardPinned(String),
}

impl VersionExpr {
    /// Returns true if this expression is an explicit pin the resolver must not touch
    pub fn is_explicit(&self) -> bool {
        !matches!(self, VersionExpr::Placeholder)
    }
}

impl fmt::Display for VersionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionExpr::Placeholder => f.write_str(PLACEHOLDER),
            VersionExpr::Exact(version) => f.write_str(version),
            VersionExpr::WildcardPinned(version) => write!(f, "{}{}", version, WILDCARD_SUFFIX),
        }
    }
}

/// A package name with an optional version expression and build string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionSpec {
    /// Package name (case-sensitive)
    pub name: String,
    /// Version expression, `None` means unconstrained
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionExpr>,
    /// Build string, only present alongside an exact version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_string: Option<String>,
}

impl VersionSpec {
    /// Creates an unconstrained spec
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            build_string: None,
        }
    }

    /// Creates a spec with a placeholder version
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name).with_version(VersionExpr::Placeholder)
    }

    /// Creates a spec with an exact version
    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name).with_version(VersionExpr::Exact(version.into()))
    }

    /// Creates a spec pinned to `version` plus the wildcard suffix
    pub fn wildcard_pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name).with_version(VersionExpr::WildcardPinned(version.into()))
    }

    /// Sets the version expression
    pub fn with_version(mut self, version: VersionExpr) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the build string
    pub fn with_build_string(mut self, build: impl Into<String>) -> Self {
        self.build_string = Some(build.into());
        self
    }

    /// Returns true if no version constraint is declared
    pub fn is_unconstrained(&self) -> bool {
        self.version.is_none()
    }

    /// Returns true if the version is the `x.x` placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self.version, Some(VersionExpr::Placeholder))
    }
}

impl FromStr for VersionSpec {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();

        let (name, version, build) = match tokens.as_slice() {
            [] => return Err(SpecParseError::Empty),
            [name] => (*name, None, None),
            [name, version] => (*name, Some(*version), None),
            [name, version, build] => (*name, Some(*version), Some(*build)),
            _ => {
                return Err(SpecParseError::TooManyFields {
                    spec: s.trim().to_string(),
                })
            }
        };

        let version = version.map(|v| {
            if v == PLACEHOLDER {
                VersionExpr::Placeholder
            } else if let Some(stripped) = v.strip_suffix(WILDCARD_SUFFIX) {
                VersionExpr::WildcardPinned(stripped.to_string())
            } else {
                VersionExpr::Exact(v.to_string())
            }
        });

        if let Some(build) = build {
            if !matches!(version, Some(VersionExpr::Exact(_))) {
                return Err(SpecParseError::BuildStringWithoutExactVersion {
                    spec: s.trim().to_string(),
                    build: build.to_string(),
                });
            }
        }

        let spec = Self {
            version,
            ..Self::new(name)
        };
        Ok(match build {
            Some(build) => spec.with_build_string(build),
            None => spec,
        })
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ref version) = self.version {
            write!(f, " {}", version)?;
        }
        if let Some(ref build) = self.build_string {
            write!(f, " {}", build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> VersionSpec {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_name_only() {
        let spec = parse("python");
        assert_eq!(spec.name, "python");
        assert!(spec.is_unconstrained());
        assert!(spec.build_string.is_none());
    }

    #[test]
    fn test_parse_placeholder() {
        let spec = parse("numpy x.x");
        assert!(spec.is_placeholder());
        assert_eq!(spec, VersionSpec::placeholder("numpy"));
    }

    #[test]
    fn test_parse_exact_with_build_string() {
        let spec = parse("numpy 1.9.0 py27_2");
        assert_eq!(spec.version, Some(VersionExpr::Exact("1.9.0".to_string())));
        assert_eq!(spec.build_string, Some("py27_2".to_string()));
    }

    #[test]
    fn test_parse_wildcard() {
        let spec = parse("numpy 1.8*");
        assert_eq!(spec, VersionSpec::wildcard_pinned("numpy", "1.8"));
    }

    #[test]
    fn test_parse_constraint_kept_verbatim() {
        let spec = parse("numpy >=1.7");
        assert_eq!(spec.version, Some(VersionExpr::Exact(">=1.7".to_string())));
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert_eq!(parse("  python   2.7.8 "), VersionSpec::exact("python", "2.7.8"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<VersionSpec>(), Err(SpecParseError::Empty));
        assert_eq!("   ".parse::<VersionSpec>(), Err(SpecParseError::Empty));
        assert!(matches!(
            "a 1 b c".parse::<VersionSpec>(),
            Err(SpecParseError::TooManyFields { .. })
        ));
        assert!(matches!(
            "numpy x.x py27_0".parse::<VersionSpec>(),
            Err(SpecParseError::BuildStringWithoutExactVersion { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(parse("python").to_string(), "python");
        assert_eq!(parse("python x.x").to_string(), "python x.x");
        assert_eq!(VersionSpec::wildcard_pinned("python", "2.7").to_string(), "python 2.7*");
        assert_eq!(parse("numpy 1.9.0 py27_2").to_string(), "numpy 1.9.0 py27_2");
    }

    #[test]
    fn test_equality_is_textual() {
        assert_eq!(parse("numpy 1.8*"), parse("numpy  1.8*"));
        assert_ne!(parse("numpy 1.8*"), parse("numpy 1.8"));
        assert_ne!(parse("numpy 1.9.0 py27_2"), parse("numpy 1.9.0"));
        assert_ne!(parse("NumPy"), parse("numpy"));
    }

    #[test]
    fn test_is_explicit() {
        assert!(!VersionExpr::Placeholder.is_explicit());
        assert!(VersionExpr::Exact("1.0".to_string()).is_explicit());
        assert!(VersionExpr::WildcardPinned("1.0".to_string()).is_explicit());
    }

    #[test]
    fn test_serde_version_spec() {
        let spec = parse("numpy 1.9.0 py27_2");
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"name":"numpy","version":{"kind":"exact","value":"1.9.0"},"build_string":"py27_2"}"#
        );
        let parsed: VersionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_serde_unconstrained_omits_fields() {
        let json = serde_json::to_string(&VersionSpec::new("python")).unwrap();
        assert_eq!(json, r#"{"name":"python"}"#);
    }
}
