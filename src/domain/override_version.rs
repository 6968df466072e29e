//! Environment-provided override versions
//!
//! Overrides come from process configuration (e.g. `CONDA_NPY=18`) and may
//! arrive as text or as an integer. Both forms normalize identically:
//! - `"3.4"` → `3.4` (already dotted, used verbatim)
//! - `"27"` / `27` → `2.7`
//! - `"110"` / `110` → `1.10`
//! - `"3"` / `3` → `3.` (empty minor, so a pin reads `3.*`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the major and minor components
pub const VERSION_SEPARATOR: char = '.';

/// A raw, unnormalized override version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideVersion {
    /// Numeric form, e.g. `27`
    Number(u64),
    /// Text form, e.g. `"27"` or `"2.7"`
    Text(String),
}

impl OverrideVersion {
    /// Normalizes the override into dotted `major.minor` form
    ///
    /// Returns `None` when the value has no separator and is not a
    /// non-empty run of decimal digits.
    pub fn normalize(&self) -> Option<String> {
        let raw = match self {
            OverrideVersion::Number(n) => n.to_string(),
            OverrideVersion::Text(s) => s.trim().to_string(),
        };

        if raw.contains(VERSION_SEPARATOR) {
            return Some(raw);
        }

        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let (major, minor) = raw.split_at(1);
        Some(format!("{}{}{}", major, VERSION_SEPARATOR, minor))
    }
}

impl From<&str> for OverrideVersion {
    fn from(s: &str) -> Self {
        OverrideVersion::Text(s.to_string())
    }
}

impl From<String> for OverrideVersion {
    fn from(s: String) -> Self {
        OverrideVersion::Text(s)
    }
}

impl From<u64> for OverrideVersion {
    fn from(n: u64) -> Self {
        OverrideVersion::Number(n)
    }
}

impl From<u32> for OverrideVersion {
    fn from(n: u32) -> Self {
        OverrideVersion::Number(u64::from(n))
    }
}

impl fmt::Display for OverrideVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideVersion::Number(n) => write!(f, "{}", n),
            OverrideVersion::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(v: impl Into<OverrideVersion>) -> Option<String> {
        v.into().normalize()
    }

    #[test]
    fn test_text_and_number_agree() {
        assert_eq!(normalize("27"), Some("2.7".to_string()));
        assert_eq!(normalize(27u32), Some("2.7".to_string()));
        assert_eq!(normalize("110"), normalize(110u64));
    }

    #[test]
    fn test_multi_digit_minor() {
        assert_eq!(normalize("110"), Some("1.10".to_string()));
        assert_eq!(normalize(111u32), Some("1.11".to_string()));
    }

    #[test]
    fn test_dotted_value_verbatim() {
        assert_eq!(normalize("3.4"), Some("3.4".to_string()));
        assert_eq!(normalize("1.10"), Some("1.10".to_string()));
    }

    #[test]
    fn test_single_digit_keeps_separator() {
        assert_eq!(normalize("3"), Some("3.".to_string()));
        assert_eq!(normalize(3u32), Some("3.".to_string()));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("abc"), None);
        assert_eq!(normalize("2x"), None);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(normalize(" 18\n"), Some("1.8".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(OverrideVersion::from(18u32).to_string(), "18");
        assert_eq!(OverrideVersion::from("1.8").to_string(), "1.8");
    }

    #[test]
    fn test_serde_untagged() {
        let n: OverrideVersion = serde_json::from_str("27").unwrap();
        assert_eq!(n, OverrideVersion::Number(27));
        let s: OverrideVersion = serde_json::from_str("\"2.7\"").unwrap();
        assert_eq!(s, OverrideVersion::Text("2.7".to_string()));
    }
}
