//! Variable namespace for selector evaluation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A value a selector variable can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl SelectorValue {
    /// Truthiness: bools as-is, non-zero ints, non-empty strings
    pub fn is_truthy(&self) -> bool {
        match self {
            SelectorValue::Bool(b) => *b,
            SelectorValue::Int(n) => *n != 0,
            SelectorValue::Str(s) => !s.is_empty(),
        }
    }

    /// Numeric view of the value, with bools as 0/1
    pub fn as_number(&self) -> Option<i64> {
        match self {
            SelectorValue::Bool(b) => Some(i64::from(*b)),
            SelectorValue::Int(n) => Some(*n),
            SelectorValue::Str(_) => None,
        }
    }
}

impl From<bool> for SelectorValue {
    fn from(b: bool) -> Self {
        SelectorValue::Bool(b)
    }
}

impl From<i64> for SelectorValue {
    fn from(n: i64) -> Self {
        SelectorValue::Int(n)
    }
}

impl From<&str> for SelectorValue {
    fn from(s: &str) -> Self {
        SelectorValue::Str(s.to_string())
    }
}

impl fmt::Display for SelectorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorValue::Bool(true) => f.write_str("True"),
            SelectorValue::Bool(false) => f.write_str("False"),
            SelectorValue::Int(n) => write!(f, "{}", n),
            SelectorValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

/// Target platform of a recipe render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux32,
    Linux64,
    LinuxArmv6l,
    Osx64,
    Win32,
    Win64,
}

impl Platform {
    /// Returns the subdirectory name, e.g. `linux-64`
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux32 => "linux-32",
            Platform::Linux64 => "linux-64",
            Platform::LinuxArmv6l => "linux-armv6l",
            Platform::Osx64 => "osx-64",
            Platform::Win32 => "win-32",
            Platform::Win64 => "win-64",
        }
    }

    /// Platform of the running process
    pub fn current() -> Self {
        let wide = cfg!(target_pointer_width = "64");
        if cfg!(target_os = "windows") {
            if wide {
                Platform::Win64
            } else {
                Platform::Win32
            }
        } else if cfg!(target_os = "macos") {
            Platform::Osx64
        } else if cfg!(target_arch = "arm") {
            Platform::LinuxArmv6l
        } else if wide {
            Platform::Linux64
        } else {
            Platform::Linux32
        }
    }

    /// Returns all supported platforms
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Linux32,
            Platform::Linux64,
            Platform::LinuxArmv6l,
            Platform::Osx64,
            Platform::Win32,
            Platform::Win64,
        ]
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "invalid platform '{}': expected one of linux-32, linux-64, linux-armv6l, osx-64, win-32, win-64",
                    s
                )
            })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only mapping of selector variable names to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorContext {
    vars: HashMap<String, SelectorValue>,
}

impl SelectorContext {
    /// Creates an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard namespace for a target platform and language versions
    ///
    /// `py` and `npy` use the compact integer form (`27`, `18`, `110`).
    pub fn for_target(platform: Platform, py: Option<i64>, npy: Option<i64>) -> Self {
        let plat = platform.as_str();
        let mut ctx = Self::new()
            .with("linux", plat.starts_with("linux-"))
            .with("linux32", platform == Platform::Linux32)
            .with("linux64", platform == Platform::Linux64)
            .with("arm", plat.starts_with("linux-arm"))
            .with("armv6l", platform == Platform::LinuxArmv6l)
            .with("osx", plat.starts_with("osx-"))
            .with("unix", plat.starts_with("linux-") || plat.starts_with("osx-"))
            .with("win", plat.starts_with("win-"))
            .with("win32", platform == Platform::Win32)
            .with("win64", platform == Platform::Win64)
            .with("x86", plat.ends_with("-32") || plat.ends_with("-64"))
            .with("x86_64", plat.ends_with("-64"));

        if let Some(py) = py {
            ctx = ctx
                .with("py", py)
                .with("py3k", (30..40).contains(&py))
                .with("py2k", (20..30).contains(&py));
            for known in [26, 27, 33, 34, 35] {
                ctx = ctx.with(format!("py{}", known), py == known);
            }
        }

        if let Some(npy) = npy {
            ctx = ctx.with("np", npy);
        }

        ctx
    }

    /// Adds or replaces a variable (builder pattern)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SelectorValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Adds or replaces a variable
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SelectorValue>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Looks up a variable
    pub fn get(&self, name: &str) -> Option<&SelectorValue> {
        self.vars.get(name)
    }

    /// Returns true if the variable is defined
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for SelectorContext {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (name, value) in iter {
            ctx.set(name, value);
        }
        ctx
    }
}

/// Parses a `name=value` definition from the command line
///
/// `true`/`false` (any case) become bools, integers become ints,
/// anything else is a string.
pub fn parse_definition(s: &str) -> Result<(String, SelectorValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid definition '{}': expected NAME=VALUE", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid definition '{}': empty name", s));
    }

    let value = value.trim();
    let value = match value.to_ascii_lowercase().as_str() {
        "true" => SelectorValue::Bool(true),
        "false" => SelectorValue::Bool(false),
        _ => match value.parse::<i64>() {
            Ok(n) => SelectorValue::Int(n),
            Err(_) => SelectorValue::Str(value.to_string()),
        },
    };

    Ok((name.to_string(), value))
}
