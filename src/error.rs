//! Application error types using thiserror
//!
//! Error hierarchy:
//! - SpecParseError: Malformed dependency declarations
//! - SelectorError: Selector tags that cannot be evaluated
//! - ResolveError: Version pins that cannot be resolved
//! - ConfigError: Issues loading the pin configuration
//! - RenderError: A requirement line that failed during rendering

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Dependency declaration parsing errors
    #[error(transparent)]
    Spec(#[from] SpecParseError),

    /// Selector evaluation errors
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Version pin resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Requirement rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised while parsing a `name[ version][ build]` declaration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecParseError {
    /// Declaration was empty or whitespace only
    #[error("empty dependency specification")]
    Empty,

    /// More than three whitespace-separated tokens
    #[error("too many fields in dependency specification '{spec}'")]
    TooManyFields { spec: String },

    /// A build string following a placeholder or wildcard version
    #[error("build string '{build}' in '{spec}' requires an exact version")]
    BuildStringWithoutExactVersion { spec: String, build: String },
}

/// Errors raised while evaluating selector tags
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector references a variable missing from the context
    #[error("undefined selector variable '{name}' on line {line}: {text}")]
    UndefinedVariable {
        name: String,
        line: usize,
        text: String,
    },

    /// The selector expression could not be parsed
    #[error("invalid selector on line {line}: {message}: {text}")]
    Syntax {
        line: usize,
        text: String,
        message: String,
    },

    /// Operands of a comparison cannot be ordered against each other
    #[error("type mismatch in selector on line {line}: {message}: {text}")]
    TypeMismatch {
        line: usize,
        text: String,
        message: String,
    },
}

/// Errors raised while pinning a dependency version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Placeholder version with no configured override
    #[error("'{package} x.x' requires an external version setting, but none was supplied")]
    MissingOverride { package: String },

    /// Build-time pin to a version outside the supported set
    #[error("version {version} is not in the supported set for build-time pins of '{package}'")]
    UnsupportedVersion { package: String, version: String },

    /// Override value that is neither dotted nor a digit sequence
    #[error("invalid override version '{value}' for '{package}'")]
    InvalidOverride { package: String, value: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },
}

/// A requirement line that failed to parse or resolve
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Selector filtering of the requirement text failed
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// The line is not a valid dependency declaration
    #[error("requirement '{text}': {source}")]
    Parse {
        text: String,
        #[source]
        source: SpecParseError,
    },

    /// The declaration could not be pinned
    #[error("requirement '{text}': {source}")]
    Resolve {
        text: String,
        #[source]
        source: ResolveError,
    },
}

impl SelectorError {
    /// Creates a new UndefinedVariable error
    pub fn undefined_variable(name: impl Into<String>, line: usize, text: impl Into<String>) -> Self {
        SelectorError::UndefinedVariable {
            name: name.into(),
            line,
            text: text.into(),
        }
    }

    /// Creates a new Syntax error
    pub fn syntax(line: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        SelectorError::Syntax {
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    /// Creates a new TypeMismatch error
    pub fn type_mismatch(line: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        SelectorError::TypeMismatch {
            line,
            text: text.into(),
            message: message.into(),
        }
    }
}

impl ResolveError {
    /// Creates a new MissingOverride error
    pub fn missing_override(package: impl Into<String>) -> Self {
        ResolveError::MissingOverride {
            package: package.into(),
        }
    }

    /// Creates a new UnsupportedVersion error
    pub fn unsupported_version(package: impl Into<String>, version: impl Into<String>) -> Self {
        ResolveError::UnsupportedVersion {
            package: package.into(),
            version: version.into(),
        }
    }

    /// Creates a new InvalidOverride error
    pub fn invalid_override(package: impl Into<String>, value: impl Into<String>) -> Self {
        ResolveError::InvalidOverride {
            package: package.into(),
            value: value.into(),
        }
    }

    /// Returns the package the failed pin belongs to
    pub fn package(&self) -> &str {
        match self {
            ResolveError::MissingOverride { package }
            | ResolveError::UnsupportedVersion { package, .. }
            | ResolveError::InvalidOverride { package, .. } => package,
        }
    }
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}
