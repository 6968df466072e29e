//! Core domain models for recipe-pin
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency specifications and their version expressions
//! - Dependency roles (build vs run)
//! - Raw override versions supplied by the environment
//! - Declared/resolved pairs produced by rendering

mod override_version;
mod resolution;
mod role;
mod version_spec;

pub use override_version::{OverrideVersion, VERSION_SEPARATOR};
pub use resolution::Resolution;
pub use role::DependencyRole;
pub use version_spec::{VersionExpr, VersionSpec, PLACEHOLDER, WILDCARD_SUFFIX};
