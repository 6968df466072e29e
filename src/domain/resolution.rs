//! Declared/resolved spec pairs

use super::VersionSpec;
use serde::{Deserialize, Serialize};

/// A dependency as declared and as resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Spec as written in the recipe
    pub declared: VersionSpec,
    /// Spec after pin resolution
    pub resolved: VersionSpec,
}

impl Resolution {
    pub fn new(declared: VersionSpec, resolved: VersionSpec) -> Self {
        Self { declared, resolved }
    }

    /// Returns true if resolution rewrote the spec
    pub fn is_changed(&self) -> bool {
        self.declared != self.resolved
    }
}
