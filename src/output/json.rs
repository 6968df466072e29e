//! JSON output formatter for machine processing

use crate::domain::{Resolution, VersionSpec};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbose output includes the structured spec fields
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of one resolution
#[derive(Serialize)]
struct JsonResolution<'a> {
    /// Declared spec in text form
    declared: String,
    /// Resolved spec in text form
    resolved: String,
    /// Whether resolution rewrote the spec
    changed: bool,
    /// Structured resolved spec (verbose only)
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<&'a VersionSpec>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, resolutions: &[Resolution], writer: &mut dyn Write) -> std::io::Result<()> {
        let entries: Vec<JsonResolution<'_>> = resolutions
            .iter()
            .map(|r| JsonResolution {
                declared: r.declared.to_string(),
                resolved: r.resolved.to_string(),
                changed: r.is_changed(),
                spec: (self.verbosity == Verbosity::Verbose).then_some(&r.resolved),
            })
            .collect();

        serde_json::to_writer_pretty(&mut *writer, &entries)?;
        writeln!(writer)?;
        Ok(())
    }
}
