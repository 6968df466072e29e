//! Text output formatter
//!
//! Normal and quiet output print one resolved spec per line so the result
//! can be piped. Verbose output shows the declared spec next to the
//! resolved one and highlights rewrites.

use crate::domain::Resolution;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn format_verbose(&self, resolution: &Resolution, writer: &mut dyn Write) -> std::io::Result<()> {
        if resolution.is_changed() {
            writeln!(
                writer,
                "{} {} {}",
                resolution.declared.to_string().dimmed(),
                "→".dimmed(),
                resolution.resolved.to_string().green()
            )
        } else {
            writeln!(writer, "{} {}", resolution.resolved, "(unchanged)".dimmed())
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, resolutions: &[Resolution], writer: &mut dyn Write) -> std::io::Result<()> {
        for resolution in resolutions {
            match self.verbosity {
                Verbosity::Verbose => self.format_verbose(resolution, writer)?,
                Verbosity::Normal | Verbosity::Quiet => {
                    writeln!(writer, "{}", resolution.resolved)?
                }
            }
        }

        if self.verbosity == Verbosity::Verbose {
            let changed = resolutions.iter().filter(|r| r.is_changed()).count();
            writeln!(
                writer,
                "\n{} of {} dependencies pinned",
                changed,
                resolutions.len()
            )?;
        }

        Ok(())
    }
}
