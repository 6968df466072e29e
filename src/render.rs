//! Requirement rendering
//!
//! Ties the two halves together the way a recipe build does: selector
//! filtering first, then each surviving requirement line is parsed and
//! pinned.

use crate::domain::{DependencyRole, Resolution, VersionSpec};
use crate::error::RenderError;
use crate::resolver::{PinOverrides, VersionSpecResolver};
use crate::selector::{self, SelectorContext};
use std::collections::BTreeSet;

/// Extracts the dependency declaration from a requirement line
///
/// Blank lines and comments yield `None`; a leading YAML list marker is
/// stripped.
pub fn requirement_text(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let declaration = trimmed
        .strip_prefix("- ")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    (!declaration.is_empty()).then_some(declaration)
}

/// Filters `text` and parses every surviving requirement line
fn parse_requirements(
    text: &str,
    context: &SelectorContext,
) -> Result<Vec<(String, VersionSpec)>, RenderError> {
    let filtered = selector::filter(text, context)?;

    filtered
        .lines()
        .filter_map(requirement_text)
        .map(|declaration| {
            declaration
                .parse()
                .map(|spec| (declaration.to_string(), spec))
                .map_err(|source| RenderError::Parse {
                    text: declaration.to_string(),
                    source,
                })
        })
        .collect()
}

fn resolve_line(
    text: String,
    target: &VersionSpec,
    resolver: &VersionSpecResolver,
    overrides: &PinOverrides,
    role: DependencyRole,
) -> Result<VersionSpec, RenderError> {
    resolver
        .resolve(target, overrides.get(&target.name), role)
        .map_err(|source| RenderError::Resolve { text, source })
}

/// Filters `text`, then parses and resolves every requirement line in order
pub fn render_requirements(
    text: &str,
    context: &SelectorContext,
    resolver: &VersionSpecResolver,
    overrides: &PinOverrides,
    role: DependencyRole,
) -> Result<Vec<Resolution>, RenderError> {
    let mut resolved = Vec::new();
    for (declaration, spec) in parse_requirements(text, context)? {
        let pinned = resolve_line(declaration, &spec, resolver, overrides, role)?;
        resolved.push(Resolution::new(spec, pinned));
    }

    tracing::debug!(count = resolved.len(), %role, "rendered requirements");
    Ok(resolved)
}

/// Renders the build list of a recipe whose run list is `run_text`
///
/// A package the run list declares as `<pkg> x.x` must be built against
/// the same version it will run with, so its build entry is pinned to the
/// override whatever constraint the build line carries. Every other build
/// entry resolves as in [`render_requirements`].
pub fn render_build_requirements(
    build_text: &str,
    run_text: &str,
    context: &SelectorContext,
    resolver: &VersionSpecResolver,
    overrides: &PinOverrides,
) -> Result<Vec<Resolution>, RenderError> {
    let run_placeholders: BTreeSet<String> = parse_requirements(run_text, context)?
        .into_iter()
        .filter(|(_, spec)| spec.is_placeholder())
        .map(|(_, spec)| spec.name)
        .collect();

    let mut resolved = Vec::new();
    for (declaration, spec) in parse_requirements(build_text, context)? {
        let target = if run_placeholders.contains(&spec.name) {
            tracing::debug!(package = %spec.name, "run list declares x.x, pinning build entry");
            VersionSpec::placeholder(&spec.name)
        } else {
            spec.clone()
        };
        let pinned = resolve_line(
            declaration,
            &target,
            resolver,
            overrides,
            DependencyRole::Build,
        )?;
        resolved.push(Resolution::new(spec, pinned));
    }

    tracing::debug!(
        count = resolved.len(),
        forced = run_placeholders.len(),
        "rendered build requirements"
    );
    Ok(resolved)
}
