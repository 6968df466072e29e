//! Conditional line selection for recipe templates
//!
//! A line ending in a bracketed selector is kept or dropped depending on
//! how the selector evaluates against a [`SelectorContext`]:
//!
//! ```text
//! source:
//!   url: https://example.com/foo.tar.gz   # [linux]
//!   url: https://example.com/foo.zip      # [win]
//! ```
//!
//! A kept line loses its selector clause and trailing whitespace; a dropped
//! line disappears completely. Lines without a selector pass through
//! verbatim.

mod context;
mod expr;

pub use context::{parse_definition, Platform, SelectorContext, SelectorValue};
pub use expr::{evaluate, CmpOp, Expr, ExprError};

use crate::error::SelectorError;
use regex::Regex;
use std::sync::LazyLock;

// With a comment marker, text may follow the closing bracket. Without one,
// the bracket must end the line.
static SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*(?:(#.*)\[(.+)\].*|\[(.+)\])$").expect("selector pattern is valid")
});

/// A line that carries a selector tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMatch<'a> {
    /// Content before the selector clause
    pub prefix: &'a str,
    /// Expression between the brackets
    pub condition: &'a str,
}

/// Splits a line into its content and selector expression, if it has one
pub fn match_selector(line: &str) -> Option<SelectorMatch<'_>> {
    let caps = SELECTOR_RE.captures(line.trim_end())?;
    let prefix = caps.get(1)?.as_str();
    let condition = caps.get(3).or_else(|| caps.get(4))?.as_str();
    Some(SelectorMatch { prefix, condition })
}

/// Filters template text against `context`
///
/// Returns the retained lines joined by `\n`, followed by a single
/// trailing newline. Fails without producing output if any selector
/// cannot be evaluated.
pub fn filter(text: &str, context: &SelectorContext) -> Result<String, SelectorError> {
    let mut lines = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        let Some(selector) = match_selector(line) else {
            lines.push(line);
            continue;
        };

        let keep = evaluate(selector.condition, context).map_err(|e| match e {
            ExprError::UndefinedVariable(name) => {
                SelectorError::undefined_variable(name, line_no, line)
            }
            ExprError::Syntax(message) => SelectorError::syntax(line_no, line, message),
            ExprError::TypeMismatch(message) => {
                SelectorError::type_mismatch(line_no, line, message)
            }
        })?;

        if keep {
            tracing::debug!(line = line_no, selector = selector.condition, "keeping line");
            lines.push(selector.prefix.trim_end());
        } else {
            tracing::debug!(line = line_no, selector = selector.condition, "dropping line");
        }
    }

    tracing::debug!(
        lines = lines.len(),
        variables = context.len(),
        "filtered selectors"
    );
    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}
