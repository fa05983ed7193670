//! Parser for the text rendering produced by `gt log short`.
//!
//! Each branch line carries a node glyph followed by the branch name and
//! optional `(current)` / `(trunk)` annotations:
//!
//! ```text
//! ◯  feature/stack-3
//! ◉  feature/stack-2
//! ◯  feature/stack-1
//! ◯  main
//! ```
//!
//! The printed order is tip first, trunk last. Nothing past the
//! `Untracked branches:` heading belongs to the stack.

use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("static ANSI pattern"));

/// Node glyphs `gt` draws in front of a branch name
const GRAPH_MARKERS: [char; 4] = ['◉', '◯', '●', '○'];
/// Glyph used for the checked-out branch
const CURRENT_MARKER: char = '◉';

const CURRENT_ANNOTATION: &str = "(current)";
const TRUNK_ANNOTATION: &str = "(trunk)";
const UNTRACKED_HEADING: &str = "Untracked branches:";

/// Structure recovered from one stack report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStack {
    /// Branch names, tip-most first
    pub branches: Vec<String>,
    pub current_branch: Option<String>,
    /// Only set when a line carried the `(trunk)` annotation
    pub trunk_branch: Option<String>,
}

impl ParsedStack {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Annotated trunk, falling back to the last reported branch
    pub fn resolved_trunk(&self) -> Option<&str> {
        self.trunk_branch
            .as_deref()
            .or_else(|| self.branches.last().map(String::as_str))
    }
}

/// Remove ANSI color sequences
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(text, "")
}

/// Parse a stack report. Never fails; unrecognised lines are skipped.
pub fn parse_stack_output(output: &str) -> ParsedStack {
    let mut parsed = ParsedStack::default();

    for raw_line in output.lines() {
        let cleaned = strip_ansi(raw_line);
        let line = cleaned.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(UNTRACKED_HEADING) {
            break;
        }

        let Some(entry) = parse_branch_line(line) else {
            continue;
        };

        if entry.is_current {
            parsed.current_branch = Some(entry.name.to_string());
        }
        if entry.is_trunk {
            parsed.trunk_branch = Some(entry.name.to_string());
        }

        // A branch printed twice keeps its first position but still
        // contributes its markers
        if parsed.branches.iter().any(|name| name == entry.name) {
            tracing::debug!("Repeated branch line for '{}'", entry.name);
            continue;
        }
        parsed.branches.push(entry.name.to_string());
    }

    parsed
}

struct BranchLine<'a> {
    name: &'a str,
    is_current: bool,
    is_trunk: bool,
}

fn parse_branch_line(line: &str) -> Option<BranchLine<'_>> {
    let (marker_idx, marker) = line
        .char_indices()
        .find(|(_, c)| GRAPH_MARKERS.contains(c))?;

    let after_marker = line[marker_idx + marker.len_utf8()..].trim();
    if after_marker.is_empty() {
        return None;
    }

    let is_current = marker == CURRENT_MARKER || after_marker.contains(CURRENT_ANNOTATION);
    let is_trunk = after_marker.contains(TRUNK_ANNOTATION);

    let without_current = after_marker
        .strip_suffix(CURRENT_ANNOTATION)
        .unwrap_or(after_marker);
    let name = without_current.split_whitespace().next()?;

    Some(BranchLine {
        name,
        is_current,
        is_trunk,
    })
}
