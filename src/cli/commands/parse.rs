use crate::errors::{Result, StackscopeError};
use crate::stack::{lineage_chain, parent_of, parse_stack_output, ParsedStack};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Parsed report plus the derived parent of the current branch
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseReport<'a> {
    #[serde(flatten)]
    parsed: &'a ParsedStack,
    resolved_trunk: Option<&'a str>,
    parent_branch: Option<&'a str>,
    /// Current branch down to trunk
    lineage: Vec<&'a str>,
}

/// Parse a saved `gt log short` report and print it as JSON
pub async fn run(file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(&path).await.map_err(|e| {
            StackscopeError::validation(format!("Could not read {}: {e}", path.display()))
        })?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    println!("{}", render(&text)?);
    Ok(())
}

fn render(text: &str) -> Result<String> {
    let parsed = parse_stack_output(text);
    let report = ParseReport {
        parsed: &parsed,
        resolved_trunk: parsed.resolved_trunk(),
        parent_branch: parent_of(&parsed.branches, parsed.current_branch.as_deref()),
        lineage: parsed
            .current_branch
            .as_deref()
            .map(|current| lineage_chain(&parsed.branches, current))
            .unwrap_or_default(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
