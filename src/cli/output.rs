use crate::stack::{BranchRow, FileChange, FileStatus, StackSnapshot};
use console::style;
use std::fmt::Display;

/// Centralized output formatting utilities for consistent CLI presentation
pub struct Output;

impl Output {
    /// Print a success message with checkmark
    pub fn success<T: Display>(message: T) {
        println!("{} {}", style("✓").green(), message);
    }

    /// Print an error message with X mark
    pub fn error<T: Display>(message: T) {
        println!("{} {}", style("✗").red(), message);
    }

    /// Print a warning message
    pub fn warning<T: Display>(message: T) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    /// Print an info message
    pub fn info<T: Display>(message: T) {
        println!("{} {}", style("ℹ").cyan(), message);
    }

    /// Print a sub-item with arrow prefix
    pub fn sub_item<T: Display>(message: T) {
        println!("  {} {}", style("→").dim(), message);
    }

    /// Print a section header
    pub fn section<T: Display>(title: T) {
        println!("\n{}", style(title).bold().underlined());
    }

    /// Print a tip/suggestion
    pub fn tip<T: Display>(message: T) {
        println!("{} {}", style("TIP:").cyan(), style(message).dim());
    }

    /// Print a solution message
    pub fn solution<T: Display>(message: T) {
        println!("     {}: {}", style("Solution").yellow(), message);
    }

    /// Print a stack snapshot the way the changes panel lays it out
    pub fn snapshot(snapshot: &StackSnapshot) {
        if !snapshot.available {
            match snapshot.reason {
                Some(reason) => {
                    Self::warning(format!("No stack available ({reason})"));
                    Self::sub_item(reason.explanation());
                }
                None => Self::warning("No stack available"),
            }
            return;
        }

        Self::section("Current Stack");
        for row in &snapshot.branches {
            println!("{}", format_branch_row(row));
            if row.is_current {
                Self::layer(snapshot);
            }
        }

        let drifted = snapshot.branches_needing_restack().count();
        if drifted > 0 {
            println!();
            Self::tip(format!(
                "{drifted} branch(es) need restacking. Run 'gt restack'"
            ));
        }
    }

    fn layer(snapshot: &StackSnapshot) {
        let parent = snapshot.parent_branch.as_deref().unwrap_or("(none)");
        println!("    {} {}", style("parent:").dim(), parent);

        if snapshot.uncommitted_count == 0 {
            println!("    {}", style("No uncommitted changes").dim());
        } else {
            println!(
                "    {}",
                style(format!("{} uncommitted change(s)", snapshot.uncommitted_count)).yellow()
            );
        }

        for file in &snapshot.current_layer_files {
            println!("    {}", format_file_change(file));
        }
    }
}

/// One line per branch: node glyph, name, trunk label, restack warning
pub fn format_branch_row(row: &BranchRow) -> String {
    let glyph = if row.is_current { "◉" } else { "◯" };
    let mut line = if row.is_current {
        format!("{} {}", style(glyph).green(), style(&row.name).bold())
    } else {
        format!("{} {}", style(glyph).dim(), row.name)
    };

    if row.is_trunk {
        line.push_str(&format!(" {}", style("trunk").dim()));
    }
    if row.needs_restack {
        line.push_str(&format!(" {}", style("⚠ needs restack").yellow()));
    }
    line
}

pub fn format_file_change(file: &FileChange) -> String {
    let marker = file.status.marker().to_string();
    let marker = match file.status {
        FileStatus::Added => style(marker).green(),
        FileStatus::Deleted => style(marker).red(),
        FileStatus::Renamed => style(marker).cyan(),
        FileStatus::Modified => style(marker).yellow(),
    };
    format!("{} {}", marker, file.path)
}
