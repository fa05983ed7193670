//! Stack snapshot module
//!
//! This module derives the render-ready view of a Graphite stack:
//! - Parsing the `gt log short` graph text
//! - Parent resolution from report order
//! - Restack detection against live ancestry
//! - Assembly of the immutable snapshot

pub mod builder;
pub mod lineage;
pub mod parser;
pub mod snapshot;
pub mod tool;

pub use builder::SnapshotBuilder;
pub use lineage::{lineage_chain, needs_restack, parent_of};
pub use parser::{parse_stack_output, strip_ansi, ParsedStack};
pub use snapshot::{BranchRow, FileChange, FileStatus, StackSnapshot, UnavailableReason};
pub use tool::{GraphiteCli, StackTool};
