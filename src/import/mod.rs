//! Spreadsheet import for postdeck.
//
// Raw pasted text is parsed into candidate records and merged into the
// caller's collections by `crate::reconcile`.

use crate::models::{Client, Post};
use crate::reconcile::{merge, MergeResult};
use log::{info, warn};

mod import_dates;
mod import_parser;
mod import_splitter;

pub use import_dates::*;
pub use import_parser::*;
pub use import_splitter::*;

/// User-facing import failures. None of them leave the application unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Please paste CSV data")]
    EmptyInput,
    #[error("No valid clients found")]
    NoValidClients,
    #[error("Import failed: {0}")]
    Failed(String),
}

/// Parse `raw` and merge the result into the existing collections.
///
/// Empty input is rejected before parsing, and a parse yielding no client is
/// rejected before merging. The inputs are never modified.
pub fn import_text(
    raw: &str,
    existing_clients: &[Client],
    existing_posts: &[Post],
    parser: &TabularParser,
) -> Result<MergeResult, ImportError> {
    if raw.trim().is_empty() {
        warn!("Import attempted with empty input");
        return Err(ImportError::EmptyInput);
    }

    let parsed = parser.parse(raw);
    if parsed.clients.is_empty() {
        warn!("Import produced no clients");
        return Err(ImportError::NoValidClients);
    }

    info!(
        "Parsed {} client(s) and {} post(s) from import",
        parsed.clients.len(),
        parsed.posts.len()
    );
    Ok(merge(existing_clients, existing_posts, parsed.clients, parsed.posts))
}
