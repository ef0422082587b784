use crate::planner::Planner;
use crate::reconcile::MergeResult;
use crate::state::Storage;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub fn handle_import_command<S: Storage>(
    planner: &mut Planner<S>,
    file: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let raw = read_source(file)?;
    let merged = import_raw(planner, &raw, dry_run)?;
    println!("{}", summary_line(&merged, dry_run));
    Ok(())
}

/// Run the pasted text through the pipeline, persisting unless `dry_run`
pub fn import_raw<S: Storage>(
    planner: &mut Planner<S>,
    raw: &str,
    dry_run: bool,
) -> Result<MergeResult> {
    let merged = if dry_run { planner.preview_import(raw) } else { planner.import_text(raw) };
    let merged = merged.map_err(|e| anyhow!(e))?;
    if !dry_run {
        info!(
            "Import saved: {} client(s), {} post(s) in store",
            merged.clients.len(),
            merged.posts.len()
        );
    }
    Ok(merged)
}

pub fn summary_line(merged: &MergeResult, dry_run: bool) -> String {
    let mut line = format!(
        "{} {} new client(s) and {} post(s)",
        if dry_run { "Would import" } else { "Imported" },
        merged.added_clients,
        merged.added_posts
    );
    if merged.skipped_clients > 0 {
        line.push_str(&format!(", skipped {} existing client(s)", merged.skipped_clients));
    }
    if merged.remapped_posts > 0 {
        line.push_str(&format!(
            ", attached {} post(s) to existing clients",
            merged.remapped_posts
        ));
    }
    line
}

/// Read the raw sheet. Bytes that are not UTF-8 (Latin-1 exports) are replaced
/// rather than rejected.
fn read_source(file: Option<&Path>) -> Result<String> {
    let bytes = match file {
        Some(path) if path != Path::new("-") => fs::read(path)
            .with_context(|| format!("Failed to read import file {}", path.display()))?,
        _ => {
            let mut raw = Vec::new();
            io::stdin().read_to_end(&mut raw).context("Failed to read standard input")?;
            raw
        }
    };
    Ok(decode_sheet(&bytes))
}

fn decode_sheet(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!("Import data is not valid UTF-8; invalid bytes were replaced");
    }
    text.into_owned()
}
