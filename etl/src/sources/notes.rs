use std::path::Path;

use tracing::debug;

use crate::error::EtlResult;
use crate::types::NoteLine;

/// Reads a notes file, one note per non-blank line.
pub async fn read_notes(path: &Path) -> EtlResult<Vec<NoteLine>> {
    let content = tokio::fs::read_to_string(path).await?;
    let notes = parse_notes(&content);

    debug!(path = %path.display(), notes = notes.len(), "notes file read");

    Ok(notes)
}

pub fn parse_notes(content: &str) -> Vec<NoteLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(NoteLine::new)
        .collect()
}
