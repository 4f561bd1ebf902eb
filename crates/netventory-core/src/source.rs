//! Device list files
//!
//! One device per line. The first whitespace-separated token is the
//! address; anything after it (site names, comments) is ignored. Blank
//! lines are skipped.

use std::path::Path;

use tracing::debug;

use crate::error::CoreError;

/// Addresses listed in `content`, in file order
#[must_use]
pub fn parse_device_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Read and parse a device list file
///
/// # Errors
/// Returns `CoreError::SourceError` if the file cannot be read.
pub async fn read_device_file(path: impl AsRef<Path>) -> Result<Vec<String>, CoreError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::SourceError(format!("{}: {e}", path.display())))?;

    let addresses = parse_device_list(&content);
    debug!(path = %path.display(), count = addresses.len(), "read device list");
    Ok(addresses)
}
