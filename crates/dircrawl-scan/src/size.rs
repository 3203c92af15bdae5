//! Directory size summation.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use dircrawl_core::{CrawlError, ensure_directory};

/// Result of summing a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeReport {
    /// Files counted.
    pub file_count: u64,
    /// Sum of their sizes in bytes.
    pub total_size: u64,
}

/// Sum the sizes of all non-link, non-directory objects under `root`.
///
/// Links are neither followed nor counted. `on_file` sees each counted
/// path with its size and the running total.
pub fn directory_size<F>(root: &Path, mut on_file: F) -> Result<SizeReport, CrawlError>
where
    F: FnMut(&Path, u64, u64),
{
    ensure_directory(root)?;

    let mut report = SizeReport::default();
    for result in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "unable to read directory, skipping");
                continue;
            }
        };

        if entry.file_type().is_dir() || entry.path_is_symlink() {
            continue;
        }

        let size = entry
            .metadata()
            .map_err(|e| CrawlError::stat(entry.path(), e.into()))?
            .len();
        report.file_count += 1;
        report.total_size += size;
        on_file(entry.path(), size, report.total_size);
    }

    Ok(report)
}
