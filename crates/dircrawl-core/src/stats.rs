//! Running aggregate for a crawl run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Counters accumulated while walking. The root entry is never counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Directories recorded below the root.
    pub dir_count: u64,
    /// Files recorded, symlinked files included.
    pub file_count: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Recorded entries that are symbolic links.
    pub symlink_count: u64,
    /// Deepest level reached (root children are depth 1).
    pub max_depth: usize,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl CrawlStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, path: PathBuf, size: u64, depth: usize) {
        self.file_count += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path, size));
        }
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: usize) {
        self.dir_count += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self) {
        self.symlink_count += 1;
    }

    /// Total recorded entries, root excluded.
    pub fn entry_count(&self) -> u64 {
        self.dir_count + self.file_count
    }
}
