//! Sequential top-down tree walker.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use dircrawl_core::{
    CrawlConfig, CrawlEntry, CrawlError, CrawlStats, EntrySink, is_library_path, normalize,
};

/// Emit a progress line every this many recorded entries.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Walks a directory tree and hands one normalized entry per object to a sink.
///
/// The root is recorded first (and not counted), then every descendant in
/// top-down order. Symbolic links to directories are only descended when
/// the config asks for it; a followed link that leads back to a directory
/// on the current descent path is recorded but not entered.
pub struct TreeWalker<'a> {
    config: &'a CrawlConfig,
}

impl<'a> TreeWalker<'a> {
    /// Create a walker for a config.
    pub fn new(config: &'a CrawlConfig) -> Self {
        Self { config }
    }

    /// Walk the tree, recording every entry into `sink`.
    ///
    /// Stops at the first entry that cannot be read or recorded. Entries
    /// already recorded stay recorded.
    pub fn walk<S: EntrySink>(&self, sink: &mut S) -> Result<CrawlStats, CrawlError> {
        let root = &self.config.root;
        let mut stats = CrawlStats::new();

        let root_entry = normalize(root)?;
        if !root_entry.is_dir() {
            return Err(CrawlError::invalid_argument(format!(
                "Directory {} not found. Process cancelled.",
                root.display()
            )));
        }
        record(sink, root, &root_entry)?;

        let skip_library = self.config.skip_library_namespace;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !(skip_library && is_library_path(e.path())));

        for result in walker {
            let (path, depth) = match result {
                Ok(entry) => (entry.path().to_path_buf(), entry.depth()),
                Err(err) => match self.recover(&err) {
                    Some(visit) => visit,
                    None => continue,
                },
            };

            self.visit(&path, depth, sink, &mut stats)?;
        }

        info!(
            dirs = stats.dir_count,
            files = stats.file_count,
            bytes = stats.total_size,
            "walk complete"
        );
        Ok(stats)
    }

    /// Normalize, record and count one descendant.
    fn visit<S: EntrySink>(
        &self,
        path: &Path,
        depth: usize,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlError> {
        let entry = normalize(path)?;
        record(sink, path, &entry)?;

        if entry.is_dir() {
            stats.record_dir(depth);
        } else {
            stats.record_file(path.to_path_buf(), entry.size_bytes, depth);
        }
        if entry.is_symlink {
            stats.record_symlink();
        }

        if stats.entry_count() % PROGRESS_INTERVAL == 0 {
            info!(
                entries = stats.entry_count(),
                bytes = stats.total_size,
                current = %path.display(),
                "crawl progress"
            );
        }
        Ok(())
    }

    /// Decide whether a traversal error still names an object to record.
    ///
    /// Two cases do: a followed link that would re-enter one of its own
    /// ancestors, and a broken link met while following links. Anything else
    /// is an unreadable listing, which is logged and passed over.
    fn recover(&self, err: &walkdir::Error) -> Option<(PathBuf, usize)> {
        let path = err.path()?.to_path_buf();
        if self.config.skip_library_namespace && is_library_path(&path) {
            return None;
        }

        if let Some(ancestor) = err.loop_ancestor() {
            warn!(
                path = %path.display(),
                ancestor = %ancestor.display(),
                "symlink cycle, not descending"
            );
            return Some((path, err.depth()));
        }

        let is_link = std::fs::symlink_metadata(&path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        if is_link && !path.exists() {
            debug!(path = %path.display(), "broken symlink");
            return Some((path, err.depth()));
        }

        warn!(path = %path.display(), error = %err, "unable to read directory, skipping");
        None
    }
}

/// Hand one entry to the sink, mapping failure to a fatal crawl error.
fn record<S: EntrySink>(sink: &mut S, path: &Path, entry: &CrawlEntry) -> Result<(), CrawlError> {
    debug!(path = %path.display(), kind = %entry.kind, size = entry.size_bytes, "recording entry");
    sink.insert(entry)
        .map_err(|e| CrawlError::persistence(path, e))
}
