//! Directory tree walking for dircrawl.
//!
//! # Overview
//!
//! `dircrawl-scan` traverses a directory tree and turns every visited object
//! into a [`CrawlEntry`] handed to an [`EntrySink`]. Key properties:
//!
//! - **Sequential, top-down** traversal via walkdir
//! - **Fail-fast**: the first unreadable entry or failed insert stops the walk
//! - **Cycle-safe** when following symbolic links
//! - **Library namespace filter** for `/QSYS.LIB` trees
//!
//! # Example
//!
//! ```rust,no_run
//! use dircrawl_core::{CrawlConfig, CrawlEntry, TableName};
//! use dircrawl_scan::TreeWalker;
//!
//! let config = CrawlConfig::builder()
//!     .root("/path/to/crawl")
//!     .table(TableName::parse("TMP.DIRCRAWL").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let mut rows: Vec<CrawlEntry> = Vec::new();
//! let stats = TreeWalker::new(&config).walk(&mut rows).unwrap();
//! println!("{} files, {} bytes", stats.file_count, stats.total_size);
//! ```

mod size;
mod walker;

pub use size::{SizeReport, directory_size};
pub use walker::TreeWalker;

// Re-export core types for convenience
pub use dircrawl_core::{CrawlConfig, CrawlEntry, CrawlError, CrawlStats, EntryKind, EntrySink};
