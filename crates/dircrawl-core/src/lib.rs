//! Core types and traits for dircrawl.
//!
//! This crate provides the data structures shared by the walker, the store
//! and the command line tool: crawl entries and their normalization, the run
//! configuration, table identifiers, and the running aggregate.

mod config;
mod entry;
mod error;
mod namespace;
mod sink;
mod stats;
mod table;

pub use config::{CrawlConfig, CrawlConfigBuilder, DEFAULT_DATABASE, ensure_directory};
pub use entry::{
    CrawlEntry, EntryKind, EntryTimes, TIMESTAMP_FORMAT, escape_quotes, format_timestamp,
    normalize, split_name,
};
pub use error::{BoxError, CrawlError};
pub use namespace::{LIBRARY_NAMESPACE_MARKER, is_library_path, library_path};
pub use sink::EntrySink;
pub use stats::CrawlStats;
pub use table::TableName;
