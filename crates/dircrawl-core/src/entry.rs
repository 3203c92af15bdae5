//! Crawl entries and their normalization.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use chrono::{DateTime, Local, TimeZone};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::warn;

use crate::error::CrawlError;

/// Textual layout of persisted timestamps. Sub-second precision is fixed at zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H.%M.%S.000000";

/// `0001-01-01 00:00:00`, the earliest persistable timestamp, in Unix seconds.
const EARLIEST_TIMESTAMP_SECS: i64 = -62_135_596_800;

/// `9999-12-31 23:59:59`, the latest persistable timestamp, in Unix seconds.
const LATEST_TIMESTAMP_SECS: i64 = 253_402_300_799;

/// Kind of crawled object as persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file, broken link, or any other non-directory object.
    File,
    /// Directory, or a link resolving to one.
    Dir,
}

/// One persisted record describing a visited filesystem object.
///
/// String fields are stored in their quote-escaped form (every `'` doubled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlEntry {
    /// Complete path as visited.
    pub full_path: String,
    /// Base name; empty for directories.
    pub file_name: CompactString,
    /// Base name without its extension; empty for directories.
    pub name_prefix: CompactString,
    /// Extension including the leading dot; empty for directories.
    pub extension: CompactString,
    /// Size in bytes. Always 0 for directories and symlinks.
    pub size_bytes: u64,
    /// File or directory.
    pub kind: EntryKind,
    /// Whether the visited path itself is a symbolic link.
    pub is_symlink: bool,
    /// Status change time.
    pub created_at: String,
    /// Modification time.
    pub modified_at: String,
    /// Access time.
    pub accessed_at: String,
}

impl CrawlEntry {
    /// Check if this is a directory entry.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Check if this is a file entry.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// The symlink flag in its persisted form.
    pub fn symlink_flag(&self) -> &'static str {
        if self.is_symlink { "True" } else { "False" }
    }
}

/// Status-change, modification and access times of an object, in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTimes {
    pub status_changed: i64,
    pub modified: i64,
    pub accessed: i64,
}

impl EntryTimes {
    /// Read the three times from metadata.
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            status_changed: metadata.ctime(),
            modified: metadata.mtime(),
            accessed: metadata.atime(),
        }
    }

    /// Read the three times from metadata.
    ///
    /// Without ctime, creation time stands in for the status change time.
    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let modified = metadata.modified().map(unix_seconds).unwrap_or(0);
        Self {
            status_changed: metadata.created().map(unix_seconds).unwrap_or(modified),
            modified,
            accessed: metadata.accessed().map(unix_seconds).unwrap_or(0),
        }
    }
}

#[cfg(not(unix))]
fn unix_seconds(time: std::time::SystemTime) -> i64 {
    match time.duration_since(std::time::UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}

/// Build the persisted record for `path`.
///
/// Symbolic links are never dereferenced for size or times; they are only
/// resolved to decide whether they point at a directory. A broken link is a
/// file entry.
pub fn normalize(path: &Path) -> Result<CrawlEntry, CrawlError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| CrawlError::stat(path, e))?;
    let is_symlink = metadata.file_type().is_symlink();

    let is_dir = if is_symlink {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    } else {
        metadata.is_dir()
    };

    let times = EntryTimes::from_metadata(&metadata);

    let (kind, file_name, name_prefix, extension, size_bytes) = if is_dir {
        (
            EntryKind::Dir,
            CompactString::default(),
            CompactString::default(),
            CompactString::default(),
            0,
        )
    } else {
        let name = path.file_name().map(text).unwrap_or_default();
        let (prefix, ext) = split_name(&name);
        let size = if is_symlink { 0 } else { metadata.len() };
        (
            EntryKind::File,
            escape_quotes(&name).into(),
            escape_quotes(prefix).into(),
            escape_quotes(ext).into(),
            size,
        )
    };

    Ok(CrawlEntry {
        full_path: escape_quotes(&text(path.as_os_str())),
        file_name,
        name_prefix,
        extension,
        size_bytes,
        kind,
        is_symlink,
        created_at: format_timestamp(times.status_changed),
        modified_at: format_timestamp(times.modified),
        accessed_at: format_timestamp(times.accessed),
    })
}

/// Split a base name at its last dot into prefix and extension.
///
/// The extension keeps its dot. Leading dots get no special treatment, so
/// `.profile` has an empty prefix.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Text form of a path component. Non-UTF-8 bytes become U+FFFD.
fn text(value: &OsStr) -> Cow<'_, str> {
    let lossy = value.to_string_lossy();
    if matches!(lossy, Cow::Owned(_)) {
        warn!(raw = ?value, stored = %lossy, "path is not valid UTF-8, storing lossy form");
    }
    lossy
}

/// Double every single quote so the value can sit inside a quoted literal.
pub fn escape_quotes(value: &str) -> String {
    value.replace('\'', "''")
}

/// Format Unix seconds in local time using [`TIMESTAMP_FORMAT`].
///
/// Times outside years 1 through 9999 are clamped to the nearest end of
/// that range.
pub fn format_timestamp(secs: i64) -> String {
    // Offset lookup needs an in-range instant even when `secs` is not.
    let instant = DateTime::from_timestamp(
        secs.clamp(EARLIEST_TIMESTAMP_SECS, LATEST_TIMESTAMP_SECS),
        0,
    )
    .unwrap_or_default();
    let offset = Local
        .offset_from_utc_datetime(&instant.naive_utc())
        .local_minus_utc();

    let local_secs = secs
        .saturating_add(i64::from(offset))
        .clamp(EARLIEST_TIMESTAMP_SECS, LATEST_TIMESTAMP_SECS);
    DateTime::from_timestamp(local_secs, 0)
        .unwrap_or_default()
        .naive_utc()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
