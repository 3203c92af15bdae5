//! Destination for crawl entries.

use std::convert::Infallible;

use crate::entry::CrawlEntry;

/// Something that durably records crawl entries, one call per entry.
///
/// The walker treats any error as fatal and stops immediately.
pub trait EntrySink {
    /// Error reported when an entry cannot be recorded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record a single entry.
    fn insert(&mut self, entry: &CrawlEntry) -> Result<(), Self::Error>;
}

impl EntrySink for Vec<CrawlEntry> {
    type Error = Infallible;

    fn insert(&mut self, entry: &CrawlEntry) -> Result<(), Self::Error> {
        self.push(entry.clone());
        Ok(())
    }
}

impl<S: EntrySink + ?Sized> EntrySink for &mut S {
    type Error = S::Error;

    fn insert(&mut self, entry: &CrawlEntry) -> Result<(), Self::Error> {
        (**self).insert(entry)
    }
}
