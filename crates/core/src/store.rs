//! Store query boundary
//!
//! The document store's ingestion and indexing live outside this system;
//! the analysis core only needs a read-only, type-filtered view of the
//! scraped records. Implementations live in `marketlens-store`.

use async_trait::async_trait;

use crate::business::BusinessRecord;
use crate::error::Result;

/// Read-only query interface over the scraped business records
///
/// The analysis core never writes through this trait.
#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// Fetch records whose type field matches any of the given patterns
    /// (case-insensitive substring match) and that carry geographic
    /// coordinates, ordered by descending rating, capped at `limit`.
    async fn find_by_type_patterns(
        &self,
        patterns: &[String],
        limit: usize,
    ) -> Result<Vec<BusinessRecord>>;

    /// Connectivity probe for health checks
    async fn ping(&self) -> bool;
}
