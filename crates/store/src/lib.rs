//! Business record stores
//!
//! Two `BusinessStore` implementations over the scraper's output:
//! `JsonStore` reads the record dump the scraper writes to disk, and
//! `MemoryStore` serves a fixed set of records for tests and demos.
//! Both answer the same type-filtered query the analysis pipeline runs.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use marketlens_core::BusinessRecord;

/// Apply the store query semantics to a slice of records:
/// case-insensitive substring match of any pattern against the type
/// field, coordinates required, rating-descending order, capped at
/// `limit`.
pub(crate) fn query_records(
    records: &[BusinessRecord],
    patterns: &[String],
    limit: usize,
) -> Vec<BusinessRecord> {
    let lowered: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();

    let mut matched: Vec<BusinessRecord> = records
        .iter()
        .filter(|record| {
            let business_type = record.business_type.to_lowercase();
            lowered.iter().any(|pattern| business_type.contains(pattern.as_str()))
        })
        .filter(|record| record.coords().is_some())
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matched.truncate(limit);
    matched
}
