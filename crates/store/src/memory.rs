//! In-memory record store

use async_trait::async_trait;

use marketlens_core::{BusinessRecord, BusinessStore, Result};

use crate::query_records;

/// Fixed-set store backed by a vector of records
///
/// Used in tests and demos; also handy as a cache-warmed snapshot when
/// the record dump fits in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<BusinessRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<BusinessRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn find_by_type_patterns(
        &self,
        patterns: &[String],
        limit: usize,
    ) -> Result<Vec<BusinessRecord>> {
        Ok(query_records(&self.records, patterns, limit))
    }

    async fn ping(&self) -> bool {
        true
    }
}
