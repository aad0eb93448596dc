//! JSON dump record store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use marketlens_core::{BusinessRecord, BusinessStore, Error, Result};

use crate::query_records;

/// Store backed by the scraper's JSON record dump
///
/// The dump is a single JSON array of business documents. It is loaded
/// once at open time; `reload` re-reads the file when the scraper has
/// run again.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: RwLock<Vec<BusinessRecord>>,
}

impl JsonStore {
    /// Open a store over a JSON dump file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = load_records(&path)?;
        tracing::info!(path = %path.display(), count = records.len(), "record dump loaded");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Re-read the dump file, replacing the in-memory records
    pub fn reload(&self) -> Result<usize> {
        let records = load_records(&self.path)?;
        let count = records.len();
        *self.records.write() = records;
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

fn load_records(path: &Path) -> Result<Vec<BusinessRecord>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Store(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Store(format!("cannot parse {}: {e}", path.display())))
}

#[async_trait]
impl BusinessStore for JsonStore {
    async fn find_by_type_patterns(
        &self,
        patterns: &[String],
        limit: usize,
    ) -> Result<Vec<BusinessRecord>> {
        Ok(query_records(&self.records.read(), patterns, limit))
    }

    async fn ping(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct TempJson(PathBuf);

    impl TempJson {
        fn new(tag: &str, content: &str) -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!("marketlens-store-{tag}-{}.json", std::process::id()));
            std::fs::write(&path, content).unwrap();
            Self(path)
        }
    }

    impl Drop for TempJson {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[tokio::test]
    async fn test_open_query_and_reload() {
        let dump = TempJson::new(
            "roundtrip",
            r#"[
                {"name": "Le Zinc", "type": "Bar", "note_moyenne": 4.2, "lat": 48.85, "lon": 2.35},
                {"name": "Pharmacie Centrale", "type": "Pharmacie", "note_moyenne": 4.8, "lat": 48.86, "lon": 2.36}
            ]"#,
        );

        let store = JsonStore::open(&dump.0).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.ping().await);

        let hits = store
            .find_by_type_patterns(&["bar".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Le Zinc");

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&dump.0)
            .unwrap();
        file.write_all(b"[]").unwrap();
        drop(file);

        assert_eq!(store.reload().unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_missing_file_is_store_error() {
        let err = JsonStore::open("/nonexistent/dump.json").unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
