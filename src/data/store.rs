use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataLoadError;
use super::loader::load_file;
use super::model::LoadedDataset;

// ---------------------------------------------------------------------------
// SourceIdentity – what makes two loads "the same source"
// ---------------------------------------------------------------------------

/// Canonical path plus the file's length and modification time. Any change
/// to the file on disk yields a different identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceIdentity {
    /// Stat the file. Fails the same way a load would if it cannot be read.
    pub fn of(path: &Path) -> Result<Self, DataLoadError> {
        let io_err = |source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;
        Ok(SourceIdentity {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// DatasetStore – explicit load cache
// ---------------------------------------------------------------------------

struct CachedDataset {
    identity: SourceIdentity,
    dataset: Arc<LoadedDataset>,
}

/// Loads each source once and hands out the shared, read-only result until
/// the file changes.
///
/// Entries are keyed by canonical path; a hit additionally requires the
/// stored [`SourceIdentity`] to match the file as it is now.
#[derive(Default)]
pub struct DatasetStore {
    cache: HashMap<PathBuf, CachedDataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the normalized dataset for `path`, reading the file only if it
    /// has not been seen or has changed since the last read.
    pub fn load(&mut self, path: &Path) -> Result<Arc<LoadedDataset>, DataLoadError> {
        let identity = match SourceIdentity::of(path) {
            Ok(identity) => identity,
            Err(e) => {
                // The file is gone or unreadable: forget whatever we had for it.
                if let Ok(canonical) = path.canonicalize() {
                    self.cache.remove(&canonical);
                }
                return Err(e);
            }
        };

        if let Some(cached) = self.cache.get(&identity.path) {
            if cached.identity == identity {
                log::debug!("Dataset cache hit for {}", identity.path.display());
                return Ok(Arc::clone(&cached.dataset));
            }
            log::info!(
                "{} changed on disk, reloading",
                identity.path.display()
            );
        }

        match load_file(&identity.path) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.cache.insert(
                    identity.path.clone(),
                    CachedDataset {
                        identity,
                        dataset: Arc::clone(&dataset),
                    },
                );
                Ok(dataset)
            }
            Err(e) => {
                self.cache.remove(&identity.path);
                Err(e)
            }
        }
    }

    /// Drop the cached entry for `path`, if any. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.cache.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "category,rating,actual_price,discounted_price,discount_percentage\n";

    fn write_csv(path: &Path, rows: &str) {
        let mut f = std::fs::File::create(path).unwrap();
        write!(f, "{HEADER}{rows}").unwrap();
    }

    #[test]
    fn unchanged_source_is_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_csv(&path, "A,4.0,10,8,20%\n");

        let mut store = DatasetStore::new();
        let first = store.load(&path).unwrap();
        let second = store.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn changed_source_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_csv(&path, "A,4.0,10,8,20%\n");

        let mut store = DatasetStore::new();
        let first = store.load(&path).unwrap();
        write_csv(&path, "A,4.0,10,8,20%\nB,3.0,12,6,50%\n");
        let second = store.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_csv(&path, "A,4.0,10,8,20%\n");

        let mut store = DatasetStore::new();
        let first = store.load(&path).unwrap();
        assert!(store.invalidate(&path));
        assert!(!store.invalidate(&path));
        let second = store.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first.records.as_slice(), *second.records.as_slice());
    }

    #[test]
    fn failed_reload_evicts_the_stale_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        write_csv(&path, "A,4.0,10,8,20%\n");

        let mut store = DatasetStore::new();
        store.load(&path).unwrap();
        std::fs::write(&path, "category,rating\nA,4.0\n").unwrap();

        assert!(matches!(
            store.load(&path),
            Err(DataLoadError::MissingColumn { .. })
        ));
        assert!(store.is_empty());
    }
}
