//! Seed file loading.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::errors::SeedError;
use super::memory::InMemoryStore;

/// Read a seed file shaped `{ scope: { collection: { key: document } } }`
/// and load it into `store`.
pub fn load_seed_file(store: &InMemoryStore, path: &Path) -> Result<usize, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let seed: Value = serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = store.load_seed(&seed)?;
    info!(path = %path.display(), documents = loaded, "loaded seed data");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocLocation;
    use std::io::Write;

    #[test]
    fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"acme": {{"users": {{"alice": {{"user": "alice"}}}}}}}}"#).unwrap();

        let store = InMemoryStore::new();
        assert_eq!(load_seed_file(&store, file.path()).unwrap(), 1);
        assert!(store.document(&DocLocation::new("acme", "users", "alice")).is_some());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let store = InMemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_seed_file(&store, &dir.path().join("absent.json")),
            Err(SeedError::Io { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(matches!(load_seed_file(&store, &bad), Err(SeedError::Parse { .. })));
    }
}
