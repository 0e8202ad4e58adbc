//! JSON snapshots of the durable caches.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Node value cache file name inside the cache directory.
pub const NODE_CACHE_FILE: &str = "tree.minimax.json";
/// Deepening progress cache file name inside the cache directory.
pub const DEEPENING_CACHE_FILE: &str = "tree.search.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot<K, V> {
    version: u32,
    entries: Vec<(K, V)>,
}

/// Read every entry stored in `path`.
pub fn load<K, V>(path: &Path) -> Result<Vec<(K, V)>, EngineError>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot<K, V> =
        serde_json::from_str(&text).map_err(|source| EngineError::CorruptCache {
            path: path.to_path_buf(),
            source,
        })?;
    if snapshot.version != FORMAT_VERSION {
        return Err(EngineError::CacheVersion {
            path: path.to_path_buf(),
            found: snapshot.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(snapshot.entries)
}

/// Write `entries` to `path`, replacing it atomically.
pub fn save<K: Serialize, V: Serialize>(path: &Path, entries: Vec<(K, V)>) -> Result<(), EngineError> {
    let io_error = |source: std::io::Error| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_error)?;
    }

    let snapshot = Snapshot {
        version: FORMAT_VERSION,
        entries,
    };
    let text = serde_json::to_string(&snapshot).map_err(EngineError::Encode)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("alphabeta-persist-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join(NODE_CACHE_FILE);
        save(&path, vec![(1u32, "a".to_string()), (2, "b".to_string())]).unwrap();
        let mut loaded: Vec<(u32, String)> = load(&path).unwrap();
        loaded.sort();
        assert_eq!(loaded, vec![(1, "a".to_string()), (2, "b".to_string())]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        let dir = scratch_dir("missing");
        let err = load::<u32, u32>(&dir.join(DEEPENING_CACHE_FILE)).unwrap_err();
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(NODE_CACHE_FILE);
        fs::write(&path, "{ not json").unwrap();
        let err = load::<u32, u32>(&path).unwrap_err();
        assert!(matches!(err, EngineError::CorruptCache { .. }));
        assert!(!err.is_missing_file());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_version_mismatch() {
        let dir = scratch_dir("version");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(NODE_CACHE_FILE);
        fs::write(&path, r#"{"version": 99, "entries": []}"#).unwrap();
        let err = load::<u32, u32>(&path).unwrap_err();
        assert!(matches!(err, EngineError::CacheVersion { found: 99, .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
