//! Durable JSON records for the commerce engine.
//!
//! The engine persists exactly two independent records, keyed
//! separately: the anonymous cart and the user profile. Each record is
//! one JSON file in the data directory, wrapped in an envelope carrying
//! a schema version tag so future shape changes can migrate old data
//! instead of misparsing it. Absence of a record is a valid state
//! (empty cart / logged out).
//!
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a half-written record behind.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Schema version written into every record envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Keys of the engine's persisted records.
pub mod keys {
    /// The anonymous cart record.
    pub const CART: &str = "cart";
    /// The user profile record (identity + addresses + orders).
    pub const PROFILE: &str = "profile";
}

/// Errors from reading or writing persisted records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("invalid record encoding: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record was written by an unsupported schema version.
    #[error("record {key} has unsupported schema version {found}")]
    SchemaVersion {
        /// Key of the offending record.
        key: String,
        /// Version tag found in the envelope.
        found: u32,
    },

    /// The record key is not usable as a file name.
    #[error("invalid record key: {0:?}")]
    InvalidKey(String),
}

/// Versioned envelope around every persisted record.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    schema: u32,
    data: T,
}

/// Reads only the version tag, so a record written by another schema
/// version is reported as such even when its data shape changed.
#[derive(Debug, Deserialize)]
struct VersionProbe {
    schema: u32,
}

/// File-backed store holding one JSON record per key.
///
/// Cheap to clone; clones share the same data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Load the record stored under `key`, or `None` if it was never
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::SchemaVersion`] for records written by
    /// an unsupported schema, [`StorageError::Serialization`] for
    /// unreadable content and [`StorageError::Io`] for filesystem
    /// failures.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.record_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let probe: VersionProbe = serde_json::from_str(&content)?;
        if probe.schema != SCHEMA_VERSION {
            return Err(StorageError::SchemaVersion {
                key: key.to_owned(),
                found: probe.schema,
            });
        }
        let envelope: Envelope<T> = serde_json::from_str(&content)?;
        Ok(Some(envelope.data))
    }

    /// Persist `data` under `key`, replacing any previous record.
    ///
    /// The write is atomic: the envelope is written to a temp sibling,
    /// synced and renamed over the record file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if `data` cannot be
    /// encoded and [`StorageError::Io`] for filesystem failures.
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        let envelope = Envelope {
            schema: SCHEMA_VERSION,
            data,
        };
        let content = serde_json::to_string_pretty(&envelope)?;

        let tmp = self
            .dir
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));
        let write_result = (|| {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            drop(file);
            match fs::rename(&tmp, &path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    fs::remove_file(&path)?;
                    fs::rename(&tmp, &path)
                }
                Err(e) => Err(e),
            }
        })();

        if let Err(e) = write_result {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::Io(e));
        }
        debug!(key, "record persisted");
        Ok(())
    }

    /// Delete the record under `key`; absent records are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be
    /// removed.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.record_path(key)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.chars().any(char::is_control)
        {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        value: String,
        count: u32,
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let sample = Sample {
            value: "hello".to_owned(),
            count: 3,
        };
        store.save("cart", &sample).unwrap();

        let loaded: Sample = store.load("cart").unwrap().unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_absent_record_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let loaded: Option<Sample> = store.load("profile").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store
            .save(
                "cart",
                &Sample {
                    value: "first".to_owned(),
                    count: 1,
                },
            )
            .unwrap();
        store
            .save(
                "cart",
                &Sample {
                    value: "second".to_owned(),
                    count: 2,
                },
            )
            .unwrap();

        let loaded: Sample = store.load("cart").unwrap().unwrap();
        assert_eq!(loaded.value, "second");
    }

    #[test]
    fn test_unsupported_schema_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        std::fs::write(
            dir.path().join("cart.json"),
            r#"{"schema": 99, "data": {"value": "x", "count": 0}}"#,
        )
        .unwrap();

        let result: Result<Option<Sample>, _> = store.load("cart");
        assert!(matches!(
            result,
            Err(StorageError::SchemaVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_schema_mismatch_wins_over_shape_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        // A future record whose data no longer matches today's shape
        // must still be reported by version, not as a parse failure.
        std::fs::write(
            dir.path().join("profile.json"),
            r#"{"schema": 2, "data": {"entirely": ["different", "shape"]}}"#,
        )
        .unwrap();

        let result: Result<Option<Sample>, _> = store.load("profile");
        assert!(matches!(
            result,
            Err(StorageError::SchemaVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_remove_then_load_is_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store
            .save(
                "cart",
                &Sample {
                    value: "x".to_owned(),
                    count: 1,
                },
            )
            .unwrap();
        store.remove("cart").unwrap();
        store.remove("cart").unwrap(); // absent is a no-op

        let loaded: Option<Sample> = store.load("cart").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let loaded: Result<Option<Sample>, _> = store.load("../etc/passwd");
        assert!(matches!(loaded, Err(StorageError::InvalidKey(_))));
        let loaded: Result<Option<Sample>, _> = store.load("");
        assert!(matches!(loaded, Err(StorageError::InvalidKey(_))));
        let loaded: Result<Option<Sample>, _> = store.load("a/b");
        assert!(matches!(loaded, Err(StorageError::InvalidKey(_))));
    }
}
