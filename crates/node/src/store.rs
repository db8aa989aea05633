// node/src/store.rs

use registry_core::Registry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot format version; bump on any incompatible layout change
pub const SCHEMA_VERSION: u32 = 1;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur loading or saving registry snapshots
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Unsupported snapshot schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },
}

/// Snapshot layout as written to disk
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    schema_version: u32,
    registry: Registry,
}

/// Persists the registry as a schema-versioned JSON snapshot.
///
/// There is no upgrade-in-place: a snapshot written by an incompatible
/// schema version is rejected with a distinct error, and migration is an
/// explicit offline step.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(data_dir: &str) -> Self {
        Self {
            path: Path::new(data_dir).join("registry.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> StoreResult<Registry> {
        let contents = fs::read_to_string(&self.path)?;

        // Check the version before attempting to decode the registry, so a
        // layout change surfaces as a version mismatch rather than a codec
        // error.
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        let found = value
            .get("schema_version")
            .and_then(|version| version.as_u64())
            .unwrap_or(0) as u32;
        if found != SCHEMA_VERSION {
            return Err(StoreError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            });
        }

        let snapshot: Snapshot = serde_json::from_value(value)?;
        Ok(snapshot.registry)
    }

    /// Write the snapshot through a temp file and rename, so a crash
    /// mid-write never leaves a torn snapshot behind.
    pub fn save(&self, registry: &Registry) -> StoreResult<()> {
        let snapshot = Snapshot {
            schema_version: SCHEMA_VERSION,
            registry: registry.clone(),
        };
        let contents = serde_json::to_string_pretty(&snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
