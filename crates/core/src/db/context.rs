use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::backends::SnapshotHost;
use crate::db::{load_config, Database, UnidisConfig};

/// Convenience wrapper bundling config, snapshot path, and an open Database.
#[derive(Debug)]
pub struct DatabaseContext {
    pub config: UnidisConfig,
    pub snapshot_path: PathBuf,
    pub db: Database,
}

impl DatabaseContext {
    /// Load an optional config file and open the snapshot with it.
    pub fn open(snapshot: impl AsRef<Path>, config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => UnidisConfig::default(),
        };
        Self::open_with_config(snapshot, config)
    }

    pub fn open_with_config(snapshot: impl AsRef<Path>, config: UnidisConfig) -> Result<Self> {
        let snapshot_path = snapshot.as_ref().to_path_buf();
        let host = SnapshotHost::from_path(&snapshot_path).with_context(|| {
            format!("Failed to load analysis snapshot at {}", snapshot_path.display())
        })?;
        let db = Database::with_config(host, &config);
        Ok(Self { config, snapshot_path, db })
    }
}
