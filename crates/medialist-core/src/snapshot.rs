use bincode::{deserialize, serialize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::memory_store::{InMemoryStore, StoreState};
use crate::store::StoreError;

/// On-disk snapshot of an `InMemoryStore`
///
/// bincode with gzip compression, written atomically through a temp file.
pub struct StoreSnapshot {
    path: PathBuf,
}

impl StoreSnapshot {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the store from disk
    ///
    /// A missing file yields an empty store. A file that no longer decodes
    /// is copied to `*.bin.bak` and an empty store is returned.
    pub fn load(&self) -> Result<InMemoryStore, StoreError> {
        if !self.path.exists() {
            debug!("Store snapshot {:?} does not exist, starting empty", self.path);
            return Ok(InMemoryStore::new());
        }

        let start = std::time::Instant::now();
        let data = std::fs::read(&self.path)?;

        let mut decoder = GzDecoder::new(&data[..]);
        let mut decoded = Vec::new();
        if let Err(e) = decoder.read_to_end(&mut decoded) {
            return Ok(self.discard_incompatible(&e.to_string()));
        }

        let state: StoreState = match deserialize(&decoded) {
            Ok(state) => state,
            Err(e) => return Ok(self.discard_incompatible(&e.to_string())),
        };

        info!(
            "Loaded store: {} actor(s), {} media, {} list(s), {} item(s) in {:?}",
            state.actor_count(),
            state.media_count(),
            state.list_count(),
            state.item_count(),
            start.elapsed()
        );
        Ok(InMemoryStore::from_state(state))
    }

    fn discard_incompatible(&self, error: &str) -> InMemoryStore {
        let backup_path = self.path.with_extension("bin.bak");
        if let Err(backup_err) = std::fs::copy(&self.path, &backup_path) {
            warn!(
                "Failed to backup incompatible store snapshot: {}. Starting with empty store.",
                backup_err
            );
        } else {
            warn!(
                "Store snapshot incompatible ({}). Backed up to {:?} and starting with empty store.",
                error, backup_path
            );
        }
        InMemoryStore::new()
    }

    /// Save the store to disk
    pub async fn save(&self, store: &InMemoryStore) -> Result<(), StoreError> {
        let start = std::time::Instant::now();
        let state = store.snapshot_state().await;

        let serialized = serialize(&state).map_err(|e| StoreError::Encode(e.to_string()))?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&serialized)?;
        let encoded = encoder.finish()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, encoded)?;
        std::fs::rename(&temp_path, &self.path)?;

        info!(
            "Saved store: {} list(s), {} item(s) in {:?}",
            state.list_count(),
            state.item_count(),
            start.elapsed()
        );
        Ok(())
    }
}
