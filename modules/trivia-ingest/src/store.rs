// Persisted snapshot: one JSON document, replaced whole on every write.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};
use trivia_common::Snapshot;

use crate::error::Result;

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot` to a temp file beside the target, then rename it over
    /// the target. Readers see either the old document or the new one.
    pub fn store(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        info!(path = %self.path.display(), records = snapshot.total_records(), "Snapshot written");
        Ok(())
    }

    pub fn load(&self) -> Result<Snapshot> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// `load`, falling back to an empty snapshot when the file is missing or
    /// cannot be decoded.
    pub fn load_or_empty(&self) -> Snapshot {
        match self.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not load snapshot, using empty");
                Snapshot::empty()
            }
        }
    }
}

/// The snapshot request handlers read from. Handlers take an `Arc` of the
/// current value; it only changes through `reload` or `replace`.
pub struct SnapshotHandle {
    store: SnapshotStore,
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    pub fn open(store: SnapshotStore) -> Self {
        let initial = store.load_or_empty();
        Self {
            store,
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Re-read the store. On failure the previous snapshot stays current.
    pub fn reload(&self) -> Result<Arc<Snapshot>> {
        let fresh = Arc::new(self.store.load()?);
        self.swap(Arc::clone(&fresh));
        Ok(fresh)
    }

    /// Install a snapshot produced in-process (e.g. right after aggregation).
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let fresh = Arc::new(snapshot);
        self.swap(Arc::clone(&fresh));
        fresh
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    fn swap(&self, fresh: Arc<Snapshot>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = fresh;
    }
}
