//! History stores — most-recent-first, capacity-bounded record lists.
//!
//! Two backends share the same eviction rule: `MemoryHistory` for tests and
//! embedding, `FileHistory` for a JSON file under the storage root.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::Result;
use crate::models::HistoryRecord;

/// Maximum records kept; the oldest is evicted on overflow.
pub const HISTORY_CAPACITY: usize = 20;

/// Trait for history backends. Implementations own their locking.
pub trait HistoryStore: Send + Sync {
    /// Insert at the front, evicting past [`HISTORY_CAPACITY`].
    fn append(&self, record: HistoryRecord) -> Result<()>;
    /// All records, most recent first.
    fn list(&self) -> Vec<HistoryRecord>;
    /// Remove the record with `id`. Returns whether one was removed.
    fn remove_by_id(&self, id: &str) -> Result<bool>;
    /// Replace the whole list (truncated to capacity).
    fn replace_all(&self, records: Vec<HistoryRecord>) -> Result<()>;
    fn clear(&self) -> Result<()>;

    fn get(&self, id: &str) -> Option<HistoryRecord> {
        self.list().into_iter().find(|r| r.id == id)
    }
}

fn push_bounded(records: &mut Vec<HistoryRecord>, record: HistoryRecord) {
    records.insert(0, record);
    if records.len() > HISTORY_CAPACITY {
        let evicted = records.len() - HISTORY_CAPACITY;
        records.truncate(HISTORY_CAPACITY);
        log::debug!("qrpulse: history full, evicted {} oldest record(s)", evicted);
    }
}

fn remove_id(records: &mut Vec<HistoryRecord>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id != id);
    records.len() != before
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, record: HistoryRecord) -> Result<()> {
        push_bounded(&mut self.records.lock(), record);
        Ok(())
    }

    fn list(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    fn remove_by_id(&self, id: &str) -> Result<bool> {
        Ok(remove_id(&mut self.records.lock(), id))
    }

    fn replace_all(&self, mut records: Vec<HistoryRecord>) -> Result<()> {
        records.truncate(HISTORY_CAPACITY);
        *self.records.lock() = records;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.records.lock().clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// History persisted as a JSON array. Every mutation rewrites the file.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    records: Mutex<Vec<HistoryRecord>>,
}

impl FileHistory {
    /// Open the store at `path`: read what is there, or start empty.
    ///
    /// A missing file is an empty history. An unreadable or corrupt file is
    /// logged and also treated as empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<HistoryRecord>>(&text) {
                Ok(mut records) => {
                    records.truncate(HISTORY_CAPACITY);
                    records
                }
                Err(e) => {
                    log::warn!("qrpulse: ignoring corrupt history {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("qrpulse: cannot read history {}: {}", path.display(), e);
                Vec::new()
            }
        };
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[HistoryRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(records)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HistoryStore for FileHistory {
    fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        push_bounded(&mut next, record);
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn list(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    fn remove_by_id(&self, id: &str) -> Result<bool> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        if !remove_id(&mut next, id) {
            return Ok(false);
        }
        self.persist(&next)?;
        *records = next;
        Ok(true)
    }

    fn replace_all(&self, mut next: Vec<HistoryRecord>) -> Result<()> {
        next.truncate(HISTORY_CAPACITY);
        let mut records = self.records.lock();
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut records = self.records.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        records.clear();
        Ok(())
    }
}
