use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::store::{Collections, StoreError};

pub const USERS_FILE: &str = "users.json";
pub const TRANSLATORS_FILE: &str = "translators.json";
pub const CLIENTS_FILE: &str = "clients.json";
const TEMP_FILE_SUFFIX: &str = ".tmp";

/// backing storage for the profile store.
///
/// `save` always receives all three collections and must replace the stored copy as a whole,
/// so a reader never observes a half-written collection.
pub trait Persistence: Send + Sync {
    /// loads every collection, falling back to an empty one for anything unreadable
    fn load(&self) -> Collections;

    fn save(&self, collections: &Collections) -> Result<(), StoreError>;
}

/// one pretty-printed JSON object per collection, keyed by stringified user id
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_collection<T: DeserializeOwned>(&self, file_name: &str) -> BTreeMap<i64, T> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            info!("No {} found, starting with an empty collection", path.display());
            return BTreeMap::new();
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        // serde_json coerces the string keys back into integers
        match serde_json::from_str::<BTreeMap<i64, T>>(&raw) {
            Ok(collection) => collection,
            Err(e) => {
                error!("Failed to parse {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn save_collection<T: Serialize>(
        &self,
        file_name: &str,
        collection: &BTreeMap<i64, T>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(collection)?;
        write_atomic(&self.dir.join(file_name), &bytes)
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Collections {
        let mut collections = Collections {
            users: self.load_collection(USERS_FILE),
            translators: self.load_collection(TRANSLATORS_FILE),
            clients: self.load_collection(CLIENTS_FILE),
        };
        collections.rekey();
        collections
    }

    fn save(&self, collections: &Collections) -> Result<(), StoreError> {
        self.save_collection(USERS_FILE, &collections.users)?;
        self.save_collection(TRANSLATORS_FILE, &collections.translators)?;
        self.save_collection(CLIENTS_FILE, &collections.clients)?;
        Ok(())
    }
}

/// writes to a sibling temp file and renames it over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = PathBuf::from(format!("{}{}", path.display(), TEMP_FILE_SUFFIX));
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        warn!("Failed to move {} into place: {}", tmp.display(), e);
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// in-process persistence used by tests and dry runs; counts every save
#[derive(Default)]
pub struct MemoryPersistence {
    stored: Mutex<Collections>,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(collections: Collections) -> Self {
        Self {
            stored: Mutex::new(collections),
            ..Self::default()
        }
    }

    /// every save returns an I/O error and leaves the stored copy untouched
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Collections {
        match self.stored.lock() {
            Ok(stored) => stored.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Collections {
        self.stored()
    }

    fn save(&self, collections: &Collections) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory persistence configured to fail",
            )));
        }
        let mut stored = match self.stored.lock() {
            Ok(stored) => stored,
            Err(poisoned) => poisoned.into_inner(),
        };
        *stored = collections.clone();
        Ok(())
    }
}
