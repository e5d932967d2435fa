//! Durable key-value persistence.
//!
//! Each key holds one self-contained JSON document. Writes replace the whole
//! document and are all-or-nothing: a reader sees either the previous or the
//! new contents, never a torn write.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

/// Key of the persisted ledger snapshot.
pub const SNAPSHOT_KEY: &str = "trip_data";
/// Key of the persisted mutation queue.
pub const QUEUE_KEY: &str = "sync_queue";

pub trait LocalStore {
    /// Returns `None` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&self, key: &str, contents: &str) -> Result<(), StoreError>;
}

pub(crate) fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: LocalStore + ?Sized,
    T: DeserializeOwned,
{
    match store.load(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub(crate) fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: LocalStore + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value)?;
    store.save(key, &payload)
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl LocalStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;

        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }
}

/// Process-local store; contents are lost on exit. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        self.docs
            .borrow_mut()
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(uuid::Uuid::new_v4().to_string())
    }

    #[test]
    fn file_store_round_trips_and_reports_missing_keys() {
        let store = FileStore::new(scratch_dir());
        assert!(store.load(QUEUE_KEY).unwrap().is_none());

        store.save(QUEUE_KEY, "[1,2]").unwrap();
        store.save(QUEUE_KEY, "[3]").unwrap();
        assert_eq!(store.load(QUEUE_KEY).unwrap().as_deref(), Some("[3]"));
        assert!(!store.root().join("sync_queue.json.tmp").exists());

        let _ = fs::remove_dir_all(store.root());
    }

    #[test]
    fn typed_helpers_surface_corrupt_documents() {
        let store = MemoryStore::new();
        store.save(SNAPSHOT_KEY, "{not json").unwrap();
        let loaded: Result<Option<Vec<u32>>, _> = load_json(&store, SNAPSHOT_KEY);
        assert!(matches!(loaded, Err(StoreError::Json(_))));

        save_json(&store, QUEUE_KEY, &vec![1u32, 2]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, QUEUE_KEY).unwrap();
        assert_eq!(loaded, Some(vec![1, 2]));
    }
}
