//! A byte-oriented storage port.
//!
//! The repositories are written against this trait rather than the
//! filesystem directly, so they can be exercised against [`MemStore`]
//! without touching disk.

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::PathBuf,
    sync::Mutex,
};

use walkdir::WalkDir;

/// A flat keyed store of byte blobs.
///
/// Keys are relative, `/`-separated paths. Reading a missing key fails with
/// [`io::ErrorKind::NotFound`].
pub trait Store: Sync {
    /// Lists every key in the store, in sorted order.
    fn keys(&self) -> Vec<String>;

    /// Reads the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error with kind [`io::ErrorKind::NotFound`] if the key
    /// does not exist, or another I/O error if the read fails.
    fn read(&self, key: &str) -> io::Result<Vec<u8>>;

    /// Writes `bytes` under `key`, replacing any existing blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// A [`Store`] backed by a directory on disk.
///
/// Keys map to file paths relative to the root. Writes create missing
/// parent directories.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens a store rooted at the given directory.
    ///
    /// The directory does not need to exist yet; a missing root simply
    /// lists no keys.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory of the store.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl Store for FsStore {
    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(|relative| relative.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        keys.sort();
        keys
    }

    fn read(&self, key: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }
}

/// An in-memory [`Store`] for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl Store for MemStore {
    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self, key: &str) -> io::Result<Vec<u8>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("store lock poisoned"))?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such key: {key}")))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("store lock poisoned"))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn fs_store_lists_files_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.md"), "a").unwrap();
        std::fs::create_dir_all(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested/b.md"), "b").unwrap();

        let store = FsStore::new(tmp.path().to_path_buf());
        assert_eq!(store.keys(), vec!["a.md", "nested/b.md"]);
    }

    #[test]
    fn fs_store_missing_root_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("does-not-exist"));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn fs_store_read_missing_key_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());

        let error = store.read("missing.md").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn fs_store_write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());

        store.write("deep/nested/key.json", b"[]").unwrap();

        assert_eq!(store.read("deep/nested/key.json").unwrap(), b"[]");
        assert!(tmp.path().join("deep/nested/key.json").exists());
    }

    #[test]
    fn mem_store_round_trip() {
        let store = MemStore::new();
        store.write("key", b"value").unwrap();

        assert_eq!(store.read("key").unwrap(), b"value");
        assert_eq!(store.keys(), vec!["key"]);
    }

    #[test]
    fn mem_store_read_missing_key_is_not_found() {
        let store = MemStore::new();
        let error = store.read("missing").unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn mem_store_with_entries() {
        let store = MemStore::with_entries([("a.md", "one"), ("b.md", "two")]);
        assert_eq!(store.keys(), vec!["a.md", "b.md"]);
        assert_eq!(store.read("b.md").unwrap(), b"two");
    }
}
