//! In-memory mock filesystem for testing collectors without real `/proc`.
//!
//! Clones of a `MockFs` share the same storage, which is how tests model a
//! warm container: two inspector instances, one marker file.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MockState {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Paths that exist but fail to read (permission denied).
    unreadable: HashSet<PathBuf>,
    /// When set, `create_new` fails as on a read-only mount.
    read_only: bool,
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    state: Arc<RwLock<MockState>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a file with the given content, replacing any previous one.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.write_state();
        state.unreadable.remove(&path);
        state.files.insert(path, content.into());
    }

    /// Adds a file that exists but cannot be read.
    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.write_state();
        state.files.remove(&path);
        state.unreadable.insert(path);
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.write_state();
        state.files.remove(path);
        state.unreadable.remove(path);
    }

    /// Makes every later `create_new` fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.write_state().read_only = read_only;
    }

    /// Returns the current content of a file, if it exists and is readable.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_state().files.get(path.as_ref()).cloned()
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.read_state();
        if state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.read_state();
        state.files.contains_key(path) || state.unreadable.contains(path)
    }

    fn create_new(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut state = self.write_state();
        if state.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only filesystem: {:?}", path),
            ));
        }
        if state.files.contains_key(path) || state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {:?}", path),
            ));
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
