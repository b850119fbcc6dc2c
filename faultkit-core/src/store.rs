//! # Store
//!
//! File-system-like collaborator. Backends report raw `io::Error`s; the
//! `Store` front end classifies them and adds restricted locations and
//! big-endian integer framing.

use crate::error::{self, Result};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Store backend trait
pub trait StoreBackend: Send + Sync {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn name(&self) -> &'static str;
}

/// In-memory store (volatile, but useful for testing)
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreBackend for MemoryStore {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files().insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files().remove(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files().contains_key(path)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// File-based store rooted at a base directory.
///
/// Relative paths resolve against the base; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            error::io_failed(&base_path, e).with_operation("store::create_dir")
        })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl StoreBackend for FileStore {
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(self.resolve(path), contents)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let path = self.resolve(path);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// High-level store interface
pub struct Store {
    backend: Box<dyn StoreBackend>,
    /// Path prefixes that refuse writes
    restricted: Vec<PathBuf>,
}

impl Store {
    /// Create a store with in-memory backend
    pub fn memory() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    /// Create a store with file backend
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_backend(FileStore::new(path)?))
    }

    /// Create a store with custom backend
    pub fn with_backend(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            restricted: Vec::new(),
        }
    }

    /// Refuse writes to anything under `prefix`
    pub fn with_restricted(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.restricted.push(prefix.into());
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// True if writes to `path` are refused
    pub fn is_restricted(&self, path: &Path) -> bool {
        self.restricted.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Write raw bytes
    pub fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.is_restricted(path) {
            return Err(error::write_denied(path).with_operation("store::write"));
        }
        self.backend
            .write(path, contents)
            .map_err(|e| error::io_failed(path, e).with_operation("store::write"))
    }

    /// Read raw bytes
    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.backend
            .read(path)
            .map_err(|e| error::io_failed(path, e).with_operation("store::read"))
    }

    /// Remove a file; removing something absent is not an error
    pub fn remove(&self, path: &Path) -> Result<()> {
        if !self.backend.exists(path) {
            return Ok(());
        }
        if self.is_restricted(path) {
            return Err(error::write_denied(path).with_operation("store::remove"));
        }
        self.backend
            .remove(path)
            .map_err(|e| error::io_failed(path, e).with_operation("store::remove"))
    }

    /// Check if a path exists
    pub fn exists(&self, path: &Path) -> bool {
        self.backend.exists(path)
    }

    // ========================================================================
    // Integer framing
    // ========================================================================

    /// Write integers as consecutive big-endian 4-byte words
    pub fn write_ints(&self, path: &Path, values: &[i32]) -> Result<()> {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.write(path, &bytes)
    }

    /// Open a file for reading big-endian integers
    pub fn open_ints(&self, path: &Path) -> Result<IntReader> {
        let bytes = self.read(path)?;
        Ok(IntReader::new(path, bytes))
    }
}

/// Reads big-endian `i32`s from a loaded file
#[derive(Debug)]
pub struct IntReader {
    path: PathBuf,
    cursor: Cursor<Vec<u8>>,
}

impl IntReader {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            cursor: Cursor::new(bytes),
        }
    }

    /// Read the next integer; fails with PrematureEndOfInput once the
    /// content is consumed.
    pub fn read_i32(&mut self) -> Result<i32> {
        let offset = self.cursor.position() as usize;
        let mut word = [0u8; 4];
        match self.cursor.read_exact(&mut word) {
            Ok(()) => Ok(i32::from_be_bytes(word)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(error::end_of_input(&self.path, offset).with_operation("store::read_i32"))
            }
            Err(e) => Err(error::io_failed(&self.path, e).with_operation("store::read_i32")),
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }
}
