//! Where saves live
//!
//! The file store writes to a temporary sibling and renames it over the save,
//! so a crash mid-write leaves the previous save intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// Backing storage for a single save slot
pub trait SaveStore {
    /// Read the save; `MissingSaveFile` when none exists
    fn read(&self) -> Result<String, PersistError>;

    /// Replace the save with `contents`
    fn write(&mut self, contents: &str) -> Result<(), PersistError>;
}

/// Save slot backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<String, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PersistError::MissingSaveFile),
            Err(e) => Err(PersistError::Io(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory save slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub contents: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<String, PersistError> {
        self.contents.clone().ok_or(PersistError::MissingSaveFile)
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}
