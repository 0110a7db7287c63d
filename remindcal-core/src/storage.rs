//! Byte-level persistence collaborators.

use log::info;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CalendarResult;

/// Where serialized calendar data (or any other blob) is kept.
pub trait Store: Send + Sync {
    fn save(&self, data: &[u8]) -> CalendarResult<()>;
    fn load(&self) -> CalendarResult<Vec<u8>>;
}

/// A single file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> CalendarResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Store for FileStore {
    /// Write to a sibling temp file, then rename over the target.
    fn save(&self, data: &[u8]) -> CalendarResult<()> {
        self.ensure_parent()?;

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        std::fs::write(&temp, data)?;
        std::fs::rename(&temp, &self.path)?;
        info!("Saved {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }

    /// A missing file is created empty and read back as no data.
    fn load(&self) -> CalendarResult<Vec<u8>> {
        if !self.path.exists() {
            self.ensure_parent()?;
            std::fs::write(&self.path, b"")?;
            info!("Created {}", self.path.display());
        }

        let data = std::fs::read(&self.path)?;
        info!("Loaded {} bytes from {}", data.len(), self.path.display());
        Ok(data)
    }
}

/// In-process store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Vec<u8>>,
}

impl MemoryStore {
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        MemoryStore {
            data: Mutex::new(data.into()),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.data
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Store for MemoryStore {
    fn save(&self, data: &[u8]) -> CalendarResult<()> {
        *self
            .data
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = data.to_vec();
        Ok(())
    }

    fn load(&self) -> CalendarResult<Vec<u8>> {
        Ok(self.contents())
    }
}
