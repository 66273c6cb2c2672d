use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Handles disk I/O for the record stores.
///
/// Each record kind is stored in its own `<Kind>.json` file inside `data_dir`.
/// Writes go to a temporary file first and are then renamed over the target.
#[derive(Debug, Clone)]
pub struct Persistence {
    data_dir: PathBuf,
}

impl Persistence {
    /// Opens the data directory. It must already exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir));
        }
        Ok(Self { data_dir: dir })
    }

    pub fn file_path(&self, kind: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind))
    }

    pub fn exists(&self, kind: &str) -> bool {
        self.file_path(kind).is_file()
    }

    /// Reads and parses a kind's collection.
    ///
    /// An absent file is [`Error::FileNotFound`]; an empty or whitespace-only file
    /// is an empty collection.
    pub fn load<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>> {
        let file_path = self.file_path(kind);
        if !file_path.is_file() {
            return Err(Error::FileNotFound(file_path));
        }

        let content = fs::read_to_string(&file_path)?;
        if content.trim().is_empty() {
            debug!("{:?} is empty", file_path);
            return Ok(Vec::new());
        }

        let records: Vec<T> = serde_json::from_str(&content)?;
        debug!("Loaded {} records from {:?}", records.len(), file_path);
        Ok(records)
    }

    /// Serializes the whole collection and replaces the kind's file.
    pub fn save<T: Serialize>(&self, kind: &str, records: &[T]) -> Result<()> {
        let file_path = self.file_path(kind);
        let temp_path = file_path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(records)?;

        fs::write(&temp_path, bytes).map_err(|source| Error::WriteFailure {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &file_path).map_err(|source| Error::WriteFailure {
            path: file_path.clone(),
            source,
        })?;

        debug!("Saved {} records to {:?}", records.len(), file_path);
        Ok(())
    }
}
