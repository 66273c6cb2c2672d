//! Team Roster is a console roster manager for teams and players.
//!
//! Every record kind is persisted as a single JSON array in `<data_dir>/<Kind>.json`.
//! Record kinds describe themselves through an explicit table of field descriptors,
//! which drives both the generic CRUD store and the console input collector.
//!
//! ## Core Components
//! - [`schema`]: Field descriptors and the [`schema::Record`] capability trait.
//! - [`models`]: The `Player` and `Team` record kinds.
//! - [`engine`]: The storage backend (one JSON file per record kind).
//! - [`input`]: Descriptor-driven console input collection.
//! - [`console`]: Menus and table rendering.

pub mod console;
pub mod engine;
pub mod input;
pub mod models;
pub mod schema;

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::Record;

/// Errors returned by the roster.
#[derive(Error, Debug)]
pub enum Error {
    /// The data directory handed to a store does not exist.
    #[error("data directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// A record kind's data file does not exist.
    #[error("data file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Raw text could not be converted to a field's type.
    #[error("parse error: {0}")]
    Parse(String),
    /// Input was empty for a required field or fell below the minimum.
    #[error("invalid input for {field}: expected {expected}")]
    Validation { field: String, expected: String },
    /// A data file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The largest stored key leaves no room for another identifier.
    #[error("no identifiers left for {0}")]
    IdExhausted(String),
    /// A field name is not part of the record kind, or the value has the wrong type.
    #[error("unknown field {field} on {kind}")]
    UnknownField { kind: String, field: String },
    /// An I/O error occurred while reading data or console input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Generic CRUD over the persisted collection of one record kind.
///
/// Every mutating call loads the whole collection, changes it, and rewrites the file.
pub trait RecordService<T: Record> {
    /// Returns every stored record in file order. A missing or empty file yields no records.
    fn get_all(&self) -> Result<Vec<T>>;
    /// Assigns the next identifier to `record`, appends it and persists the collection.
    fn add(&self, record: T) -> Result<T>;
    /// Removes the first record equal to `record`, persists and returns the remainder.
    fn delete(&self, record: &T) -> Result<Vec<T>>;
    /// Overwrites the data file with `records`.
    fn save(&self, records: &[T]) -> Result<()>;
    /// Returns `max(key) + 1`, or 1 when the collection holds no positive key.
    fn get_next_id(&self, records: &[T]) -> Result<i64>;
    /// Reads the integer value of `field_name` on `record`, or 0 when absent.
    fn key_value(&self, record: &T, field_name: &str) -> i64;
    /// Finds the record whose key field equals `id`.
    fn find_by_id(&self, id: i64) -> Result<Option<T>> {
        Ok(self.get_all()?.into_iter().find(|r| r.key() == Some(id)))
    }
}
