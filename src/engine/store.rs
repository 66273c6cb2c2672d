use std::marker::PhantomData;
use std::path::Path;

use log::{debug, warn};

use crate::engine::Persistence;
use crate::schema::Record;
use crate::{Error, RecordService, Result};

/// Generic CRUD store over the JSON file of one record kind.
///
/// Holds no records between calls: each operation loads the collection,
/// mutates it, and writes it back whole.
pub struct RecordStore<T: Record> {
    persistence: Persistence,
    _kind: PhantomData<T>,
}

impl<T: Record> RecordStore<T> {
    /// Creates a store backed by `<dir>/<Kind>.json`. Fails if `dir` does not exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Ok(Self::with_persistence(Persistence::new(dir)?))
    }

    pub fn with_persistence(persistence: Persistence) -> Self {
        Self {
            persistence,
            _kind: PhantomData,
        }
    }
}

impl<T: Record> RecordService<T> for RecordStore<T> {
    fn get_all(&self) -> Result<Vec<T>> {
        if !self.persistence.exists(T::KIND) {
            debug!("No {} data file yet", T::KIND);
            return Ok(Vec::new());
        }
        self.persistence.load(T::KIND)
    }

    fn add(&self, mut record: T) -> Result<T> {
        let mut records = self.get_all()?;

        if T::key_field().is_some() {
            let id = self.get_next_id(&records)?;
            record.set_key(id)?;
        } else {
            warn!("{} declares no key field; storing without an id", T::KIND);
        }

        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    fn delete(&self, record: &T) -> Result<Vec<T>> {
        let mut records = self.get_all()?;

        match records.iter().position(|r| r == record) {
            Some(index) => {
                records.remove(index);
            }
            None => warn!("{} to delete was not found; rewriting unchanged", T::KIND),
        }

        self.save(&records)?;
        Ok(records)
    }

    fn save(&self, records: &[T]) -> Result<()> {
        self.persistence.save(T::KIND, records)
    }

    fn get_next_id(&self, records: &[T]) -> Result<i64> {
        let Some(key) = T::key_field() else {
            return Ok(1);
        };
        let max = records
            .iter()
            .map(|r| self.key_value(r, key.name))
            .max()
            .unwrap_or(0)
            .max(0);
        max.checked_add(1)
            .ok_or_else(|| Error::IdExhausted(T::KIND.to_string()))
    }

    fn key_value(&self, record: &T, field_name: &str) -> i64 {
        record
            .field_value(field_name)
            .and_then(|v| v.as_integer())
            .unwrap_or(0)
    }
}
