//! Field descriptors and the record capability trait.
//!
//! Record kinds declare their fields as a `const` table of [`FieldDescriptor`]s.
//! The store reads the table to locate the key field; the input collector walks it
//! in declaration order to prompt, parse and validate each value.

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Closed set of value types a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    /// Comma separated values of the element type.
    List(&'static FieldType),
}

impl FieldType {
    /// Human readable description used in invalid-input messages.
    pub fn friendly_name(&self) -> String {
        match self {
            FieldType::Text => "text only".to_string(),
            FieldType::Integer => "a number".to_string(),
            FieldType::Decimal => "a decimal".to_string(),
            FieldType::Boolean => "either true or false".to_string(),
            FieldType::DateTime => "a date and time".to_string(),
            FieldType::List(inner) => format!("List<{}>", inner.friendly_name()),
        }
    }

    /// The value a non-required field takes when left empty.
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Integer => FieldValue::Integer(0),
            FieldType::Decimal => FieldValue::Decimal(0.0),
            FieldType::Boolean => FieldValue::Boolean(false),
            FieldType::DateTime => FieldValue::DateTime(NaiveDateTime::default()),
            FieldType::List(_) => FieldValue::List(Vec::new()),
        }
    }
}

/// A typed field value moving between the collector, the records and the console.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Decimal(v) => write!(f, "{}", v),
            FieldValue::Boolean(v) => write!(f, "{}", v),
            FieldValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Metadata describing how to prompt for, validate and store one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Property name, also the JSON property name on disk.
    pub name: &'static str,
    /// Text shown before reading the value. Defaults to `name`.
    pub prompt: &'static str,
    pub required: bool,
    /// Ignored fields are never prompted for.
    pub ignore: bool,
    /// Lower bound for integer fields.
    pub min_value: i64,
    /// Marks the field holding the record's sequential identifier.
    pub is_key: bool,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            prompt: name,
            required: false,
            ignore: false,
            min_value: 0,
            is_key: false,
            field_type,
        }
    }

    pub const fn with_prompt(self, prompt: &'static str) -> Self {
        Self { prompt, ..self }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn ignored(self) -> Self {
        Self { ignore: true, ..self }
    }

    pub const fn with_min_value(self, min_value: i64) -> Self {
        Self { min_value, ..self }
    }

    pub const fn key(self) -> Self {
        Self { is_key: true, ..self }
    }
}

/// Capability table implemented by every record kind.
///
/// Kinds list their descriptors explicitly and expose typed get/set by field name,
/// so no runtime introspection is needed to find the key or populate a new record.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + Default {
    /// Kind name; the data file is `<KIND>.json`.
    const KIND: &'static str;

    /// Field descriptors in declaration order. At most one carries `is_key`.
    fn fields() -> &'static [FieldDescriptor];

    fn field_value(&self, name: &str) -> Option<FieldValue>;

    fn set_field_value(&mut self, name: &str, value: FieldValue) -> Result<()>;

    /// Called by the console right before a freshly collected record is stored.
    fn before_add(&mut self) {}

    fn key_field() -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.is_key)
    }

    fn key(&self) -> Option<i64> {
        let field = Self::key_field()?;
        self.field_value(field.name)?.as_integer()
    }

    /// Writes `id` into the key field. Kinds without a key are left untouched.
    fn set_key(&mut self, id: i64) -> Result<()> {
        match Self::key_field() {
            Some(field) => self.set_field_value(field.name, FieldValue::Integer(id)),
            None => Ok(()),
        }
    }
}

/// Error for a field name or value type a kind does not accept.
pub fn unknown_field<T: Record>(field: &str) -> Error {
    Error::UnknownField {
        kind: T::KIND.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let d = FieldDescriptor::new("TeamName", FieldType::Text);
        assert_eq!(d.prompt, "TeamName");
        assert!(!d.required);
        assert!(!d.ignore);
        assert!(!d.is_key);
        assert_eq!(d.min_value, 0);
    }

    #[test]
    fn test_descriptor_builders() {
        const AGE: FieldDescriptor = FieldDescriptor::new("Age", FieldType::Integer)
            .with_prompt("Age")
            .required()
            .with_min_value(1);
        assert!(AGE.required);
        assert_eq!(AGE.min_value, 1);

        let id = FieldDescriptor::new("Player_Id", FieldType::Integer).key().ignored();
        assert!(id.is_key);
        assert!(id.ignore);
    }

    #[test]
    fn test_friendly_names() {
        assert_eq!(FieldType::Integer.friendly_name(), "a number");
        assert_eq!(FieldType::Boolean.friendly_name(), "either true or false");
        assert_eq!(FieldType::Text.friendly_name(), "text only");
        assert_eq!(FieldType::Decimal.friendly_name(), "a decimal");

        const NESTED: FieldType = FieldType::List(&FieldType::List(&FieldType::Integer));
        assert_eq!(NESTED.friendly_name(), "List<List<a number>>");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(FieldType::Integer.zero_value(), FieldValue::Integer(0));
        assert_eq!(FieldType::Text.zero_value(), FieldValue::Text(String::new()));
        assert_eq!(FieldType::Boolean.zero_value(), FieldValue::Boolean(false));
        assert_eq!(FieldType::List(&FieldType::Text).zero_value(), FieldValue::List(vec![]));
    }

    #[test]
    fn test_display_list() {
        let v = FieldValue::List(vec![FieldValue::Integer(1), FieldValue::Integer(2)]);
        assert_eq!(v.to_string(), "1, 2");
    }
}
