//! Dynamic rows

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use super::Value;
use crate::error::ConfigError;

/// A dynamic record loaded from a collection endpoint.
///
/// Records hold field values as a `HashMap<String, Value>`. Field names may
/// address nested objects with dots, see [`Record::lookup`].
///
/// # Example
///
/// ```
/// use crudlist_lib::model::Record;
///
/// let record = Record::new()
///     .set("id", "f-1")
///     .set("name", "m1.small");
///
/// assert_eq!(record.get_str("name"), Some("m1.small"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as a string slice, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Resolves a column id against this record.
    ///
    /// A flat field with the exact name wins; otherwise the id is split on
    /// `.` and walked through nested objects.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(path) {
            return Some(value);
        }
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }
}

impl From<HashMap<String, Value>> for Record {
    fn from(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }
}

/// A shared handle to a loaded record.
///
/// Rows are cheap to clone and compare by identity: two handles are the same
/// row only if they point at the same allocation. Selection relies on this,
/// so a reloaded record with identical contents is a different row.
#[derive(Clone)]
pub struct Row(Arc<Record>);

impl Row {
    /// Wraps a record into a new row.
    pub fn new(record: Record) -> Self {
        Self(Arc::new(record))
    }

    /// Returns `true` if both handles point at the same row.
    pub fn ptr_eq(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity key of this row.
    ///
    /// Only meaningful while a handle to the row is alive.
    pub fn key(&self) -> RowKey {
        RowKey(Arc::as_ptr(&self.0) as usize)
    }

    /// Returns the underlying record.
    pub fn record(&self) -> &Record {
        &self.0
    }
}

impl Deref for Row {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl From<Record> for Row {
    fn from(record: Record) -> Self {
        Row::new(record)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Row").field(&self.0.fields).finish()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Record::deserialize(deserializer).map(Row::new)
    }
}

/// Identity of a [`Row`], usable as a hash key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey(usize);

/// How the unique identifier of a row is resolved.
///
/// Most collections use an `id` field. Some use another field (ssh keys are
/// addressed by `name`), and some need a function of the whole row.
#[derive(Clone)]
pub enum UniqueIdentifier {
    /// Read the identifier from a field.
    Field(String),
    /// Compute the identifier from the row.
    Func(Arc<dyn Fn(&Row) -> String + Send + Sync>),
}

impl UniqueIdentifier {
    /// Uses the given field as identifier.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Uses a function of the row as identifier.
    pub fn func(f: impl Fn(&Row) -> String + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(f))
    }

    /// Resolves the identifier of a row.
    pub fn resolve(&self, row: &Row) -> Result<String, ConfigError> {
        match self {
            Self::Field(field) => match row.lookup(field) {
                None | Some(Value::Null) => Err(ConfigError::MissingIdentifier(field.clone())),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Ok(other.to_string()),
            },
            Self::Func(f) => Ok(f(row)),
        }
    }
}

impl Default for UniqueIdentifier {
    fn default() -> Self {
        Self::field("id")
    }
}

impl fmt::Debug for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}
