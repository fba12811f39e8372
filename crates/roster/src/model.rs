use std::collections::HashMap;

use serde::Serialize;

use crate::error::RosterError;

/// Identifier column used when none is configured.
pub const DEFAULT_ID_COLUMN: &str = "bioguide_id";

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One legislator: attribute name → attribute value. Values are text, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Raw value, `None` when the record lacks the attribute.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.fields.get(attribute).map(String::as_str)
    }

    /// Value for comparison: a missing attribute reads as the empty string.
    pub fn value(&self, attribute: &str) -> &str {
        self.get(attribute).unwrap_or("")
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(attribute.into(), value.into())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.fields.contains_key(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Ordered, duplicate-free attribute names. Controls column order on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self, RosterError> {
        let mut schema = Self::default();
        for column in columns {
            let column = column.into();
            if schema.contains(&column) {
                return Err(RosterError::DuplicateColumn { column });
            }
            schema.columns.push(column);
        }
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Append `column` unless already present. Returns true if it was added.
    pub(crate) fn push(&mut self, column: &str) -> bool {
        if self.contains(column) {
            return false;
        }
        self.columns.push(column.to_string());
        true
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// In-memory table of legislator records for one point in time.
///
/// Every record carries every schema attribute; attributes missing from a
/// source row are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    id_column: String,
    schema: Schema,
    legislators: HashMap<String, Record>,
}

impl Roster {
    /// Empty roster. The schema must name `id_column`.
    pub fn new(id_column: impl Into<String>, schema: Schema) -> Result<Self, RosterError> {
        let id_column = id_column.into();
        if schema.is_empty() {
            return Err(RosterError::EmptySchema);
        }
        if !schema.contains(&id_column) {
            return Err(RosterError::MissingIdColumn { column: id_column });
        }
        Ok(Self {
            id_column,
            schema,
            legislators: HashMap::new(),
        })
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.legislators.get(id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.legislators.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.legislators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legislators.is_empty()
    }

    /// Identifiers in ascending lexicographic order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.legislators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Records in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.legislators.values()
    }

    /// Add or replace a record keyed by its identifier attribute.
    ///
    /// Attributes the schema does not know yet are appended (sorted by name)
    /// and back-filled with empty strings on every other record.
    pub fn insert(&mut self, mut record: Record) -> Result<Option<Record>, RosterError> {
        let id = record.value(&self.id_column).to_string();
        if id.is_empty() {
            return Err(RosterError::MissingId { line: None });
        }

        let mut unseen: Vec<String> = record
            .attributes()
            .filter(|a| !self.schema.contains(a))
            .map(str::to_string)
            .collect();
        unseen.sort_unstable();
        for attribute in &unseen {
            self.add_attribute(attribute);
        }

        for column in self.schema.iter() {
            if !record.contains(column) {
                record.set(column, "");
            }
        }

        Ok(self.legislators.insert(id, record))
    }

    /// Append `attribute` to the schema, setting it to "" on every record.
    pub(crate) fn add_attribute(&mut self, attribute: &str) -> bool {
        if !self.schema.push(attribute) {
            return false;
        }
        for record in self.legislators.values_mut() {
            record.set(attribute, "");
        }
        true
    }

    /// Overwrite one value in place. Returns false when `id` is unknown.
    pub(crate) fn set_value(&mut self, id: &str, attribute: &str, value: &str) -> bool {
        match self.legislators.get_mut(id) {
            Some(record) => {
                record.set(attribute, value);
                true
            }
            None => false,
        }
    }

    /// Insert without schema bookkeeping. The loader has already shaped `record`.
    pub(crate) fn put(&mut self, id: String, record: Record) -> Option<Record> {
        self.legislators.insert(id, record)
    }
}
