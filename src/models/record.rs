// src/models/record.rs

//! Typed record and dataset structures.
//!
//! Every table row is reduced to a `TypedRecord`: an ordered mapping from
//! resolved field name to a tagged `CellValue`. Records accumulate into a
//! `Dataset`, which maintains the union of all field names seen so far so
//! the final CSV has one stable header row and explicit empty cells for
//! missing values.

use std::collections::HashSet;

use serde::Serialize;

use super::DatasetKind;

/// A single cell value after type coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl CellValue {
    /// Render the value as a CSV field. Null becomes the empty field.
    pub fn csv_field(&self) -> String {
        match self {
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Str(v) => v.clone(),
            CellValue::Null => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Wrap a string, mapping the empty string to Null.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Null
        } else {
            CellValue::Str(text.to_string())
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Str(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Str(v)
    }
}

/// One output row: resolved field names mapped to typed values.
///
/// Field insertion order is preserved so dataset columns come out in the
/// order the source table presented them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRecord {
    fields: Vec<(String, CellValue)>,
}

impl TypedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// An ordered collection of records sharing one schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    kind: DatasetKind,
    columns: Vec<String>,
    known: HashSet<String>,
    records: Vec<TypedRecord>,
}

impl Dataset {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
            known: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Create a dataset with a preset leading column order.
    pub fn with_columns(kind: DatasetKind, columns: &[&str]) -> Self {
        let mut dataset = Self::new(kind);
        for column in columns {
            dataset.add_column(column);
        }
        dataset
    }

    fn add_column(&mut self, name: &str) {
        if self.known.insert(name.to_string()) {
            self.columns.push(name.to_string());
        }
    }

    /// Append a record, folding any new field names into the column union.
    pub fn push(&mut self, record: TypedRecord) {
        for (name, _) in record.iter() {
            if !self.known.contains(name) {
                self.add_column(name);
            }
        }
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = TypedRecord>) {
        for record in records {
            self.push(record);
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[TypedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
