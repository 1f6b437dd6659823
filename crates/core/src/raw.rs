//! Untyped tabular records as received from a data source.
//!
//! A [`RawTable`] keeps column names exactly as the source spelled them,
//! duplicates and casing included. Rows are aligned to the column list and
//! missing cells are `Value::Null`.

use serde_json::Value;

use crate::error::{Error, Result};

/// Ordered columns plus rows of JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    /// Creates an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from an array of JSON objects.
    ///
    /// Columns appear in order of first appearance across all records.
    /// Any element that is not an object makes the whole payload invalid.
    pub fn from_records(records: Vec<Value>) -> Result<Self> {
        let mut columns: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());

        for (i, record) in records.into_iter().enumerate() {
            match record {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                    objects.push(map);
                }
                other => {
                    return Err(Error::parse(format!(
                        "record[{}] is not an object (got {})",
                        i,
                        json_kind(&other)
                    )));
                }
            }
        }

        let mut table = Self::new(columns);
        for mut map in objects {
            let row = table
                .columns
                .iter()
                .map(|c| map.remove(c).unwrap_or(Value::Null))
                .collect();
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Appends a row, padding with nulls or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column), or null when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Value::Null)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
