//! Tabular model input and the raw request body it is built from

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Values supplied for one column of a prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValues {
    /// One value per row (parallel arrays convention)
    Rows(Vec<Value>),
    /// Values keyed by row index, as in `{"0": 90, "1": 20}`
    Indexed(BTreeMap<String, Value>),
    /// A single value, broadcast to every row
    Scalar(Value),
}

impl ColumnValues {
    /// Number of rows this column pins the table to, if any.
    ///
    /// Indexed columns report `None`: their rows come from the index shared
    /// by all indexed columns.
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Self::Rows(values) => Some(values.len()),
            Self::Indexed(_) | Self::Scalar(_) => None,
        }
    }

    /// Cell for the given row, broadcasting scalars
    pub fn cell(&self, row: usize) -> Option<&Value> {
        self.lookup(row, None)
    }

    /// Cell for a row given by position, or by index key for indexed columns
    pub fn lookup(&self, row: usize, key: Option<&str>) -> Option<&Value> {
        match self {
            Self::Rows(values) => values.get(row),
            Self::Indexed(values) => key.and_then(|k| values.get(k)),
            Self::Scalar(value) => Some(value),
        }
    }

    /// Index keys of an indexed column
    pub fn index_keys(&self) -> Option<impl Iterator<Item = &str>> {
        match self {
            Self::Indexed(values) => Some(values.keys().map(String::as_str)),
            _ => None,
        }
    }
}

/// Raw body of a prediction request: column name to column values.
///
/// No schema is applied at this stage; see [`crate::InputSchema::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    pub columns: BTreeMap<String, ColumnValues>,
}

impl PredictionRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column with one value per row
    pub fn with_rows<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.columns.insert(name.into(), ColumnValues::Rows(values));
        self
    }

    /// Add a column keyed by row index
    pub fn with_indexed<I, K, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.columns
            .insert(name.into(), ColumnValues::Indexed(values));
        self
    }

    /// Add a scalar column
    pub fn with_scalar(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns
            .insert(name.into(), ColumnValues::Scalar(value.into()));
        self
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&ColumnValues> {
        self.columns.get(name)
    }

    /// Column names in the request
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Dense numeric table with named columns, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<String>,
    data: Vec<f64>,
    n_rows: usize,
}

impl FeatureTable {
    /// Build a table from rows. Every row must have one value per column.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = columns.len();
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(width * n_rows);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::prediction(format!(
                    "row {} has {} values, table has {} columns",
                    index,
                    row.len(),
                    width
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            columns,
            data,
            n_rows,
        })
    }

    /// Column names in storage order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one row
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.n_rows {
            return None;
        }
        let width = self.n_columns();
        Some(&self.data[index * width..(index + 1) * width])
    }

    /// Iterate over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        let width = self.n_columns().max(1);
        self.data.chunks(width).take(self.n_rows)
    }
}
