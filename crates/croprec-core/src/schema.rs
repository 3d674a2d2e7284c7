//! Explicit input schema and boundary validation
//!
//! The schema is the ordered list of features the model was trained on.
//! Validating a [`PredictionRequest`] against it is the only way to obtain a
//! [`FeatureTable`], so every table that reaches a predictor has exactly the
//! expected columns, in the expected order, with numeric cells.

use crate::error::{Error, Result};
use crate::table::{ColumnValues, FeatureTable, PredictionRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Value kind accepted for a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Any finite number
    #[default]
    Float,
    /// A number without fractional part
    Integer,
}

/// One named input feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FeatureKind,
}

impl FeatureSpec {
    /// Create a float feature
    pub fn float(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Float,
        }
    }

    /// Create an integer feature
    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Integer,
        }
    }

    fn convert(&self, row: usize, cell: &Value) -> Result<f64> {
        let number = match cell {
            Value::Number(n) => n.as_f64(),
            other => {
                return Err(Error::invalid_value(
                    &self.name,
                    row,
                    format!("expected a number, got {}", json_type(other)),
                ))
            }
        };

        let number = number
            .filter(|n| n.is_finite())
            .ok_or_else(|| Error::invalid_value(&self.name, row, "number is not finite"))?;

        if self.kind == FeatureKind::Integer && number.fract() != 0.0 {
            return Err(Error::invalid_value(
                &self.name,
                row,
                format!("expected an integer, got {}", number),
            ));
        }

        Ok(number)
    }
}

/// Ordered set of features a model expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSchema {
    features: Vec<FeatureSpec>,
}

impl InputSchema {
    /// Create a schema. Feature names must be non-empty and unique.
    pub fn new(features: Vec<FeatureSpec>) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::config("input schema declares no features"));
        }

        let mut seen = HashSet::new();
        for feature in &features {
            if feature.name.is_empty() {
                return Err(Error::config("input schema contains an unnamed feature"));
            }
            if !seen.insert(feature.name.as_str()) {
                return Err(Error::config(format!(
                    "input schema declares '{}' twice",
                    feature.name
                )));
            }
        }

        Ok(Self { features })
    }

    /// Features in model order
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    /// Feature names in model order
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Validate a request and build the model's input table.
    ///
    /// Columns are reordered to schema order. Scalar columns are broadcast
    /// to the row count fixed by the array columns (one row when every
    /// column is a scalar). Indexed columns (`{"0": 90, "1": 20}`) are
    /// aligned on the union of their keys; every indexed column must hold
    /// every key, and they cannot be mixed with array columns.
    pub fn validate(&self, request: &PredictionRequest) -> Result<FeatureTable> {
        for feature in &self.features {
            if request.get(&feature.name).is_none() {
                return Err(Error::MissingColumn(feature.name.clone()));
            }
        }

        if let Some(extra) = request
            .names()
            .find(|name| !self.features.iter().any(|f| f.name == *name))
        {
            return Err(Error::UnexpectedColumn(extra.to_string()));
        }

        let columns: Vec<_> = self
            .features
            .iter()
            .filter_map(|f| request.get(&f.name).map(|values| (f, values)))
            .collect();

        let index = row_index(&columns)?;

        let n_rows = match (&index, columns.iter().find_map(|(_, v)| v.row_count())) {
            (Some(keys), _) => keys.len(),
            (None, Some(expected)) => {
                for (feature, values) in &columns {
                    if let Some(actual) = values.row_count() {
                        if actual != expected {
                            return Err(Error::RaggedColumn {
                                column: feature.name.clone(),
                                expected,
                                actual,
                            });
                        }
                    }
                }
                expected
            }
            (None, None) => 1,
        };

        if n_rows == 0 {
            return Err(Error::EmptyTable);
        }

        let mut rows = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let key = index.as_ref().map(|keys| keys[row]);
            let mut values = Vec::with_capacity(columns.len());
            for (feature, column) in &columns {
                let cell = column.lookup(row, key).ok_or_else(|| match key {
                    Some(key) => Error::MissingIndex {
                        column: feature.name.clone(),
                        index: key.to_string(),
                    },
                    None => Error::invalid_value(&feature.name, row, "missing value"),
                })?;
                values.push(feature.convert(row, cell)?);
            }
            rows.push(values);
        }

        FeatureTable::from_rows(self.names(), rows)
    }
}

/// Row index shared by the indexed columns, or `None` when there are none.
///
/// Keys are ordered numerically when all of them are integers, lexically
/// otherwise.
fn row_index<'a>(
    columns: &[(&'a FeatureSpec, &'a ColumnValues)],
) -> Result<Option<Vec<&'a str>>> {
    let mut keys = BTreeSet::new();
    let mut indexed = false;
    for &(_, values) in columns {
        if let Some(column_keys) = values.index_keys() {
            indexed = true;
            keys.extend(column_keys);
        }
    }

    if !indexed {
        return Ok(None);
    }

    if let Some((feature, _)) = columns.iter().find(|(_, v)| v.row_count().is_some()) {
        return Err(Error::MixedLayout(feature.name.clone()));
    }

    let mut keys: Vec<&str> = keys.into_iter().collect();
    if keys.iter().all(|k| k.parse::<i64>().is_ok()) {
        keys.sort_by_key(|k| k.parse::<i64>().unwrap_or_default());
    }

    Ok(Some(keys))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
