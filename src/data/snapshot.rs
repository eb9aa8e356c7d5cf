use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::FIELD_NAME;

/// A single upstream cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric reading of the cell, `None` when it cannot be parsed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

pub type Row = HashMap<String, Value>;

/// One point-in-time table from the upstream provider.
///
/// Rows are addressed by position, so indices are always `0..len()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    rows: Vec<Row>,
}

impl Snapshot {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` / `field`, `None` when either is missing
    pub fn get(&self, row: usize, field: &str) -> Option<&Value> {
        self.rows.get(row)?.get(field)
    }

    /// Keep rows whose `名称` satisfies the predicate, preserving order
    #[must_use]
    pub fn filter_by_name<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| {
                row.get(FIELD_NAME)
                    .and_then(Value::as_text)
                    .is_some_and(&mut keep)
            })
            .collect();
        Self { rows }
    }

    /// Keep rows whose `field` holds exactly the text `expected`
    #[must_use]
    pub fn filter_eq(self, field: &str, expected: &str) -> Self {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| row.get(field).and_then(Value::as_text) == Some(expected))
            .collect();
        Self { rows }
    }

    /// Rewrite one field of every row in place
    #[must_use]
    pub fn map_field<F>(mut self, field: &str, mut f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        for row in &mut self.rows {
            if let Some(value) = row.get_mut(field) {
                *value = f(value);
            }
        }
        self
    }

    /// Append `other` after `self`; the result is re-indexed from zero
    #[must_use]
    pub fn concat(mut self, other: Self) -> Self {
        self.rows.extend(other.rows);
        self
    }
}

impl FromIterator<Row> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build a row from `(field, value)` pairs
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
