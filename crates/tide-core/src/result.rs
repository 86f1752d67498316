//! Tabular query results.
//!
//! A [`TabularResult`] is the immutable output of one query execution:
//! named columns and scalar-valued rows. Row truncation against the store's
//! cap is recorded explicitly so a shortened result is never presented as
//! complete.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scalar cell of a result row.
///
/// Exotic store types (dates, timestamps, decimals, intervals) are rendered
/// to `Text` at the store boundary so consumers only deal with this closed
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the cell holds a number usable as a chart axis.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Numeric view of the cell, if it has one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Ordered columns and rows produced by one query execution.
///
/// Never mutated after creation; downstream stages only read or project it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TabularResult {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Row-major cells; every row has `columns.len()` entries.
    pub rows: Vec<Vec<CellValue>>,
    /// True when the store's row cap cut the result short.
    pub truncated: bool,
}

impl TabularResult {
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>, truncated: bool) -> Self {
        Self {
            columns,
            rows,
            truncated,
        }
    }

    /// An empty result with no columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            truncated: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name (case-insensitive).
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Names of columns whose first non-null value is numeric.
    #[must_use]
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(*idx))
                    .find(|cell| !cell.is_null())
                    .is_some_and(CellValue::is_numeric)
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Render the first `max_rows` rows as labelled `column=value` records,
    /// one row per line. This is the bounded projection sent to the model for
    /// narrative grounding; never the unbounded result.
    #[must_use]
    pub fn sample_records(&self, max_rows: usize) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for row in self.rows.iter().take(max_rows) {
            let mut first = true;
            for (name, cell) in self.columns.iter().zip(row) {
                if !first {
                    out.push_str(" | ");
                }
                let _ = write!(out, "{name}={cell}");
                first = false;
            }
            out.push('\n');
        }
        if self.rows.len() > max_rows {
            let _ = writeln!(out, "... ({} further rows omitted)", self.rows.len() - max_rows);
        }
        out
    }
}
