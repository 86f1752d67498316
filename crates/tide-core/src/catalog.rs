//! Live schema snapshot.
//!
//! The catalog is reloaded from the store for every incoming question so
//! schema drift is always reflected; nothing in the pipeline hardcodes a
//! table name.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from table name to its ordered column list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, Vec<String>>,
}

impl SchemaCatalog {
    #[must_use]
    pub const fn new(tables: BTreeMap<String, Vec<String>>) -> Self {
        Self { tables }
    }

    /// Catalog with no tables; the shape a freshly provisioned (or
    /// unreachable) store presents.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Ordered column list for a table, if the table exists.
    #[must_use]
    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Whether a table of this name exists (case-insensitive).
    #[must_use]
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables
            .keys()
            .any(|table| table.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tables
            .iter()
            .map(|(name, cols)| (name.as_str(), cols.as_slice()))
    }

    /// Subset of the catalog whose table names satisfy `keep`.
    #[must_use]
    pub fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            tables: self
                .tables
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, cols)| (name.clone(), cols.clone()))
                .collect(),
        }
    }

    /// One line per table, `name(col, col, ...)`; the listing embedded in
    /// synthesis prompts.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (name, cols) in &self.tables {
            out.push_str(name);
            out.push('(');
            out.push_str(&cols.join(", "));
            out.push_str(")\n");
        }
        out
    }
}

impl FromIterator<(String, Vec<String>)> for SchemaCatalog {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
