//! Query execution against the lake.

use duckdb::types::Value;
use tide_core::{CellValue, TabularResult};

use crate::convert::cell_from_value;
use crate::{Store, StoreError};

impl Store {
    /// Run a query and return its rows, capped at [`Store::max_rows`].
    ///
    /// The cap is detected by reading one row past it; a capped result is
    /// flagged via [`TabularResult::truncated`] rather than presented as
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Execution`] with the offending query attached
    /// on any store-level failure (syntax, missing object, type mismatch).
    pub fn execute(&self, sql: &str) -> Result<TabularResult, StoreError> {
        let exec_err = |error: duckdb::Error| StoreError::Execution {
            message: error.to_string(),
            query: sql.to_string(),
        };

        let mut stmt = self.conn().prepare(sql).map_err(exec_err)?;

        let mut cells: Vec<Vec<CellValue>> = Vec::new();
        let mut truncated = false;
        let columns: Vec<String>;
        {
            let mut rows = stmt.query([]).map_err(exec_err)?;
            columns = rows
                .as_ref()
                .map(|executed| {
                    executed
                        .column_names()
                        .into_iter()
                        .map(Into::into)
                        .collect()
                })
                .unwrap_or_default();

            let width = columns.len();
            while let Some(row) = rows.next().map_err(exec_err)? {
                if cells.len() == self.max_rows() {
                    truncated = true;
                    break;
                }
                let mut record = Vec::with_capacity(width);
                for idx in 0..width {
                    let value: Value = row.get(idx).map_err(exec_err)?;
                    record.push(cell_from_value(value));
                }
                cells.push(record);
            }
        }

        if truncated {
            tracing::debug!(cap = self.max_rows(), "result truncated at row cap");
        }
        Ok(TabularResult::new(columns, cells, truncated))
    }
}
