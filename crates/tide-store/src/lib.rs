//! # tide-store
//!
//! `DuckDB` access for the tidepool data lake.
//!
//! The serving connection is always opened with `AccessMode::ReadOnly`, so
//! even a query that slipped past validation cannot alter stored data; an
//! independent safety layer on top of the synthesizer's keyword check.
//!
//! The schema catalog is reloaded per question and never fails the caller:
//! an unreachable or empty store presents as an empty catalog, and the
//! executor surfaces the real error when a query is eventually run.

pub mod convert;
pub mod error;
mod query;

pub use error::StoreError;

use std::collections::BTreeMap;
use std::path::Path;

use duckdb::{AccessMode, Config, Connection};
use tide_core::SchemaCatalog;

/// Handle to the analytical lake.
pub struct Store {
    conn: Connection,
    max_rows: usize,
}

impl Store {
    /// Open an existing lake file in read-only mode.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the file does not exist, or
    /// [`StoreError::DuckDb`] if it cannot be opened.
    pub fn open_read_only(path: impl AsRef<Path>, max_rows: usize) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(path, config)?;
        Ok(Self { conn, max_rows })
    }

    /// Open an in-memory store (for testing).
    ///
    /// In-memory databases start empty, so this connection is writable;
    /// tests seed tables through [`Self::conn`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if the connection cannot be created.
    pub fn open_in_memory(max_rows: usize) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, max_rows })
    }

    /// Access the underlying `DuckDB` connection.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Row cap applied by [`Self::execute`].
    #[must_use]
    pub const fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Snapshot of the live schema: every user table and its ordered columns.
    ///
    /// Never fails the caller; a store that cannot be listed yields an empty
    /// catalog and a warning; downstream synthesis rejects against it and the
    /// executor reports the underlying failure if anything is run anyway.
    #[must_use]
    pub fn catalog(&self) -> SchemaCatalog {
        match self.load_catalog() {
            Ok(catalog) => catalog,
            Err(error) => {
                tracing::warn!(%error, "schema catalog unavailable; continuing with empty catalog");
                SchemaCatalog::empty()
            }
        }
    }

    fn load_catalog(&self) -> Result<SchemaCatalog, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name, column_name FROM information_schema.columns
             WHERE table_schema = 'main'
             ORDER BY table_name, ordinal_position",
        )?;
        let mut rows = stmt.query([])?;

        let mut tables: BTreeMap<String, Vec<String>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let table: String = row.get(0)?;
            let column: String = row.get(1)?;
            tables.entry(table).or_default().push(column);
        }
        Ok(SchemaCatalog::new(tables))
    }
}
