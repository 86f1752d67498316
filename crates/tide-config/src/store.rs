//! Analytical store configuration.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    String::from(".tidepool/lake.duckdb")
}

const fn default_max_rows() -> usize {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the DuckDB lake file.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Row cap applied to every executed query. Results hitting the cap are
    /// reported as truncated, never silently shortened.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_rows: default_max_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, ".tidepool/lake.duckdb");
        assert_eq!(config.max_rows, 500);
    }
}
