//! Declarative chart specifications.
//!
//! A chart is described by data, not by code: a kind from a closed
//! enumeration plus column bindings validated against the result it draws.
//! The pipeline never executes model-generated drawing code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Supported chart forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

/// Rendering instructions for one figure over a [`crate::TabularResult`].
///
/// Only constructed after validation: `x`, `y` and `color` name columns that
/// exist in the result, and `y` is numeric. A spec is whole or absent,
/// never partially built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Column bound to the x axis.
    pub x: String,
    /// Numeric column bound to the y axis.
    pub y: String,
    /// Optional column for series grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spec_serialization_omits_empty_options() {
        let spec = ChartSpec {
            kind: ChartKind::Line,
            x: "year".into(),
            y: "avg_salary".into(),
            color: None,
            title: None,
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"kind":"line","x":"year","y":"avg_salary"}"#);
    }

    #[test]
    fn kind_deserializes_snake_case() {
        let kind: ChartKind = serde_json::from_str(r#""bar""#).unwrap();
        assert_eq!(kind, ChartKind::Bar);
        assert!(serde_json::from_str::<ChartKind>(r#""pie""#).is_err());
    }
}
