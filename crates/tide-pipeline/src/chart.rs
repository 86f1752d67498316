//! Declarative chart synthesis.
//!
//! The model never writes drawing code. It picks a chart kind and column
//! bindings as JSON, and the pick is validated against the closed
//! [`ChartKind`] enumeration and the actual result columns. A spec that
//! fails any check is a typed [`ChartError`] carrying the raw reply for
//! diagnosis; never a partially-built figure.

use thiserror::Error;
use tide_core::{ChartSpec, TabularResult};

use crate::caller::ModelCaller;
use crate::reply::{ParseError, extract_json_object};

/// Question keywords that signal charting intent.
pub const CHART_TRIGGERS: &[&str] = &["plot", "chart", "graph", "trend", "visualize", "visualise"];

/// Reasons a chart could not be derived for a result.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The result holds nothing numeric; axes will not be fabricated.
    #[error("result has no numeric columns to chart")]
    NoNumericColumns,

    /// The model reply was not a valid chart spec.
    #[error("chart reply could not be parsed: {message}")]
    Parse {
        message: String,
        /// The reply as received, kept for diagnosis.
        raw: String,
    },

    /// The spec referenced a column the result does not have.
    #[error("chart references unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The y binding is not a numeric column.
    #[error("chart y column '{column}' is not numeric")]
    NonNumericY { column: String },
}

/// Whether the question asks for a figure.
#[must_use]
pub fn wants_chart(question: &str) -> bool {
    let lowered = question.to_lowercase();
    CHART_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
}

/// Check a spec's bindings against the result it will draw.
///
/// # Errors
///
/// [`ChartError::UnknownColumn`] for any binding the result lacks,
/// [`ChartError::NonNumericY`] when the y binding is not numeric.
pub fn validate_spec(spec: ChartSpec, result: &TabularResult) -> Result<ChartSpec, ChartError> {
    let mut bound = vec![spec.x.as_str(), spec.y.as_str()];
    if let Some(color) = &spec.color {
        bound.push(color.as_str());
    }
    for column in bound {
        if result.column_index(column).is_none() {
            return Err(ChartError::UnknownColumn {
                column: column.to_string(),
            });
        }
    }

    let numeric = result.numeric_columns();
    if !numeric
        .iter()
        .any(|column| column.eq_ignore_ascii_case(&spec.y))
    {
        return Err(ChartError::NonNumericY {
            column: spec.y.clone(),
        });
    }
    Ok(spec)
}

/// Ask the model for a chart over `result` and validate its pick.
///
/// # Errors
///
/// Any [`ChartError`]; the caller decides whether a missing figure is
/// fatal (it never is in the orchestrator; the table stands on its own).
pub async fn synthesize_chart<M: ModelCaller>(
    model: &M,
    question: &str,
    result: &TabularResult,
) -> Result<ChartSpec, ChartError> {
    let numeric = result.numeric_columns();
    if numeric.is_empty() {
        return Err(ChartError::NoNumericColumns);
    }

    let system = "You choose how to chart tabular query results. \
                  Reply with JSON only.";
    let user = format!(
        "QUESTION:\n{question}\n\n\
         RESULT COLUMNS: {columns}\n\
         NUMERIC COLUMNS: {numeric}\n\n\
         Pick a chart for this result. \"kind\" must be \"line\" or \"bar\"; \
         \"x\", \"y\" and optional \"color\" must name result columns; \"y\" must be numeric. \
         Prefer \"line\" for values over time and \"bar\" for comparisons.\n\n\
         Reply with JSON only: \
         {{\"kind\": \"line\", \"x\": \"...\", \"y\": \"...\", \"color\": null, \"title\": \"...\"}}",
        columns = result.columns.join(", "),
        numeric = numeric.join(", "),
    );

    let raw = model.call(system, &user).await;
    let value = extract_json_object(&raw).map_err(|error| match error {
        ParseError::Empty => ChartError::Parse {
            message: "no JSON object in reply".to_string(),
            raw: raw.clone(),
        },
        ParseError::Json { message, raw } => ChartError::Parse { message, raw },
    })?;

    let spec: ChartSpec = serde_json::from_value(value).map_err(|error| ChartError::Parse {
        message: error.to_string(),
        raw: raw.clone(),
    })?;

    validate_spec(spec, result)
}
