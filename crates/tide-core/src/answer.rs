//! The discriminated response envelope returned per question.
//!
//! Consumers (the CLI today, any other presentation layer tomorrow) render
//! whichever parts are present; none of the four kinds is guaranteed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ChartSpec, TabularResult, Topic};

/// One renderable fragment of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerPart {
    /// Tabular data returned by the executed query.
    Table { data: TabularResult },
    /// A validated figure over the table part.
    Chart { figure: ChartSpec },
    /// Grounded prose summary.
    Narrative { text: String },
    /// Terminal pipeline failure; `raw` carries the offending query text
    /// when one exists, so the failure can be diagnosed without re-running.
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

/// Everything produced for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Answer {
    pub question: String,
    pub topic: Topic,
    /// The validated SQL that was executed, when synthesis succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    pub parts: Vec<AnswerPart>,
}

impl Answer {
    /// Shorthand for a terminal error answer.
    #[must_use]
    pub fn error(
        question: impl Into<String>,
        topic: Topic,
        message: impl Into<String>,
        raw: Option<String>,
    ) -> Self {
        Self {
            question: question.into(),
            topic,
            sql: None,
            parts: vec![AnswerPart::Error {
                message: message.into(),
                raw,
            }],
        }
    }

    #[must_use]
    pub fn table(&self) -> Option<&TabularResult> {
        self.parts.iter().find_map(|part| match part {
            AnswerPart::Table { data } => Some(data),
            _ => None,
        })
    }

    #[must_use]
    pub fn chart(&self) -> Option<&ChartSpec> {
        self.parts.iter().find_map(|part| match part {
            AnswerPart::Chart { figure } => Some(figure),
            _ => None,
        })
    }

    #[must_use]
    pub fn narrative(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            AnswerPart::Narrative { text } => Some(text.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, AnswerPart::Error { .. }))
    }
}
