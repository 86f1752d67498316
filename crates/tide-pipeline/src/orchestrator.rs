//! Pipeline sequencing.
//!
//! One [`Orchestrator::answer`] call runs a question to a terminal
//! [`Answer`]: classify, synthesize, execute, optionally chart, narrate.
//! Dependencies are injected at construction; whoever composes the
//! pipeline owns the store and client lifecycles; there is no ambient
//! global state.

use tide_config::{ClassifierStrategy, GeneralConfig};
use tide_core::{Answer, AnswerPart, Topic};
use tide_store::{Store, StoreError};

use crate::caller::ModelCaller;
use crate::chart::{synthesize_chart, wants_chart};
use crate::narrate::summarize;
use crate::synthesize::{ValidationStatus, synthesize};
use crate::topic::classify;

/// Pipeline tuning knobs, usually derived from `[general]` config.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub classifier: ClassifierStrategy,
    pub narrative_sample_rows: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierStrategy::Keyword,
            narrative_sample_rows: 100,
        }
    }
}

impl From<&GeneralConfig> for PipelineOptions {
    fn from(config: &GeneralConfig) -> Self {
        Self {
            classifier: config.classifier,
            narrative_sample_rows: config.narrative_sample_rows,
        }
    }
}

/// Sequences the pipeline stages over injected collaborators.
pub struct Orchestrator<M> {
    store: Store,
    model: M,
    options: PipelineOptions,
}

impl<M: ModelCaller> Orchestrator<M> {
    #[must_use]
    pub const fn new(store: Store, model: M, options: PipelineOptions) -> Self {
        Self {
            store,
            model,
            options,
        }
    }

    /// Run one question to a terminal outcome.
    ///
    /// Never panics and never returns an error value: every failure mode
    /// terminates in an [`AnswerPart::Error`] carrying the offending query
    /// when one exists. A chart failure is logged and dropped; the table
    /// and narrative stand on their own.
    pub async fn answer(&self, question: &str) -> Answer {
        let catalog = self.store.catalog();
        let topic = classify(&self.model, question, self.options.classifier).await;
        tracing::info!(topic = %topic, tables = catalog.len(), "classified question");

        let charting = wants_chart(question);
        let synthesized = synthesize(&self.model, question, topic, &catalog, charting).await;
        let sql = match synthesized.status {
            ValidationStatus::Valid => synthesized.sql,
            ValidationStatus::Rejected(reason) => {
                let raw = (!synthesized.sql.is_empty()).then_some(synthesized.sql);
                return Answer::error(question, topic, reason, raw);
            }
            ValidationStatus::Unvalidated => {
                return Answer::error(
                    question,
                    topic,
                    "query was never validated",
                    Some(synthesized.sql),
                );
            }
        };

        let result = match self.store.execute(&sql) {
            Ok(result) => result,
            Err(StoreError::Execution { message, query }) => {
                return Answer::error(question, topic, format!("SQL error: {message}"), Some(query));
            }
            Err(other) => {
                return Answer::error(question, topic, other.to_string(), Some(sql));
            }
        };
        tracing::debug!(rows = result.row_count(), truncated = result.truncated, "query executed");

        let figure = if charting {
            match synthesize_chart(&self.model, question, &result).await {
                Ok(spec) => Some(spec),
                Err(error) => {
                    tracing::warn!(?error, "chart synthesis failed; answering without a figure");
                    None
                }
            }
        } else {
            None
        };

        let narrative = summarize(
            &self.model,
            question,
            &result,
            self.options.narrative_sample_rows,
        )
        .await;

        let mut parts = vec![AnswerPart::Table { data: result }];
        if let Some(figure) = figure {
            parts.push(AnswerPart::Chart { figure });
        }
        parts.push(AnswerPart::Narrative { text: narrative });

        Answer {
            question: question.to_string(),
            topic,
            sql: Some(sql),
            parts,
        }
    }
}
