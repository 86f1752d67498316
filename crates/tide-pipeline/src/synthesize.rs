//! Schema-aware SQL synthesis and safety validation.
//!
//! The model is offered the topic's slice of the live catalog (or the full
//! catalog for `General` or an empty slice) and asked for a single read-only
//! SELECT as JSON. The reply is parsed defensively and then validated:
//! data-modifying keywords and queries referencing no known table are
//! rejected before anything reaches the executor. Column existence is
//! deliberately not re-verified here; the read-only executor is the final
//! authority.

use tide_core::{SchemaCatalog, Topic};

use crate::caller::ModelCaller;
use crate::reply::{extract_json_object, strip_sql_wrapping};

/// Keywords that mark a query as data-modifying. Matched on word
/// boundaries so column names like `created_at` do not trip the scan.
const FORBIDDEN_KEYWORDS: &[&str] = &["insert", "update", "delete", "drop", "alter", "create"];

/// Safety verdict on a synthesized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Unvalidated,
    Valid,
    Rejected(String),
}

/// A model-produced query plus its validation verdict.
///
/// Consumed once by the executor; never persisted.
#[derive(Debug, Clone)]
pub struct SynthesizedQuery {
    pub sql: String,
    pub status: ValidationStatus,
    pub explanation: Option<String>,
}

impl SynthesizedQuery {
    fn rejected(reason: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            status: ValidationStatus::Rejected(reason.into()),
            explanation: None,
        }
    }
}

/// Tables offered to the model for `topic`.
///
/// `General` gets the full catalog; so does any topic whose slice of the
/// lake turns out empty, rather than presenting the model with nothing.
#[must_use]
pub fn scoped_catalog(catalog: &SchemaCatalog, topic: Topic) -> SchemaCatalog {
    if topic == Topic::General {
        return catalog.clone();
    }
    let subset = catalog.filtered(|table| topic.matches_table(table));
    if subset.is_empty() {
        catalog.clone()
    } else {
        subset
    }
}

/// Validate a query against the safety rules.
///
/// Rejects data-modifying keywords and queries that reference no table
/// known to the catalog. Operates on the full catalog regardless of topic:
/// a misclassified question must never loosen validation.
#[must_use]
pub fn validate(sql: &str, catalog: &SchemaCatalog) -> ValidationStatus {
    let tokens: Vec<String> = sql
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect();

    for keyword in FORBIDDEN_KEYWORDS {
        if tokens.iter().any(|token| token == keyword) {
            return ValidationStatus::Rejected(format!(
                "data-modifying keyword '{keyword}' is not allowed"
            ));
        }
    }

    let references_known_table = tokens.iter().any(|token| catalog.contains_table(token));
    if references_known_table {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Rejected("query references no known table".to_string())
    }
}

/// Ask the model for a read-only query answering `question`.
///
/// An empty catalog short-circuits to rejection without a model call. A
/// reply with no extractable statement is rejected as "query could not be
/// generated"; it is never executed as empty.
pub async fn synthesize<M: ModelCaller>(
    model: &M,
    question: &str,
    topic: Topic,
    catalog: &SchemaCatalog,
    charting: bool,
) -> SynthesizedQuery {
    if catalog.is_empty() {
        return SynthesizedQuery::rejected("no tables available", "");
    }

    let scoped = scoped_catalog(catalog, topic);
    let (system, user) = build_prompts(question, &scoped, charting);
    let raw = model.call(system, &user).await;

    let Some((sql, explanation)) = parse_synthesis_reply(&raw) else {
        tracing::debug!(reply = %raw, "no query extractable from model reply");
        return SynthesizedQuery::rejected("query could not be generated", "");
    };

    let status = validate(&sql, catalog);
    if let ValidationStatus::Rejected(reason) = &status {
        tracing::warn!(%reason, %sql, "synthesized query rejected");
    }
    SynthesizedQuery {
        sql,
        status,
        explanation,
    }
}

fn build_prompts(
    question: &str,
    scoped: &SchemaCatalog,
    charting: bool,
) -> (&'static str, String) {
    let system = "You translate questions about a workforce data lake into DuckDB SQL. \
                  Use ONLY the tables and columns listed. Never invent tables, columns or data.";

    let shape = if charting {
        "Shape the result as a time series: the time column first, numeric measures after, \
         sorted ascending by time."
    } else {
        "Shape the result as a readable listing with descriptive column aliases."
    };

    let user = format!(
        "QUESTION:\n{question}\n\n\
         AVAILABLE TABLES (name followed by its columns):\n{schema}\n\
         RULES:\n\
         - Produce exactly one read-only SELECT statement (WITH clauses allowed).\n\
         - Reference only the tables and columns listed above.\n\
         - No INSERT, UPDATE, DELETE, DROP, ALTER or CREATE.\n\
         - {shape}\n\n\
         Reply with JSON only: {{\"sql\": \"...\", \"explanation\": \"one sentence\"}}",
        schema = scoped.describe(),
    );
    (system, user)
}

/// Pull `(sql, explanation)` out of a reply: JSON object first, bare
/// (possibly fenced or labelled) SQL as fallback.
fn parse_synthesis_reply(raw: &str) -> Option<(String, Option<String>)> {
    if let Ok(value) = extract_json_object(raw) {
        if let Some(sql) = value.get("sql").and_then(serde_json::Value::as_str) {
            let sql = sql.trim().trim_end_matches(';').trim();
            if !sql.is_empty() {
                let explanation = value
                    .get("explanation")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                return Some((sql.to_string(), explanation));
            }
        }
    }
    strip_sql_wrapping(raw).map(|sql| (sql, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_iter([
            (
                "fact_job_postings_cleaned".to_string(),
                vec!["year".to_string(), "salary_avg".to_string()],
            ),
            (
                "fact_lfs_overview".to_string(),
                vec!["metric".to_string(), "value".to_string()],
            ),
            (
                "fact_wages_2023".to_string(),
                vec!["occupation".to_string(), "mean".to_string()],
            ),
        ])
    }

    struct FixedReply(&'static str);

    impl ModelCaller for FixedReply {
        async fn call(&self, _system: &str, _user: &str) -> String {
            self.0.to_string()
        }
    }

    /// Panics when invoked; proves a path never reaches the model.
    struct NoCall;

    impl ModelCaller for NoCall {
        async fn call(&self, _system: &str, _user: &str) -> String {
            panic!("model must not be called on this path");
        }
    }

    #[rstest]
    #[case("INSERT INTO fact_wages_2023 VALUES (1)", "insert")]
    #[case("update fact_wages_2023 set mean = 0", "update")]
    #[case("SELECT 1; DROP TABLE fact_wages_2023", "drop")]
    #[case("Delete FROM fact_lfs_overview", "delete")]
    #[case("ALTER TABLE fact_wages_2023 ADD COLUMN x INT", "alter")]
    #[case("CREATE TABLE evil AS SELECT 1", "create")]
    fn data_modifying_keywords_rejected(#[case] sql: &str, #[case] keyword: &str) {
        match validate(sql, &catalog()) {
            ValidationStatus::Rejected(reason) => assert!(reason.contains(keyword)),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn keyword_scan_respects_word_boundaries() {
        let sql = "SELECT created_at, updated_by FROM fact_wages_2023";
        // `created_at` and `updated_by` must not trip `create`/`update`.
        assert_eq!(validate(sql, &catalog()), ValidationStatus::Valid);
    }

    #[test]
    fn unknown_tables_rejected() {
        let status = validate("SELECT * FROM secret_table", &catalog());
        assert_eq!(
            status,
            ValidationStatus::Rejected("query references no known table".to_string())
        );
    }

    #[test]
    fn quoted_table_references_count() {
        let status = validate(
            r#"SELECT metric FROM "fact_lfs_overview""#,
            &catalog(),
        );
        assert_eq!(status, ValidationStatus::Valid);
    }

    #[test]
    fn scoped_catalog_narrows_by_topic() {
        let scoped = scoped_catalog(&catalog(), Topic::Wages);
        assert_eq!(scoped.len(), 1);
        assert!(scoped.contains_table("fact_wages_2023"));
    }

    #[test]
    fn general_topic_gets_full_catalog() {
        assert_eq!(scoped_catalog(&catalog(), Topic::General).len(), 3);
    }

    #[test]
    fn empty_topic_subset_falls_back_to_full_catalog() {
        // No scholarship tables exist in this catalog.
        assert_eq!(scoped_catalog(&catalog(), Topic::Scholarships).len(), 3);
    }

    #[tokio::test]
    async fn empty_catalog_rejects_without_model_call() {
        let result = synthesize(
            &NoCall,
            "anything",
            Topic::General,
            &SchemaCatalog::empty(),
            false,
        )
        .await;
        assert_eq!(
            result.status,
            ValidationStatus::Rejected("no tables available".to_string())
        );
    }

    #[tokio::test]
    async fn json_reply_is_parsed_and_validated() {
        let reply = r#"{"sql": "SELECT year, salary_avg FROM fact_job_postings_cleaned;", "explanation": "Lists salaries by year."}"#;
        let result = synthesize(
            &FixedReply(reply),
            "salaries by year",
            Topic::JobPostings,
            &catalog(),
            false,
        )
        .await;
        assert_eq!(result.status, ValidationStatus::Valid);
        assert_eq!(
            result.sql,
            "SELECT year, salary_avg FROM fact_job_postings_cleaned"
        );
        assert_eq!(
            result.explanation.as_deref(),
            Some("Lists salaries by year.")
        );
    }

    #[tokio::test]
    async fn fenced_bare_sql_is_accepted() {
        let reply = "```sql\nSELECT metric, value FROM fact_lfs_overview\n```";
        let result = synthesize(
            &FixedReply(reply),
            "labour force overview",
            Topic::LabourForce,
            &catalog(),
            false,
        )
        .await;
        assert_eq!(result.status, ValidationStatus::Valid);
        assert_eq!(result.sql, "SELECT metric, value FROM fact_lfs_overview");
    }

    #[tokio::test]
    async fn prose_reply_rejects_as_not_generated() {
        let result = synthesize(
            &FixedReply("I'm sorry, that data is unavailable."),
            "question",
            Topic::General,
            &catalog(),
            false,
        )
        .await;
        assert_eq!(
            result.status,
            ValidationStatus::Rejected("query could not be generated".to_string())
        );
    }

    #[tokio::test]
    async fn model_dml_is_rejected_before_execution() {
        let result = synthesize(
            &FixedReply(r#"{"sql": "DROP TABLE fact_wages_2023"}"#),
            "question",
            Topic::Wages,
            &catalog(),
            false,
        )
        .await;
        assert!(matches!(result.status, ValidationStatus::Rejected(_)));
        assert_eq!(result.sql, "DROP TABLE fact_wages_2023");
    }
}
