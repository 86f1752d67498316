//! End-to-end pipeline flows through the public API.

use std::collections::VecDeque;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use tide_core::{CellValue, Topic};
use tide_pipeline::{ModelCaller, Orchestrator, PipelineOptions};
use tide_store::Store;

struct Scripted(Mutex<VecDeque<&'static str>>);

impl Scripted {
    fn new(replies: &[&'static str]) -> Self {
        Self(Mutex::new(replies.iter().copied().collect()))
    }
}

impl ModelCaller for Scripted {
    async fn call(&self, _system: &str, _user: &str) -> String {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected model call")
            .to_string()
    }
}

fn postings_store() -> Store {
    let store = Store::open_in_memory(500).expect("open store");
    store
        .conn()
        .execute_batch(
            "CREATE TABLE fact_job_postings_cleaned (
                year INTEGER,
                job_title TEXT,
                salary_avg DOUBLE
            );
            INSERT INTO fact_job_postings_cleaned VALUES
                (2022, 'Developer', 55000.0),
                (2023, 'Developer', 58500.0),
                (2024, 'Developer', 62000.0);",
        )
        .expect("seed");
    store
}

#[tokio::test]
async fn question_flows_to_table_and_narrative() {
    let model = Scripted::new(&[
        r#"{"sql": "SELECT year, AVG(salary_avg) AS avg_salary FROM fact_job_postings_cleaned GROUP BY year ORDER BY year", "explanation": "Averages by year."}"#,
        "Average salaries climbed each year, reaching 62,000 in 2024.",
    ]);
    let pipeline = Orchestrator::new(postings_store(), model, PipelineOptions::default());

    let answer = pipeline.answer("average salary by year").await;

    assert_eq!(answer.topic, Topic::Wages);
    assert!(!answer.is_error());

    let table = answer.table().expect("table part");
    assert_eq!(table.columns, vec!["year", "avg_salary"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][0], CellValue::Int(2022));
    assert!(answer.chart().is_none());
    assert!(answer.narrative().unwrap().contains("62,000"));

    let json = serde_json::to_value(&answer).expect("serialize answer");
    assert_eq!(json["parts"][0]["kind"], "table");
    assert_eq!(json["parts"][1]["kind"], "narrative");
}

#[tokio::test]
async fn empty_lake_reports_error_not_panic() {
    let store = Store::open_in_memory(500).expect("open store");
    let pipeline = Orchestrator::new(store, Scripted::new(&[]), PipelineOptions::default());

    let answer = pipeline.answer("anything at all").await;
    assert!(answer.is_error());

    let json = serde_json::to_value(&answer).expect("serialize answer");
    assert_eq!(json["parts"][0]["kind"], "error");
    assert_eq!(json["parts"][0]["message"], "no tables available");
}
