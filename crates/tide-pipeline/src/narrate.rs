//! Grounded narrative generation.
//!
//! The model sees a bounded projection of the result, never the unbounded
//! table, and is instructed to state only what the sample supports, in a
//! neutral executive register. Narrative failure degrades to a fixed
//! fallback string; it never aborts the table or chart that preceded it.

use tide_core::TabularResult;

use crate::caller::ModelCaller;

/// Fallback when the model cannot be reached after retries.
pub const SUMMARY_UNAVAILABLE: &str =
    "Summary unavailable: the analysis service could not be reached.";

/// Reply for an empty result; the model is not consulted about nothing.
pub const NO_DATA_REPLY: &str = "No data available for this query.";

/// Summarize `result` for `question`, sampling at most `sample_rows` rows.
pub async fn summarize<M: ModelCaller>(
    model: &M,
    question: &str,
    result: &TabularResult,
    sample_rows: usize,
) -> String {
    if result.is_empty() {
        return NO_DATA_REPLY.to_string();
    }

    let sample = result.sample_records(sample_rows);
    let truncation_note = if result.truncated {
        "\nNOTE: the data was truncated at the row cap and may be incomplete.\n"
    } else {
        ""
    };

    let system = "You write clear, executive-level analytical summaries.";
    let user = format!(
        "Use the DATA below to answer the QUESTION.\n\n\
         QUESTION:\n{question}\n\n\
         DATA (one record per line):\n{sample}{truncation_note}\n\
         GUIDELINES:\n\
         - Write 3-7 sentences, concise and clear.\n\
         - Use business-oriented language suitable for senior leadership.\n\
         - Use ONLY the numbers and facts present in the data; no speculation or external sources.\n\
         - Use commas in large numbers (e.g., 1048 -> 1,048).\n\
         - Use percentages with one decimal place where appropriate.\n\
         - Turn table-like data into insights; do not repeat raw rows back.\n\
         - If the data is incomplete, say what can be inferred and what cannot.\n\n\
         Return ONLY the final written answer."
    );

    let reply = model.call(system, &user).await;
    if tide_model::is_failure_reply(&reply) {
        tracing::warn!("narrative generation unavailable; using fallback");
        return SUMMARY_UNAVAILABLE.to_string();
    }
    reply
}
