//! Topic classification.
//!
//! Two strategies: deterministic keyword rules (the default; no network
//! round trip), and a constrained model prompt whose only legal outputs are
//! the topic labels. Both coerce anything unrecognized to
//! [`Topic::General`]; a wrong topic only degrades relevance, never safety,
//! because query validation is topic-independent.

use tide_config::ClassifierStrategy;
use tide_core::Topic;

use crate::caller::ModelCaller;

/// Ordered routing rules: first topic whose keyword appears in the
/// lowercased question wins. Declaration order breaks ties.
pub const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::LabourForce,
        &[
            "labour force",
            "labor force",
            "unemployment",
            "unemployed",
            "employment",
            "employed",
            "participation rate",
            "lfs",
            "jobless",
        ],
    ),
    (
        Topic::Wages,
        &["salary", "salaries", "wage", "wages", "earnings", "ows"],
    ),
    (
        Topic::JobPostings,
        &[
            "job posting",
            "postings",
            "vacancy",
            "vacancies",
            "openings",
            "worc",
            "job board",
            "advertised roles",
        ],
    ),
    (
        Topic::WorkPermits,
        &["work permit", "permits", "permit", "occupation", "occupations"],
    ),
    (
        Topic::Scholarships,
        &[
            "scholarship",
            "scholarships",
            "bursary",
            "bursaries",
            "grant",
            "grants",
        ],
    ),
    (
        Topic::Students,
        &[
            "student",
            "students",
            "college",
            "university",
            "undergrad",
            "postgrad",
            "degree",
            "graduation",
            "graduate",
            "final year",
        ],
    ),
    (
        Topic::PolicyText,
        &["sps", "strategic policy", "policy statement", "policy"],
    ),
];

/// Classify by keyword rules; no match yields [`Topic::General`].
#[must_use]
pub fn classify_keywords(question: &str) -> Topic {
    let lowered = question.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(Topic::General, |(topic, _)| *topic)
}

/// Classify by delegating to the model with a label-constrained prompt.
///
/// Out-of-vocabulary replies coerce to [`Topic::General`], exactly like the
/// keyword path's no-match case.
pub async fn classify_with_model<M: ModelCaller>(model: &M, question: &str) -> Topic {
    let labels: Vec<&str> = Topic::ALL.iter().map(|topic| topic.as_str()).collect();
    let system = "You label questions about a workforce data lake. \
                  Reply with exactly one label and nothing else.";
    let user = format!(
        "Labels: {}\n\nQuestion: {question}\n\nLabel:",
        labels.join(", ")
    );

    let reply = model.call(system, &user).await;
    let label = reply.trim().trim_matches(['"', '\'', '.', '`']);
    Topic::from_label(label).unwrap_or(Topic::General)
}

/// Classify with the configured strategy.
pub async fn classify<M: ModelCaller>(
    model: &M,
    question: &str,
    strategy: ClassifierStrategy,
) -> Topic {
    match strategy {
        ClassifierStrategy::Keyword => classify_keywords(question),
        ClassifierStrategy::Model => classify_with_model(model, question).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("What is the unemployment rate this year?", Topic::LabourForce)]
    #[case("Average salary by year for tech roles", Topic::Wages)]
    #[case("Which employers had the most vacancies?", Topic::JobPostings)]
    #[case("Work permit totals by occupation", Topic::WorkPermits)]
    #[case("How many scholarships were awarded?", Topic::Scholarships)]
    #[case("Students near graduation by major", Topic::Students)]
    #[case("What does the SPS say about skills?", Topic::PolicyText)]
    #[case("Tell me something interesting", Topic::General)]
    fn keyword_routing(#[case] question: &str, #[case] expected: Topic) {
        assert_eq!(classify_keywords(question), expected);
    }

    #[test]
    fn declaration_order_breaks_ties() {
        // "employment" (labour force) and "postings" (job postings) both
        // match; the earlier rule wins.
        assert_eq!(
            classify_keywords("employment figures from job postings"),
            Topic::LabourForce
        );
    }

    #[test]
    fn no_match_defaults_to_general() {
        assert_eq!(classify_keywords(""), Topic::General);
        assert_eq!(classify_keywords("weather tomorrow?"), Topic::General);
    }

    struct FixedReply(&'static str);

    impl ModelCaller for FixedReply {
        async fn call(&self, _system: &str, _user: &str) -> String {
            self.0.to_string()
        }
    }

    #[tokio::test]
    async fn model_reply_parses_label() {
        let topic = classify_with_model(&FixedReply("job_postings"), "anything").await;
        assert_eq!(topic, Topic::JobPostings);
    }

    #[tokio::test]
    async fn model_reply_tolerates_decoration() {
        let topic = classify_with_model(&FixedReply("\"labour-force\"."), "anything").await;
        assert_eq!(topic, Topic::LabourForce);
    }

    #[tokio::test]
    async fn out_of_vocabulary_reply_coerces_to_general() {
        let topic =
            classify_with_model(&FixedReply("this question concerns fisheries"), "anything").await;
        assert_eq!(topic, Topic::General);
    }
}
