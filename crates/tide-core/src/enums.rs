//! Topic enumeration for question routing.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! A [`Topic`] narrows which lake tables a question may query; it never widens
//! what a query is allowed to do; safety validation is topic-independent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of question domains the assistant understands.
///
/// `General` is the fallback when no domain keyword matches; it grants the
/// synthesizer the full catalog instead of a scoped subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    LabourForce,
    Wages,
    JobPostings,
    WorkPermits,
    Scholarships,
    Students,
    PolicyText,
    General,
}

impl Topic {
    /// Every topic, in routing priority order.
    pub const ALL: [Self; 8] = [
        Self::LabourForce,
        Self::Wages,
        Self::JobPostings,
        Self::WorkPermits,
        Self::Scholarships,
        Self::Students,
        Self::PolicyText,
        Self::General,
    ];

    /// String representation used in serialized output and model prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LabourForce => "labour_force",
            Self::Wages => "wages",
            Self::JobPostings => "job_postings",
            Self::WorkPermits => "work_permits",
            Self::Scholarships => "scholarships",
            Self::Students => "students",
            Self::PolicyText => "policy_text",
            Self::General => "general",
        }
    }

    /// Parse a topic label as returned by a model.
    ///
    /// Accepts hyphens or spaces in place of underscores and ignores case and
    /// surrounding whitespace. Anything out of vocabulary is `None`; callers
    /// coerce that to [`Topic::General`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == normalized)
    }

    /// Table-name fragments that mark a table as belonging to this topic.
    ///
    /// Matched case-insensitively against catalog table names. `General`
    /// matches nothing; it is handled as "use the full catalog" upstream.
    #[must_use]
    pub const fn table_fragments(self) -> &'static [&'static str] {
        match self {
            Self::LabourForce => &["lfs", "labour_force"],
            Self::Wages => &["wage", "ows"],
            Self::JobPostings => &["posting", "worc"],
            Self::WorkPermits => &["permit"],
            Self::Scholarships => &["scholarship", "bursar"],
            Self::Students => &["student"],
            Self::PolicyText => &["sps", "policy"],
            Self::General => &[],
        }
    }

    /// Whether a catalog table name belongs to this topic's slice of the lake.
    #[must_use]
    pub fn matches_table(self, table_name: &str) -> bool {
        let lower = table_name.to_ascii_lowercase();
        self.table_fragments()
            .iter()
            .any(|fragment| lower.contains(fragment))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
