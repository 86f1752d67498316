//! Defensive parsing of model replies.
//!
//! Models wrap their payloads in code fences, labels and prose. These
//! helpers strip the wrapping and extract either a JSON object or a bare
//! SQL statement; anything unextractable is a typed [`ParseError`], never
//! an empty default.

use thiserror::Error;

/// Failure to extract a structured payload from a model reply.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No JSON object or SQL statement could be located in the reply.
    #[error("model reply contained no parsable payload")]
    Empty,

    /// A JSON payload was located but did not parse.
    #[error("model reply was not valid JSON: {message}")]
    Json {
        message: String,
        /// The reply as received, kept for diagnosis.
        raw: String,
    },
}

/// Strip a Markdown code fence, returning the fenced body.
///
/// Replies without a fence pass through trimmed. The language tag on the
/// opening fence (```` ```sql ````, ```` ```json ````) is dropped.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];
    let body_start = after_open.find('\n').map_or(0, |eol| eol + 1);
    let body = &after_open[body_start..];
    let body_end = body.find("```").unwrap_or(body.len());
    body[..body_end].trim()
}

/// Extract and parse the first JSON object embedded in a reply.
///
/// # Errors
///
/// [`ParseError::Empty`] when no braces are present, [`ParseError::Json`]
/// when the braced region is not valid JSON.
pub fn extract_json_object(raw: &str) -> Result<serde_json::Value, ParseError> {
    let cleaned = strip_code_fences(raw);
    let start = cleaned.find('{').ok_or(ParseError::Empty)?;
    let end = cleaned.rfind('}').ok_or(ParseError::Empty)?;
    if end < start {
        return Err(ParseError::Empty);
    }
    serde_json::from_str(&cleaned[start..=end]).map_err(|error| ParseError::Json {
        message: error.to_string(),
        raw: raw.to_string(),
    })
}

/// Extract a bare SQL statement from a reply, dropping fences, labels and
/// leading prose.
///
/// A reply that opens with `WITH` is taken whole (a CTE would otherwise
/// lose its prologue to the `SELECT` anchor inside it); anywhere else
/// `WITH` is treated as the ordinary English word it usually is and the
/// first word-boundary `SELECT` anchors the statement. Returns `None` when
/// no anchor is found; callers treat that as "query could not be
/// generated".
#[must_use]
pub fn strip_sql_wrapping(raw: &str) -> Option<String> {
    let cleaned = strip_code_fences(raw);
    let start = if find_keyword(cleaned, "with") == Some(0) {
        0
    } else {
        find_keyword(cleaned, "select")?
    };
    let statement = cleaned[start..].trim().trim_end_matches(';').trim();
    if statement.is_empty() {
        None
    } else {
        Some(statement.to_string())
    }
}

/// Byte offset of the first word-boundary occurrence of `keyword`.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let lower = text.to_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find(keyword) {
        let at = from + pos;
        let before_ok = at == 0
            || lower[..at]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric() && c != '_');
        let after = lower[at + keyword.len()..].chars().next();
        let after_ok = after.is_none_or(|c| !c.is_alphanumeric() && c != '_');
        if before_ok && after_ok {
            return Some(at);
        }
        from = at + keyword.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fences_are_stripped_with_language_tag() {
        let raw = "```sql\nSELECT 1\n```";
        assert_eq!(strip_code_fences(raw), "SELECT 1");
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  SELECT 1  "), "SELECT 1");
    }

    #[test]
    fn json_object_extracted_from_prose() {
        let raw = "Here you go:\n```json\n{\"sql\": \"SELECT 1\"}\n```\nEnjoy.";
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value["sql"], "SELECT 1");
    }

    #[test]
    fn invalid_json_is_typed_error() {
        let err = extract_json_object("{not json}").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }

    #[test]
    fn missing_json_is_empty_error() {
        let err = extract_json_object("no braces here").unwrap_err();
        assert!(matches!(err, ParseError::Empty));
    }

    #[test]
    fn sql_extracted_past_labels_and_prose() {
        let raw = "Query:\nSELECT year FROM t ORDER BY year;";
        assert_eq!(
            strip_sql_wrapping(raw).unwrap(),
            "SELECT year FROM t ORDER BY year"
        );
    }

    #[test]
    fn select_preferred_over_prose_with() {
        let raw = "Working with your data: SELECT n FROM t";
        assert_eq!(strip_sql_wrapping(raw).unwrap(), "SELECT n FROM t");
    }

    #[test]
    fn leading_cte_is_taken_whole() {
        let raw = "```sql\nWITH recent AS (SELECT * FROM t) SELECT * FROM recent\n```";
        assert_eq!(
            strip_sql_wrapping(raw).unwrap(),
            "WITH recent AS (SELECT * FROM t) SELECT * FROM recent"
        );
    }

    #[test]
    fn prose_without_statement_is_none() {
        assert_eq!(strip_sql_wrapping("I cannot answer that."), None);
    }

    #[test]
    fn selection_is_not_a_select_boundary() {
        assert_eq!(strip_sql_wrapping("The selections were unclear."), None);
    }
}
