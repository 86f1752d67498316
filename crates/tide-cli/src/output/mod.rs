//! Answer rendering for the terminal.

pub mod format;
pub mod table;

use std::fmt::Write;

use tide_core::{Answer, AnswerPart};

/// Render an answer's parts (table, chart, narrative, error) in order.
#[must_use]
pub fn render_answer(answer: &Answer) -> String {
    let mut out = String::new();

    for part in &answer.parts {
        match part {
            AnswerPart::Table { data } => {
                out.push_str("Data\n");
                out.push_str(&table::render(data));
                out.push('\n');
            }
            AnswerPart::Chart { figure } => {
                let _ = write!(
                    out,
                    "Chart: {}; x={}, y={}",
                    figure.kind.as_str(),
                    figure.x,
                    figure.y
                );
                if let Some(color) = &figure.color {
                    let _ = write!(out, ", color={color}");
                }
                if let Some(title) = &figure.title {
                    let _ = write!(out, " ({title})");
                }
                out.push_str("\n\n");
            }
            AnswerPart::Narrative { text } => {
                out.push_str("AI Summary\n");
                out.push_str(text);
                out.push('\n');
            }
            AnswerPart::Error { message, raw } => {
                let _ = writeln!(out, "Error: {message}");
                if let Some(raw) = raw {
                    let _ = writeln!(out, "Query:\n{raw}");
                }
            }
        }
    }
    out
}
