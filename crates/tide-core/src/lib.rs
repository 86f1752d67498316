//! # tide-core
//!
//! Core types shared across all tidepool crates:
//! - The [`Topic`] enumeration that scopes a question to a slice of the lake
//! - Tabular result types ([`TabularResult`], [`CellValue`])
//! - The live [`SchemaCatalog`] snapshot
//! - Declarative chart types ([`ChartKind`], [`ChartSpec`])
//! - The discriminated [`Answer`]/[`AnswerPart`] envelope handed to consumers

pub mod answer;
pub mod catalog;
pub mod chart;
pub mod enums;
pub mod result;

pub use answer::{Answer, AnswerPart};
pub use catalog::SchemaCatalog;
pub use chart::{ChartKind, ChartSpec};
pub use enums::Topic;
pub use result::{CellValue, TabularResult};
