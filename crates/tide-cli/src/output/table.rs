//! Plain-text table rendering for tabular results.

use tide_core::{CellValue, TabularResult};

use super::format::{fmt_ci_dec, fmt_float, is_currency_column};

/// Render one cell for display.
fn format_cell(column: &str, cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::Bool(v) => v.to_string(),
        // Plain integers (years, counts used as keys) stay ungrouped so
        // values like 2024 do not render as 2,024.
        CellValue::Int(v) => {
            if is_currency_column(column) {
                #[allow(clippy::cast_precision_loss)]
                let amount = *v as f64;
                fmt_ci_dec(amount)
            } else {
                v.to_string()
            }
        }
        CellValue::Float(v) => {
            if is_currency_column(column) {
                fmt_ci_dec(*v)
            } else {
                fmt_float(*v)
            }
        }
        CellValue::Text(v) => v.clone(),
    }
}

/// Render a result as an aligned text table, with an explicit truncation
/// note when the row cap cut it short.
#[must_use]
pub fn render(result: &TabularResult) -> String {
    if result.columns.is_empty() {
        return String::from("(no columns)\n");
    }

    let formatted: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .zip(row)
                .map(|(column, cell)| format_cell(column, cell))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = result.columns.iter().map(String::len).collect();
    for row in &formatted {
        for (idx, cell) in row.iter().enumerate() {
            if cell.len() > widths[idx] {
                widths[idx] = cell.len();
            }
        }
    }

    let mut out = String::new();
    render_row(&mut out, &result.columns, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    render_row(&mut out, &rule, &widths);
    for row in &formatted {
        render_row(&mut out, row, &widths);
    }

    if result.is_empty() {
        out.push_str("(no rows)\n");
    }
    if result.truncated {
        use std::fmt::Write;
        let _ = writeln!(out, "(truncated at {} rows)", result.row_count());
    }
    out
}

fn render_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            out.push_str("  ");
        }
        let cell = cell.as_ref();
        out.push_str(cell);
        if idx + 1 < cells.len() {
            for _ in cell.len()..widths[idx] {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_aligned_columns_with_currency() {
        let result = TabularResult::new(
            vec!["year".into(), "avg_salary".into()],
            vec![
                vec![CellValue::Int(2023), CellValue::Float(59_500.0)],
                vec![CellValue::Int(2024), CellValue::Float(64_000.0)],
            ],
            false,
        );
        let text = render(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "year  avg_salary");
        assert!(lines[2].starts_with("2023"));
        assert!(lines[2].ends_with("CI$59,500.00"));
    }

    #[test]
    fn truncation_is_announced() {
        let result = TabularResult::new(
            vec!["n".into()],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
            true,
        );
        assert!(render(&result).contains("(truncated at 2 rows)"));
    }

    #[test]
    fn empty_result_is_explicit() {
        let result = TabularResult::new(vec!["n".into()], Vec::new(), false);
        assert!(render(&result).contains("(no rows)"));
    }

    #[test]
    fn nulls_render_blank() {
        assert_eq!(format_cell("note", &CellValue::Null), "");
    }
}
