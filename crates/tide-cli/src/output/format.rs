//! Number and currency formatting helpers.
//!
//! Pure functions; the amounts in the lake are Cayman Islands dollars, so
//! currency-shaped columns render with the `CI$` prefix the original
//! reports used.

/// Column names that hold currency amounts.
const CURRENCY_FRAGMENTS: &[&str] = &["salary", "wage", "mean", "median", "p10", "p25"];

/// Whether a result column should be rendered as currency.
#[must_use]
pub fn is_currency_column(name: &str) -> bool {
    let lowered = name.to_lowercase();
    CURRENCY_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

/// Group an integer with thousands separators: `1048` -> `"1,048"`.
#[must_use]
pub fn fmt_int(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (idx, c) in digits.chars().enumerate() {
        if idx != 0 && idx % 3 == lead % 3 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a float with thousands separators, keeping two decimals only when
/// the value has a fractional part: `59500.0` -> `"59,500"`, `61.25` ->
/// `"61.25"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fmt_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        return fmt_int(rounded as i64);
    }
    let text = format!("{rounded:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let mut out = if int_value == 0 && int_part.starts_with('-') {
        format!("-{}", fmt_int(0))
    } else {
        fmt_int(int_value)
    };
    out.push('.');
    out.push_str(frac_part);
    out
}

/// Currency with whole dollars: `CI$1,048`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fmt_ci(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    format!("CI${}", fmt_int(value.round() as i64))
}

/// Currency with cents: `CI$1,048.25`.
#[must_use]
pub fn fmt_ci_dec(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.2}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = fmt_int(int_part.parse().unwrap_or(0));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}CI${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_grouping() {
        assert_eq!(fmt_int(0), "0");
        assert_eq!(fmt_int(999), "999");
        assert_eq!(fmt_int(1_048), "1,048");
        assert_eq!(fmt_int(1_234_567), "1,234,567");
        assert_eq!(fmt_int(-42_000), "-42,000");
    }

    #[test]
    fn float_grouping_trims_whole_values() {
        assert_eq!(fmt_float(59_500.0), "59,500");
        assert_eq!(fmt_float(61.25), "61.25");
        assert_eq!(fmt_float(1_234.5), "1,234.50");
        assert_eq!(fmt_float(-0.5), "-0.50");
    }

    #[test]
    fn currency_formats() {
        assert_eq!(fmt_ci(1_048.4), "CI$1,048");
        assert_eq!(fmt_ci_dec(1_048.25), "CI$1,048.25");
        assert_eq!(fmt_ci_dec(-250.0), "-CI$250.00");
    }

    #[test]
    fn currency_column_detection() {
        assert!(is_currency_column("avg_salary"));
        assert!(is_currency_column("Median"));
        assert!(is_currency_column("p25"));
        assert!(!is_currency_column("year"));
        assert!(!is_currency_column("employer_name"));
    }
}
