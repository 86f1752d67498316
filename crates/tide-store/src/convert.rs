//! `DuckDB` value conversion.
//!
//! Maps the store's scalar types onto the closed [`CellValue`] set. Dates,
//! timestamps and times render as ISO-style text; decimals become floats
//! when they fit and text otherwise; composite values fall back to their
//! debug rendering.

use duckdb::types::{TimeUnit, Value};
use tide_core::CellValue;

/// Convert one store value to a result cell.
#[must_use]
pub fn cell_from_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Boolean(v) => CellValue::Bool(v),
        Value::TinyInt(v) => CellValue::Int(i64::from(v)),
        Value::SmallInt(v) => CellValue::Int(i64::from(v)),
        Value::Int(v) => CellValue::Int(i64::from(v)),
        Value::BigInt(v) => CellValue::Int(v),
        Value::UTinyInt(v) => CellValue::Int(i64::from(v)),
        Value::USmallInt(v) => CellValue::Int(i64::from(v)),
        Value::UInt(v) => CellValue::Int(i64::from(v)),
        Value::UBigInt(v) => i64::try_from(v)
            .map_or_else(|_| CellValue::Text(v.to_string()), CellValue::Int),
        Value::HugeInt(v) => i64::try_from(v)
            .map_or_else(|_| CellValue::Text(v.to_string()), CellValue::Int),
        Value::Float(v) => CellValue::Float(f64::from(v)),
        Value::Double(v) => CellValue::Float(v),
        Value::Decimal(v) => {
            let text = v.to_string();
            text.parse::<f64>()
                .map_or(CellValue::Text(text), CellValue::Float)
        }
        Value::Text(v) | Value::Enum(v) => CellValue::Text(v),
        Value::Date32(days) => CellValue::Text(render_date(days)),
        Value::Timestamp(unit, v) => CellValue::Text(render_timestamp(unit, v)),
        Value::Time64(unit, v) => CellValue::Text(render_time(unit, v)),
        Value::Blob(bytes) => CellValue::Text(format!("<blob {} bytes>", bytes.len())),
        other => CellValue::Text(format!("{other:?}")),
    }
}

/// Days since the Unix epoch to `YYYY-MM-DD`.
fn render_date(days: i32) -> String {
    chrono::DateTime::from_timestamp(i64::from(days) * 86_400, 0)
        .map_or_else(|| days.to_string(), |dt| dt.date_naive().to_string())
}

fn render_timestamp(unit: TimeUnit, value: i64) -> String {
    let (secs, nanos) = split_epoch(unit, value);
    chrono::DateTime::from_timestamp(secs, nanos)
        .map_or_else(|| value.to_string(), |dt| dt.naive_utc().to_string())
}

fn render_time(unit: TimeUnit, value: i64) -> String {
    let (secs, nanos) = split_epoch(unit, value);
    u32::try_from(secs)
        .ok()
        .and_then(|secs| chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos))
        .map_or_else(|| value.to_string(), |time| time.to_string())
}

/// Split a raw temporal value into whole seconds and subsecond nanos.
fn split_epoch(unit: TimeUnit, value: i64) -> (i64, u32) {
    let per_second: i64 = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    };
    let secs = value.div_euclid(per_second);
    let frac = value.rem_euclid(per_second);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = (frac * (1_000_000_000 / per_second)) as u32;
    (secs, nanos)
}
