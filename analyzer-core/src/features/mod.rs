//! Features Module - Event Table → Numeric Feature Table
//!
//! Tách logic trích xuất features khỏi ingest và model.
//! Thứ tự các bước quan trọng: đổi IP sang số trước khi bỏ cột `src_ip`,
//! one-hot encode sau khi đã bỏ các cột không dùng.

pub mod address;
pub mod encoding;
pub mod table;
pub mod timestamp;


use crate::error::{AnalyzerError, Result};
use crate::ingest::RawTable;
use crate::pipeline::{ANOMALY_COLUMN, CLUSTER_COLUMN};
use crate::report::ANOMALY_SCORE_COLUMN;

pub use address::{int_to_octets, ip_to_int};
pub use encoding::one_hot;
pub use table::{ColumnKind, FeatureColumn, FeatureTable};
pub use timestamp::{hour_of_day, parse_timestamp};

/// Derived hour-of-day column
pub const HOUR_COLUMN: &str = "hour";

/// Derived address integer column
pub const IP_INT_COLUMN: &str = "ip_int";

/// Columns removed before encoding (absent ones are skipped)
pub const DROPPED_COLUMNS: [&str; 4] = ["src_ip", "timestamp", "command", "malware_url"];

/// Columns expanded into one-hot indicators
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["protocol", "country"];

/// Names written by the pipeline itself; an input column with one of these
/// names is replaced, not passed through
pub const DERIVED_COLUMNS: [&str; 5] = [
    HOUR_COLUMN,
    IP_INT_COLUMN,
    CLUSTER_COLUMN,
    ANOMALY_COLUMN,
    ANOMALY_SCORE_COLUMN,
];

/// Largest magnitude accepted in a pass-through column; squared distances
/// between rows must stay finite for both models
pub const MAX_MAGNITUDE: f64 = 1e150;

/// Transform a validated event table into a fully numeric feature table
///
/// Output columns: pass-through numeric columns (file order), `hour`,
/// `ip_int`, protocol indicators, country indicators. Row count is preserved;
/// the first bad cell aborts the whole transform.
pub fn transform(raw: &RawTable) -> Result<FeatureTable> {
    let rows = raw.len();
    let mut table = FeatureTable::new(rows);

    // Pass-through columns must already be numeric
    for (index, name) in raw.headers.iter().enumerate() {
        if is_consumed(name) {
            continue;
        }
        if DERIVED_COLUMNS.contains(&name.as_str()) {
            log::warn!("Input column '{}' is overwritten by the derived column", name);
            continue;
        }
        table.push_column(numeric_column(raw, index, name)?);
    }

    // hour
    let mut hours = Vec::with_capacity(rows);
    for (i, value) in required(raw, "timestamp")?.into_iter().enumerate() {
        let hour = hour_of_day(value).ok_or_else(|| AnalyzerError::InvalidTimestamp {
            row: i + 1,
            value: value.to_string(),
        })?;
        hours.push(hour as f64);
    }
    table.push_column(FeatureColumn::integer(HOUR_COLUMN, hours));

    // ip_int
    let mut addresses = Vec::with_capacity(rows);
    for (i, value) in required(raw, "src_ip")?.into_iter().enumerate() {
        let ip = ip_to_int(value).ok_or_else(|| AnalyzerError::InvalidAddress {
            row: i + 1,
            value: value.to_string(),
        })?;
        addresses.push(ip as f64);
    }
    table.push_column(FeatureColumn::integer(IP_INT_COLUMN, addresses));

    // one-hot
    for name in CATEGORICAL_COLUMNS {
        let values: Vec<&str> = required(raw, name)?.into_iter().map(str::trim).collect();
        for column in one_hot(name, &values) {
            table.push_column(column);
        }
    }

    log::debug!(
        "Feature table: {} rows × {} columns",
        table.n_rows(),
        table.n_columns()
    );

    Ok(table)
}

fn is_consumed(name: &str) -> bool {
    DROPPED_COLUMNS.contains(&name) || CATEGORICAL_COLUMNS.contains(&name)
}

fn required<'a>(raw: &'a RawTable, name: &str) -> Result<Vec<&'a str>> {
    raw.column(name)
        .ok_or_else(|| AnalyzerError::MissingColumns(vec![name.to_string()]))
}

/// Parse an extra column as numbers; integer-looking columns stay integers
fn numeric_column(raw: &RawTable, index: usize, name: &str) -> Result<FeatureColumn> {
    let mut values = Vec::with_capacity(raw.len());
    let mut all_integer = true;

    for (i, row) in raw.rows.iter().enumerate() {
        let cell = row[index].trim();
        let value = cell
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AnalyzerError::NonNumericValue {
                column: name.to_string(),
                row: i + 1,
                value: cell.to_string(),
            })?;

        if value.abs() > MAX_MAGNITUDE {
            return Err(AnalyzerError::ValueOutOfRange {
                column: name.to_string(),
                row: i + 1,
                value: cell.to_string(),
            });
        }

        all_integer &= cell.parse::<i64>().is_ok();
        values.push(value);
    }

    let kind = if all_integer { ColumnKind::Integer } else { ColumnKind::Float };
    Ok(FeatureColumn::new(name, kind, values))
}
