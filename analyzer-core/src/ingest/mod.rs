//! Ingest Module - CSV loading and schema validation
//!
//! Đọc file log honeypot (CSV, header bắt buộc) thành `RawTable`.
//! Schema chỉ kiểm tra sự có mặt của các cột bắt buộc.

pub mod table;


use std::collections::HashSet;

use csv::{ReaderBuilder, Trim};

use crate::error::{AnalyzerError, Result};
pub use table::RawTable;

/// Columns every upload must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "src_ip", "protocol", "country"];

const UTF8_BOM: char = '\u{feff}';

/// Parse CSV bytes into a raw table (no schema check)
pub fn read_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).trim().to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AnalyzerError::Parse("empty file, a header row is required".into()));
    }

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(AnalyzerError::Parse(format!("duplicate column '{}'", header)));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    log::debug!("Read CSV: {} columns, {} rows", headers.len(), rows.len());

    Ok(RawTable::new(headers, rows))
}

/// Check that every required column is present
///
/// Reports all missing columns at once rather than the first one found.
pub fn validate_schema(table: &RawTable) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !table.has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        log::warn!("Upload rejected, missing columns: {:?}", missing);
        Err(AnalyzerError::MissingColumns(missing))
    }
}

/// Read and validate in one step
pub fn load(bytes: &[u8]) -> Result<RawTable> {
    let table = read_csv(bytes)?;
    validate_schema(&table)?;
    Ok(table)
}
