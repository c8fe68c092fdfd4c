//! Column averages from CSV exports
//!
//! Reads a comma-separated table whose first line is a header row and
//! averages the first "level" column and the first "temp" column.
//! Parsing is deliberately lenient: quotes are not interpreted, cells that
//! do not start with a number are skipped, and input without a usable
//! header yields "N/A" for both metrics instead of an error.

use serde::{Serialize, Serializer};

/// Marker printed when a column had no numeric values
pub const NOT_AVAILABLE: &str = "N/A";

/// An averaged column, or "N/A" when nothing could be averaged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    NotAvailable,
}

impl Metric {
    /// The average, if any values were parsed
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotAvailable => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{}", v),
            Metric::NotAvailable => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Averages of the level and temperature columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CsvSummary {
    pub level: Metric,
    pub temperature: Metric,
}

/// Running sum and count for one column
#[derive(Debug, Default)]
struct ColumnAverage {
    index: Option<usize>,
    sum: f64,
    count: usize,
}

impl ColumnAverage {
    fn at(index: Option<usize>) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    fn observe(&mut self, record: &csv::StringRecord) {
        let Some(index) = self.index else { return };
        let Some(cell) = record.get(index) else { return };
        if cell.is_empty() {
            return;
        }
        if let Some(value) = parse_leading_number(cell) {
            self.sum += value;
            self.count += 1;
        }
    }

    fn finish(&self) -> Metric {
        if self.count > 0 {
            Metric::Value(self.sum / self.count as f64)
        } else {
            Metric::NotAvailable
        }
    }
}

/// Average the "level" and "temp" columns of a CSV text.
///
/// The first line is always the header row, even when it is blank.
/// Header names are matched case-insensitively by substring, so
/// `"Water Level (m)"` counts as a level column; the first match wins.
pub fn summarize(csv_text: &str) -> CsvSummary {
    let (header_line, body) = csv_text.split_once('\n').unwrap_or((csv_text, ""));

    let headers: Vec<String> = header_line
        .trim_end_matches('\r')
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let level_index = find_column(&headers, "level");
    let temp_index = find_column(&headers, "temp");
    log::debug!("CSV columns: level={:?} temperature={:?}", level_index, temp_index);

    let mut level = ColumnAverage::at(level_index);
    let mut temperature = ColumnAverage::at(temp_index);
    if level_index.is_none() && temp_index.is_none() {
        return CsvSummary {
            level: level.finish(),
            temperature: temperature.finish(),
        };
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    for (row, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                level.observe(&record);
                temperature.observe(&record);
            }
            Err(e) => log::debug!("Skipping CSV row {}: {}", row + 2, e),
        }
    }

    CsvSummary {
        level: level.finish(),
        temperature: temperature.finish(),
    }
}

/// Position of the first header containing `needle`
fn find_column(headers: &[String], needle: &str) -> Option<usize> {
    headers.iter().position(|h| h.contains(needle))
}

/// Parse the number at the start of a cell, ignoring anything after it.
///
/// `" 21.5 C"` gives 21.5, `"abc"` gives `None`.
fn parse_leading_number(cell: &str) -> Option<f64> {
    libreta_utils::leading_number(cell)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ==================== Tests ====================
