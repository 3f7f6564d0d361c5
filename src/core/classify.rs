use crate::core::normalize::normalize_date;
use crate::domain::model::{ColumnIndex, RawRow, SkipReason};
use crate::utils::error::{EtlError, Result};

pub const DATE_LABEL: &str = "Date";
pub const WAKE_TIME_LABEL: &str = "Wake Time";

/// 非追蹤日的標記列
pub const MARKER_LABELS: [&str; 2] = ["BREAK", "NIGHTMARE"];
pub const AGGREGATE_LABEL: &str = "AVG OR SUM";

/// A header row needs more cells than just the two required labels.
const MIN_HEADER_CELLS: usize = 3;

/// The date cell falls back to this position if the header lacks "Date".
const DEFAULT_DATE_POSITION: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    Data { date: String },
    Skip(SkipReason),
}

/// Find the first row of at least [`MIN_HEADER_CELLS`] cells carrying both
/// "Date" and "Wake Time" and index it.
///
/// Returns the header's row position together with its [`ColumnIndex`].
pub fn find_header(rows: &[RawRow]) -> Result<(usize, ColumnIndex)> {
    rows.iter()
        .position(|row| {
            row.len() >= MIN_HEADER_CELLS
                && row.iter().any(|cell| cell == DATE_LABEL)
                && row.iter().any(|cell| cell == WAKE_TIME_LABEL)
        })
        .map(|i| (i, ColumnIndex::from_header(&rows[i])))
        .ok_or_else(|| EtlError::HeaderNotFound {
            required: vec![DATE_LABEL.to_string(), WAKE_TIME_LABEL.to_string()],
        })
}

pub fn classify_row(row: &[String], index: &ColumnIndex, year: i32) -> RowClass {
    if row.len() < 2 {
        return RowClass::Skip(SkipReason::TooShort);
    }
    if row[1].trim().is_empty() {
        return RowClass::Skip(SkipReason::BlankDate);
    }
    if MARKER_LABELS.contains(&row[0].as_str()) {
        return RowClass::Skip(SkipReason::Marker);
    }
    if row[1] == AGGREGATE_LABEL {
        return RowClass::Skip(SkipReason::Aggregate);
    }

    let date_position = index.position(DATE_LABEL).unwrap_or(DEFAULT_DATE_POSITION);
    let date = match row.get(date_position).and_then(|cell| normalize_date(cell, year)) {
        Some(date) => date,
        None => return RowClass::Skip(SkipReason::InvalidDate),
    };

    if row[2..].iter().all(|cell| cell.trim().is_empty()) {
        return RowClass::Skip(SkipReason::NoMetrics);
    }

    RowClass::Data { date }
}
