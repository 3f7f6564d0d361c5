//! Structural comparison of two converted tables.
//!
//! Only the shape is compared: headers, row counts, JSON key order and value
//! types of the `data` column. Values themselves are never diffed.

use crate::domain::model::CanonicalRecord;
use crate::utils::error::{EtlError, Result};
use csv::ReaderBuilder;
use serde_json::{Map, Value};

pub const DATA_COLUMN: &str = "data";

#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl DataTable {
    pub fn field_order(&self, row: usize) -> Option<Vec<String>> {
        self.rows.get(row).map(|obj| obj.keys().cloned().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSample {
    pub key: String,
    pub value: Value,
    pub type_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSample {
    pub row: usize,
    pub null_fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FormatComparison {
    pub reference_rows: usize,
    pub candidate_rows: usize,
    pub reference_headers: Vec<String>,
    pub candidate_headers: Vec<String>,
    pub reference_sample: Vec<FieldSample>,
    pub candidate_sample: Vec<FieldSample>,
    /// `None` when either table has no rows.
    pub field_order_matches: Option<bool>,
    /// Candidate rows whose key order differs from the candidate's first row.
    pub inconsistent_candidate_rows: Vec<usize>,
    /// Candidate rows whose key order differs from the canonical record.
    pub non_canonical_candidate_rows: Vec<usize>,
    pub reference_null_sample: Option<NullSample>,
}

impl FormatComparison {
    pub fn headers_match(&self) -> bool {
        self.reference_headers == self.candidate_headers
    }

    pub fn is_match(&self) -> bool {
        self.headers_match()
            && self.field_order_matches != Some(false)
            && self.inconsistent_candidate_rows.is_empty()
            && self.non_canonical_candidate_rows.is_empty()
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a converted table; every `data` cell must hold a JSON object.
pub fn read_data_table(data: &[u8]) -> Result<DataTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let data_position = headers
        .iter()
        .position(|h| h == DATA_COLUMN)
        .ok_or_else(|| EtlError::ValidationError {
            message: format!("table has no '{}' column", DATA_COLUMN),
        })?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cell = record.get(data_position).unwrap_or_default();
        match serde_json::from_str::<Value>(cell)? {
            Value::Object(obj) => rows.push(obj),
            other => {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "row {}: '{}' holds a JSON {}, expected an object",
                        i,
                        DATA_COLUMN,
                        json_type_name(&other)
                    ),
                })
            }
        }
    }

    Ok(DataTable { headers, rows })
}

fn sample(table: &DataTable) -> Vec<FieldSample> {
    table
        .rows
        .first()
        .map(|obj| {
            obj.iter()
                .map(|(key, value)| FieldSample {
                    key: key.clone(),
                    value: value.clone(),
                    type_name: json_type_name(value),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn first_null_row(table: &DataTable) -> Option<NullSample> {
    table.rows.iter().enumerate().find_map(|(row, obj)| {
        let null_fields: Vec<String> = obj
            .iter()
            .filter(|(_, value)| value.is_null())
            .map(|(key, _)| key.clone())
            .collect();
        (!null_fields.is_empty()).then_some(NullSample { row, null_fields })
    })
}

pub fn compare_tables(reference: &DataTable, candidate: &DataTable) -> FormatComparison {
    let field_order_matches = match (reference.field_order(0), candidate.field_order(0)) {
        (Some(expected), Some(actual)) => Some(expected == actual),
        _ => None,
    };

    let first_order = candidate.field_order(0).unwrap_or_default();
    let mut inconsistent_candidate_rows = Vec::new();
    let mut non_canonical_candidate_rows = Vec::new();
    for (i, obj) in candidate.rows.iter().enumerate() {
        if !obj.keys().eq(first_order.iter()) {
            inconsistent_candidate_rows.push(i);
        }
        if !obj.keys().map(String::as_str).eq(CanonicalRecord::FIELD_NAMES) {
            non_canonical_candidate_rows.push(i);
        }
    }

    FormatComparison {
        reference_rows: reference.rows.len(),
        candidate_rows: candidate.rows.len(),
        reference_headers: reference.headers.clone(),
        candidate_headers: candidate.headers.clone(),
        reference_sample: sample(reference),
        candidate_sample: sample(candidate),
        field_order_matches,
        inconsistent_candidate_rows,
        non_canonical_candidate_rows,
        reference_null_sample: first_null_row(reference),
    }
}

pub fn compare_formats(reference: &[u8], candidate: &[u8]) -> Result<FormatComparison> {
    let reference = read_data_table(reference)?;
    let candidate = read_data_table(candidate)?;
    Ok(compare_tables(&reference, &candidate))
}
