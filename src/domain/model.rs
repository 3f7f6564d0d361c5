use serde::{Serialize, Serializer};
use serde_json::ser::Formatter;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

/// 來源表格的一列，欄位意義取決於偵測到的標題列
pub type RawRow = Vec<String>;

/// Header label → cell position, built once from the detected header row.
///
/// Duplicate labels resolve to their last occurrence and blank labels are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (i, label) in header.iter().enumerate() {
            if !label.is_empty() {
                positions.insert(label.clone(), i);
            }
        }
        Self { positions }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// The cell under `label`, or `None` when the column is unknown or the
    /// row is too short to reach it.
    pub fn cell<'a>(&self, row: &'a [String], label: &str) -> Option<&'a str> {
        self.position(label)
            .and_then(|i| row.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A canonical value. `Null`, `Empty` and `Bool(false)` are distinct signals
/// in the target format and must never be collapsed into one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Empty,
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Empty => serializer.serialize_str(""),
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Bool(flag) => serializer.serialize_bool(*flag),
        }
    }
}

/// 目標格式的 data 物件；欄位宣告順序即為輸出的 JSON key 順序
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub hrv: FieldValue,
    pub calories: FieldValue,
    pub deep_work: FieldValue,
    pub recovery: FieldValue,
    pub sleep_time: FieldValue,
    pub cold_shower: FieldValue,
    pub no_dopamine: FieldValue,
    pub sleep_hours: FieldValue,
    pub waking_time: FieldValue,
    pub daily_weight: FieldValue,
    pub water_intake: FieldValue,
    pub reading_hours: FieldValue,
    pub protein_intake: FieldValue,
    pub jiu_jitsu_sessions: FieldValue,
    pub weightlifting_sessions: FieldValue,
}

impl CanonicalRecord {
    pub const FIELD_NAMES: [&'static str; 15] = [
        "hrv",
        "calories",
        "deepWork",
        "recovery",
        "sleepTime",
        "coldShower",
        "noDopamine",
        "sleepHours",
        "wakingTime",
        "dailyWeight",
        "waterIntake",
        "readingHours",
        "proteinIntake",
        "jiuJitsuSessions",
        "weightliftingSessions",
    ];

    /// Compact JSON, no whitespace around `:` or `,`, non-ASCII escaped as
    /// `\uXXXX` the way the target application's own exports are.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// `CompactFormatter` that writes every non-ASCII char as UTF-16 `\u` escapes.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// 輸出 CSV 的一列；struct 欄位名稱即為標題 `user_id,date,data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub user_id: String,
    pub date: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// fewer than two cells
    TooShort,
    BlankDate,
    /// BREAK / NIGHTMARE marker days
    Marker,
    /// trailing "AVG OR SUM" row
    Aggregate,
    InvalidDate,
    /// a date but no tracked metrics
    NoMetrics,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooShort => "too_short",
            SkipReason::BlankDate => "blank_date",
            SkipReason::Marker => "marker",
            SkipReason::Aggregate => "aggregate",
            SkipReason::InvalidDate => "invalid_date",
            SkipReason::NoMetrics => "no_metrics",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipStats {
    counts: BTreeMap<SkipReason, usize>,
}

impl SkipStats {
    pub fn record(&mut self, reason: SkipReason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.counts.iter().map(|(reason, count)| (*reason, *count))
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub output_rows: Vec<OutputRow>,
    pub skipped: SkipStats,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub converted_rows: usize,
    pub skipped: SkipStats,
}
