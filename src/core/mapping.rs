use crate::core::normalize::normalize_time;
use crate::domain::model::{CanonicalRecord, ColumnIndex, FieldValue};

/// Source column labels, as they appear in the daily log export.
pub mod columns {
    pub const HRV: &str = "HRV";
    pub const CALORIES: &str = "Calories";
    pub const DEEP_WORK: &str = "Deep Work (hrs)";
    pub const RECOVERY: &str = "Recovery";
    pub const SLEEP_TIME: &str = "Sleep Time";
    pub const COLD_SHOWER: &str = "Cold Shower";
    pub const NO_DOPAMINE: &str = "No Dopamine";
    pub const SLEEP_HOURS: &str = "Sleep (hrs)";
    pub const WAKE_TIME: &str = "Wake Time";
    pub const WEIGHT: &str = "Weight";
    pub const WATER: &str = "Water";
    pub const READING: &str = "Reading";
    pub const PROTEIN: &str = "Protein";
    pub const TRAINING: &str = "Training";
}

/// 把一列已通過分類的資料轉成目標格式的欄位
pub fn map_record(row: &[String], index: &ColumnIndex) -> CanonicalRecord {
    CanonicalRecord {
        hrv: text_field(row, index, columns::HRV),
        calories: text_field(row, index, columns::CALORIES),
        deep_work: text_field(row, index, columns::DEEP_WORK),
        recovery: text_field(row, index, columns::RECOVERY),
        sleep_time: time_field(row, index, columns::SLEEP_TIME),
        cold_shower: flag_field(row, index, columns::COLD_SHOWER),
        no_dopamine: flag_field(row, index, columns::NO_DOPAMINE),
        sleep_hours: text_field(row, index, columns::SLEEP_HOURS),
        waking_time: time_field(row, index, columns::WAKE_TIME),
        daily_weight: text_field(row, index, columns::WEIGHT),
        water_intake: text_field(row, index, columns::WATER),
        reading_hours: tracked_field(row, index, columns::READING),
        protein_intake: text_field(row, index, columns::PROTEIN),
        jiu_jitsu_sessions: tracked_field(row, index, columns::TRAINING),
        // 來源沒有重訓資料，目標格式仍需要這個欄位
        weightlifting_sessions: FieldValue::Empty,
    }
}

fn present<'a>(row: &'a [String], index: &ColumnIndex, label: &str) -> Option<&'a str> {
    index.cell(row, label).filter(|cell| !cell.is_empty())
}

fn text_field(row: &[String], index: &ColumnIndex, label: &str) -> FieldValue {
    present(row, index, label).map_or(FieldValue::Null, FieldValue::text)
}

fn time_field(row: &[String], index: &ColumnIndex, label: &str) -> FieldValue {
    present(row, index, label)
        .and_then(normalize_time)
        .map_or(FieldValue::Null, FieldValue::Text)
}

/// "1" is true, any other non-empty text is false.
fn flag_field(row: &[String], index: &ColumnIndex, label: &str) -> FieldValue {
    present(row, index, label).map_or(FieldValue::Null, |cell| FieldValue::Bool(cell == "1"))
}

/// An empty cell means "tracked, nothing logged" and stays distinct from a
/// missing column.
fn tracked_field(row: &[String], index: &ColumnIndex, label: &str) -> FieldValue {
    match index.cell(row, label) {
        Some("") => FieldValue::Empty,
        Some(cell) => FieldValue::text(cell),
        None => FieldValue::Null,
    }
}
