use chrono::NaiveDate;

/// 把 "Mon, Apr 21" 這類日期轉成 "YYYY-MM-DD"。
///
/// The weekday prefix is optional: everything up to and including the first
/// comma is dropped. The source export carries no year, so `year` is supplied
/// by the caller. Unknown month names, impossible days and empty input yield
/// `None` and the caller drops the row.
pub fn normalize_date(raw: &str, year: i32) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let month_day = match trimmed.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => trimmed,
    };

    NaiveDate::parse_from_str(&format!("{} {}", month_day, year), "%b %d %Y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Strip whitespace and zero-pad a single-digit hour ("6:48 " -> "06:48").
///
/// No range checks: anything that is not blank passes through.
pub fn normalize_time(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    match compact.split_once(':') {
        Some((hour, _)) if hour.chars().count() == 1 => Some(format!("0{}", compact)),
        _ => Some(compact),
    }
}
