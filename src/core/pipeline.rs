use crate::core::classify::{classify_row, find_header, RowClass};
use crate::core::mapping::map_record;
use crate::core::{ConfigProvider, OutputRow, Pipeline, RawRow, Storage, TransformResult};
use crate::domain::model::SkipStats;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};

pub const OUTPUT_HEADER: [&str; 3] = ["user_id", "date", "data"];

/// 每日紀錄 CSV → 目標格式 CSV 的轉換管道
pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    fn extract(&self) -> Result<Vec<RawRow>> {
        tracing::debug!("Reading source table from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path())?;
        parse_source_table(&data)
    }

    fn transform(&self, rows: Vec<RawRow>) -> Result<TransformResult> {
        convert_rows(&rows, self.config.user_id(), self.config.year())
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let data = write_output_table(&result.output_rows)?;

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            result.output_rows.len(),
            data.len(),
            self.config.output_path()
        );
        self.storage.write_file(self.config.output_path(), &data)?;

        Ok(self.config.output_path().to_string())
    }
}

/// The source export has free-form rows above its header and ragged row
/// lengths, so it is read without a header and in flexible mode.
pub fn parse_source_table(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows: Vec<RawRow> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Header detection, row filtering and field mapping over a whole table.
///
/// Output rows keep source order. Only a missing header is fatal.
pub fn convert_rows(rows: &[RawRow], user_id: &str, year: i32) -> Result<TransformResult> {
    let (header_position, index) = find_header(rows)?;
    tracing::debug!(
        "Header found at row {} with {} labelled columns",
        header_position + 1,
        index.len()
    );

    let mut output_rows = Vec::new();
    let mut skipped = SkipStats::default();

    for (offset, row) in rows[header_position + 1..].iter().enumerate() {
        match classify_row(row, &index, year) {
            RowClass::Data { date } => {
                let record = map_record(row, &index);
                output_rows.push(OutputRow {
                    user_id: user_id.to_string(),
                    date,
                    data: record.to_json()?,
                });
            }
            RowClass::Skip(reason) => {
                tracing::debug!(
                    "Skipping row {} ({})",
                    header_position + offset + 2,
                    reason.as_str()
                );
                skipped.record(reason);
            }
        }
    }

    Ok(TransformResult {
        output_rows,
        skipped,
    })
}

/// The header row is written even when no data row survived.
pub fn write_output_table(rows: &[OutputRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const USER_ID: &str = "0b3c6a14-8d1e-4ca4-b44f-8b89980bc61b";

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for &MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "in.csv"
        }

        fn output_path(&self) -> &str {
            "out.csv"
        }

        fn user_id(&self) -> &str {
            USER_ID
        }

        fn year(&self) -> i32 {
            2025
        }
    }

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn full_header() -> RawRow {
        row(&[
            "Day",
            "Date",
            "HRV",
            "Calories",
            "Deep Work (hrs)",
            "Recovery",
            "Sleep Time",
            "Cold Shower",
            "No Dopamine",
            "Sleep (hrs)",
            "Wake Time",
            "Weight",
            "Water",
            "Reading",
            "Training",
        ])
    }

    #[test]
    fn test_convert_reference_row() {
        let rows = vec![
            full_header(),
            row(&[
                "Mon, Apr 21",
                "Apr 21",
                "72",
                "2100",
                "1.5",
                "8",
                "6:48",
                "1",
                "0",
                "7.5",
                "23:12",
                "150",
                "2.1",
                "",
                "1",
            ]),
        ];

        let result = convert_rows(&rows, USER_ID, 2025).unwrap();

        assert_eq!(result.output_rows.len(), 1);
        let out = &result.output_rows[0];
        assert_eq!(out.user_id, USER_ID);
        assert_eq!(out.date, "2025-04-21");
        assert_eq!(
            out.data,
            r#"{"hrv":"72","calories":"2100","deepWork":"1.5","recovery":"8","sleepTime":"06:48","coldShower":true,"noDopamine":false,"sleepHours":"7.5","wakingTime":"23:12","dailyWeight":"150","waterIntake":"2.1","readingHours":"","proteinIntake":null,"jiuJitsuSessions":"1","weightliftingSessions":""}"#
        );
    }

    #[test]
    fn test_convert_excludes_non_data_rows_and_keeps_order() {
        let rows = vec![
            row(&["Midnight Log Daily 2025"]),
            full_header(),
            row(&["Wed, Apr 23", "Apr 23", "70"]),
            row(&["BREAK", "Apr 24", "70"]),
            row(&["NIGHTMARE", "Apr 25", "70"]),
            row(&["Sat, Apr 26", "", "70"]),
            row(&["Sun, Apr 27", "Apr 27", "", ""]),
            row(&["Mon, Apr 28", "Aprl 28", "71"]),
            row(&["Tue, Apr 22", "Apr 22", "68"]),
            row(&["", "AVG OR SUM", "69"]),
        ];

        let result = convert_rows(&rows, USER_ID, 2025).unwrap();

        let dates: Vec<&str> = result.output_rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-04-23", "2025-04-22"]);
        assert_eq!(result.skipped.total(), 6);
        assert_eq!(result.skipped.count(crate::domain::model::SkipReason::Marker), 2);
    }

    #[test]
    fn test_convert_without_header_fails() {
        let rows = vec![row(&["Mon, Apr 21", "Apr 21", "72"])];

        let err = convert_rows(&rows, USER_ID, 2025).unwrap_err();
        assert!(matches!(err, EtlError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_write_output_table_quotes_json() {
        let rows = vec![OutputRow {
            user_id: USER_ID.to_string(),
            date: "2025-04-21".to_string(),
            data: r#"{"hrv":"72","coldShower":true}"#.to_string(),
        }];

        let data = String::from_utf8(write_output_table(&rows).unwrap()).unwrap();

        assert_eq!(
            data,
            format!(
                "user_id,date,data\r\n{},2025-04-21,{}\r\n",
                USER_ID, r#""{""hrv"":""72"",""coldShower"":true}""#
            )
        );
    }

    #[test]
    fn test_write_output_table_header_only() {
        let data = write_output_table(&[]).unwrap();
        assert_eq!(data, b"user_id,date,data\r\n");
    }

    #[test]
    fn test_parse_source_table_ragged_rows() {
        let source = b"title\nDay,Date,Wake Time\nMon,Apr 21,6:48,extra\n";
        let rows = parse_source_table(source).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], row(&["title"]));
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn test_pipeline_extract_transform_load() {
        let source = "Day,Date,HRV,Wake Time\nMon,Apr 21,72,6:48\nBREAK,Apr 22,,\n";
        let storage = MockStorage::with_file("in.csv", source);
        let pipeline = ConversionPipeline::new(&storage, MockConfig);

        let rows = pipeline.extract().unwrap();
        let result = pipeline.transform(rows).unwrap();
        assert_eq!(result.output_rows.len(), 1);

        let path = pipeline.load(result).unwrap();
        assert_eq!(path, "out.csv");

        let written = String::from_utf8(storage.get_file("out.csv").unwrap()).unwrap();
        assert!(written.starts_with("user_id,date,data\r\n"));
        assert!(written.contains("2025-04-21"));
        assert!(written.contains(r#"""wakingTime"":""06:48"""#));
    }

    #[test]
    fn test_pipeline_extract_missing_file() {
        let storage = MockStorage::default();
        let pipeline = ConversionPipeline::new(&storage, MockConfig);

        assert!(matches!(pipeline.extract(), Err(EtlError::IoError(_))));
    }
}
