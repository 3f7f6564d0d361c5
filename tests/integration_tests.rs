use daylog_etl::core::verify::read_data_table;
use daylog_etl::{
    CanonicalRecord, ConversionPipeline, EtlError, EtlEngine, LocalStorage, TomlConfig,
};
use serde_json::Value;
use tempfile::TempDir;

const USER_ID: &str = "0b3c6a14-8d1e-4ca4-b44f-8b89980bc61b";

const SOURCE: &str = "\
Midnight Log Daily 2025,,,,,,,,,,,,,,,
,,,,,,,,,,,,,,,
Day,Date,HRV,Calories,Deep Work (hrs),Recovery,Sleep Time,Cold Shower,No Dopamine,Sleep (hrs),Wake Time,Weight,Water,Reading,Training,Protein
\"Mon, Apr 21\",Apr 21,72,2100,1.5,8,6:48,1,0,7.5,23:12,150,2.1,,1,
\"Tue, Apr 22\",Apr 22,65,,2,7,0:41 ,,1,6,7:05,151,,1.5,,140
BREAK,Apr 23,,,,,,,,,,,,,,
NIGHTMARE,Apr 24,70,1900,,,,,,,,,,,,
\"Fri, Apr 25\",Apr 25,,,,,,,,,,,,,,
\"Sat, Apr 26\",,,,,,,,,,,,,,,
\"Sun, Apr 27\",Apr 27,68,2000,3,9,23:30,0,0,8,7:30,149,3,1,0,150
,AVG OR SUM,69,2000,2,8,,,,7,,150,2.5,,,
";

fn write_config(dir: &TempDir, year: i32) -> TomlConfig {
    let root = dir.path().to_str().unwrap().replace('\\', "/");
    let content = format!(
        r#"
[pipeline]
name = "integration"
version = "1.0"

[source]
input_path = "{root}/input/log.csv"

[conversion]
user_id = "{USER_ID}"
year = {year}

[load]
output_path = "{root}/output/converted.csv"
"#
    );
    let path = dir.path().join("daylog-etl.toml");
    std::fs::write(&path, content).unwrap();
    TomlConfig::from_file(&path).unwrap()
}

#[test]
fn test_end_to_end_conversion() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("input")).unwrap();
    std::fs::write(temp_dir.path().join("input/log.csv"), SOURCE).unwrap();

    let config = write_config(&temp_dir, 2025);
    let engine = EtlEngine::new(ConversionPipeline::new(storage, config));

    let summary = engine.run().unwrap();
    assert_eq!(summary.converted_rows, 3);
    assert_eq!(summary.skipped.total(), 5);
    assert!(summary.output_path.ends_with("output/converted.csv"));

    let written = std::fs::read(temp_dir.path().join("output/converted.csv")).unwrap();
    assert!(written.starts_with(b"user_id,date,data\r\n"));

    let mut reader = csv::Reader::from_reader(written.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let dates: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
    assert_eq!(dates, vec!["2025-04-21", "2025-04-22", "2025-04-27"]);
    assert!(rows.iter().all(|r| &r[0] == USER_ID));

    // compact JSON: no whitespace after separators
    assert!(rows.iter().all(|r| !r[2].contains(": ") && !r[2].contains(", ")));

    let table = read_data_table(&written).unwrap();
    for row in &table.rows {
        assert!(row.keys().map(String::as_str).eq(CanonicalRecord::FIELD_NAMES));
        assert_eq!(row["weightliftingSessions"], Value::String(String::new()));
    }

    let first = &table.rows[0];
    assert_eq!(first["sleepTime"], "06:48");
    assert_eq!(first["wakingTime"], "23:12");
    assert_eq!(first["coldShower"], true);
    assert_eq!(first["noDopamine"], false);
    assert_eq!(first["readingHours"], "");
    assert_eq!(first["jiuJitsuSessions"], "1");
    assert_eq!(first["proteinIntake"], Value::Null);

    let second = &table.rows[1];
    assert_eq!(second["calories"], Value::Null);
    assert_eq!(second["sleepTime"], "00:41");
    assert_eq!(second["wakingTime"], "07:05");
    assert_eq!(second["coldShower"], Value::Null);
    assert_eq!(second["noDopamine"], true);
    assert_eq!(second["waterIntake"], Value::Null);
    assert_eq!(second["readingHours"], "1.5");
    assert_eq!(second["jiuJitsuSessions"], "");
    assert_eq!(second["proteinIntake"], "140");
}

#[test]
fn test_missing_header_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("input")).unwrap();
    std::fs::write(
        temp_dir.path().join("input/log.csv"),
        "Day,Date,HRV\n\"Mon, Apr 21\",Apr 21,72\n",
    )
    .unwrap();

    let config = write_config(&temp_dir, 2025);
    let engine = EtlEngine::new(ConversionPipeline::new(storage, config));

    let err = engine.run().unwrap_err();
    assert!(matches!(err, EtlError::HeaderNotFound { .. }));
    assert_eq!(err.user_friendly_message(), "Could not find header row");
    assert!(!temp_dir.path().join("output/converted.csv").exists());
}

#[test]
fn test_configured_year_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    std::fs::create_dir_all(temp_dir.path().join("input")).unwrap();
    std::fs::write(temp_dir.path().join("input/log.csv"), SOURCE).unwrap();

    let config = write_config(&temp_dir, 2024);
    let summary = EtlEngine::new(ConversionPipeline::new(storage, config))
        .run()
        .unwrap();
    assert_eq!(summary.converted_rows, 3);

    let written = std::fs::read(temp_dir.path().join("output/converted.csv")).unwrap();
    let text = String::from_utf8(written).unwrap();
    assert!(text.contains("2024-04-21"));
    assert!(!text.contains("2025-04-21"));
}
