pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_range, validate_uuid,
};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_PATH: &str = "csv/Midnight Log Daily 2025 (2).csv";
pub const DEFAULT_OUTPUT_PATH: &str = "csv/Midnight_Log_Converted_to_Noctisium_Format.csv";
pub const DEFAULT_USER_ID: &str = "0b3c6a14-8d1e-4ca4-b44f-8b89980bc61b";
/// 來源日期沒有年份，由此補上
pub const DEFAULT_YEAR: i32 = 2025;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "daylog-etl")]
#[command(about = "Convert a daily tracking log CSV into the metrics import format")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input_path: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_USER_ID)]
    pub user_id: String,

    #[arg(long, default_value_t = DEFAULT_YEAR)]
    pub year: i32,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn year(&self) -> i32 {
        self.year
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_conversion_settings(self)
    }
}

/// 兩種設定來源共用的檢查
pub fn validate_conversion_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_path("input_path", config.input_path())?;
    validate_file_extension("input_path", config.input_path(), &["csv"])?;
    validate_path("output_path", config.output_path())?;
    validate_file_extension("output_path", config.output_path(), &["csv"])?;
    validate_uuid("user_id", config.user_id())?;
    validate_range("year", config.year(), MIN_YEAR, MAX_YEAR)?;
    Ok(())
}
