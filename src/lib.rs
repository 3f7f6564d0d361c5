pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use crate::core::{etl::EtlEngine, pipeline::ConversionPipeline};
pub use domain::model::{CanonicalRecord, FieldValue, OutputRow, RunSummary};
pub use utils::error::{EtlError, Result};
