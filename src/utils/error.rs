use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Header row not found: no row contains both {}", required.join(" and "))]
    HeaderNotFound { required: Vec<String> },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::CsvError(_) | EtlError::HeaderNotFound { .. } => ErrorCategory::Input,
            EtlError::IoError(_) => ErrorCategory::Output,
            EtlError::SerializationError(_) | EtlError::ValidationError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ValidationError { .. } => ErrorSeverity::Medium,
            EtlError::HeaderNotFound { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::HeaderNotFound { required } => format!(
                "Make sure the source export still contains a header row with the columns {}",
                required.join(", ")
            ),
            EtlError::CsvError(_) => {
                "Check that the input file is a valid UTF-8 CSV export".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable"
                    .to_string()
            }
            EtlError::SerializationError(_) => {
                "Inspect the offending row; the data column must hold a JSON object".to_string()
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or the TOML configuration file".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Check that both tables were produced by the conversion".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::HeaderNotFound { .. } => "Could not find header row".to_string(),
            EtlError::IoError(e) => format!("File access failed: {}", e),
            EtlError::CsvError(e) => format!("Could not read CSV data: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
