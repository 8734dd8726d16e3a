use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid source response: {message}")]
    InvalidResponse { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl EtlError {
    /// 是否屬於使用者可修正的輸入/設定錯誤
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EtlError::ConfigValidationError { .. }
                | EtlError::InvalidConfigValueError { .. }
                | EtlError::MissingConfigError { .. }
        )
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("Could not read or write a file: {}", e),
            EtlError::SerializationError(e) => format!("Could not encode or decode JSON: {}", e),
            EtlError::CsvError(e) => format!("Could not write CSV output: {}", e),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
            EtlError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            EtlError::InvalidResponse { message } => {
                format!("The meal service response could not be understood: {}", message)
            }
            EtlError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable",
            EtlError::SerializationError(_) | EtlError::InvalidResponse { .. } => {
                "Make sure the input is a saved mealServiceDietInfo JSON response"
            }
            EtlError::CsvError(_) => "Check the output directory and try the json format only",
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => "Fix the configuration value and run again",
            EtlError::ProcessingError { .. } => "Run with --verbose to see which stage failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
