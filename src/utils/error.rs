use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Extraction failed: {message}")]
    ExtractionError { message: String },

    #[error("Storage operation failed: {message}")]
    StorageError { message: String },

    #[error("Transform failed: {message}")]
    TransformError { message: String },

    #[error("Warehouse load failed: {message}")]
    LoadError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤所屬的管線階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Extraction,
    Storage,
    Transform,
    Load,
    System,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ExtractionError { .. } => ErrorCategory::Extraction,
            EtlError::StorageError { .. } => ErrorCategory::Storage,
            EtlError::TransformError { .. } => ErrorCategory::Transform,
            EtlError::LoadError { .. } => ErrorCategory::Load,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the config file or environment variables (API_URL, S3_*, BUCKET_NAME, DB_CONNECTION_STRING)"
            }
            ErrorCategory::Extraction => {
                "Check network access to the weather API; behind an intercepting proxy consider allow_insecure_transport"
            }
            ErrorCategory::Storage => "Check that the object storage endpoint is reachable and the credentials are valid",
            ErrorCategory::Transform => "The API response shape changed; inspect the archived raw object",
            ErrorCategory::Load => "Check the warehouse connection string and that fact_weather is writable",
            ErrorCategory::System => "Re-run the job; if the problem persists inspect the logs",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ExtractionError { message } => format!("無法取得天氣資料: {}", message),
            EtlError::StorageError { message } => format!("無法寫入 Data Lake: {}", message),
            EtlError::TransformError { message } => format!("資料轉換失敗: {}", message),
            EtlError::LoadError { message } => format!("無法寫入 Data Warehouse: {}", message),
            EtlError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定 {} 無效: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
