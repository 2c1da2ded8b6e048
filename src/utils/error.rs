use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("{entity} does not exist: {id}")]
    NotFound { entity: String, id: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lookup,
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RosterError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        RosterError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RosterError::NotFound { .. } => ErrorCategory::Lookup,
            RosterError::ConfigValidationError { .. }
            | RosterError::InvalidConfigValueError { .. }
            | RosterError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RosterError::ApiError(_) => ErrorCategory::Network,
            RosterError::CsvError(_)
            | RosterError::SerializationError(_)
            | RosterError::ProcessingError { .. } => ErrorCategory::Data,
            RosterError::ZipError(_) | RosterError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Lookup | ErrorCategory::Configuration | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RosterError::NotFound { entity, .. } => {
                format!(
                    "Check that the {} id is spelled correctly and exists in the source",
                    entity.to_lowercase()
                )
            }
            RosterError::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            RosterError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            RosterError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            RosterError::ApiError(_) => {
                "Check the API endpoint and network connectivity, then retry".to_string()
            }
            RosterError::CsvError(_) | RosterError::SerializationError(_) => {
                "Check that the roster source contains well-formed student records".to_string()
            }
            RosterError::ProcessingError { .. } => {
                "Inspect the roster data for unexpected values".to_string()
            }
            RosterError::ZipError(_) | RosterError::IoError(_) => {
                "Check file permissions and free disk space for the output path".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RosterError::NotFound { entity, id } => format!("{} '{}' was not found", entity, id),
            RosterError::ApiError(_) => "Could not reach the enrollment API".to_string(),
            RosterError::IoError(e) => format!("File operation failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
