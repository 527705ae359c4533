use thiserror::Error;

/// Main error type for datalode operations
#[derive(Error, Debug)]
pub enum DatalodeError {
    #[error("Invalid range expression for field '{field}': {expr}")]
    InvalidRange { field: String, expr: String },

    #[error("Invalid integer list for field '{field}': {value}")]
    InvalidIntegerList { field: String, value: String },

    #[error("Invalid sort expression: {0}")]
    InvalidSort(String),

    #[error("Unknown zip code: {0}")]
    UnknownZip(String),

    #[error("Field type lookup failed for '{field}': {message}")]
    FieldLookup { field: String, message: String },

    #[error("No index configured for api endpoint '{0}'")]
    UnknownApi(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for datalode operations
pub type Result<T> = std::result::Result<T, DatalodeError>;

impl DatalodeError {
    /// Check if this error came from compiling a query rather than from I/O
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            DatalodeError::InvalidRange { .. }
                | DatalodeError::InvalidIntegerList { .. }
                | DatalodeError::InvalidSort(_)
                | DatalodeError::UnknownZip(_)
                | DatalodeError::FieldLookup { .. }
        )
    }
}
