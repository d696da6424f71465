use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Malformed input in table '{table}': {detail}")]
    MalformedInput { table: String, detail: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    pub fn malformed(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedInput { table: table.into(), detail: detail.into() }
    }
}

pub type DashResult<T> = Result<T, DashError>;
