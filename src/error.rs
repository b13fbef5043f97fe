use thiserror::Error;

/// Errors raised by the clients core.
///
/// A missing record is not an error: lookups and updates return `None`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The database could not be opened or its schema could not be ensured.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    /// Search field is not on the allow-list.
    #[error("field {0} is not allowed for searching")]
    InvalidField(String),

    /// Create/update payload failed validation. Raised before any I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A read or write against an open database failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("export failed: {message}")]
    Export {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ClientError {
    pub(crate) fn export(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
