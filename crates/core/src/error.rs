use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Uploaded bytes could not be read as the declared format.
    #[error("Invalid {kind} format: {message}")]
    InvalidFormat { kind: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid_format(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            kind,
            message: message.into(),
        }
    }
}
