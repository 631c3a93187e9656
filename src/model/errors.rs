//! # Model Errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Engine failed to compile model for {entity}: {reason}")]
    Compile { entity: String, reason: String },

    #[error("Unknown virtual {entity}.{name}")]
    UnknownVirtual { entity: String, name: String },

    #[error("Virtual {entity}.{name} has no getter")]
    VirtualNotReadable { entity: String, name: String },

    #[error("Virtual {entity}.{name} has no setter")]
    VirtualNotWritable { entity: String, name: String },

    #[error("Unknown method {entity}.{name}")]
    UnknownMethod { entity: String, name: String },

    #[error("Unknown static {entity}.{name}")]
    UnknownStatic { entity: String, name: String },
}

impl ModelError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Schema(inner) => inner.code(),
            ModelError::Compile { .. } => "MODEL_COMPILE_FAILED",
            ModelError::UnknownVirtual { .. } => "MODEL_UNKNOWN_VIRTUAL",
            ModelError::VirtualNotReadable { .. } => "MODEL_VIRTUAL_NOT_READABLE",
            ModelError::VirtualNotWritable { .. } => "MODEL_VIRTUAL_NOT_WRITABLE",
            ModelError::UnknownMethod { .. } => "MODEL_UNKNOWN_METHOD",
            ModelError::UnknownStatic { .. } => "MODEL_UNKNOWN_STATIC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_keep_their_code() {
        let err: ModelError = SchemaError::UnknownEntity("Ghost".into()).into();
        assert_eq!(err.code(), "SCHEMA_UNKNOWN_ENTITY");
        assert_eq!(err.to_string(), "Entity not declared: Ghost");
    }

    #[test]
    fn test_model_codes() {
        let err = ModelError::UnknownStatic {
            entity: "Book".into(),
            name: "findAll".into(),
        };
        assert_eq!(err.code(), "MODEL_UNKNOWN_STATIC");
        assert!(err.to_string().contains("Book.findAll"));
    }
}
