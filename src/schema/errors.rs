//! Schema compilation errors
//!
//! All of these surface when an entity is declared or assembled. They are
//! developer-input errors: none is retried or recovered internally.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Couldn't read type information for \"{entity}.{field}\".")]
    UnknownType { entity: String, field: String },

    #[error("Unsupported type \"{type_name}\" in \"{entity}.{field}\".")]
    UnsupportedType {
        entity: String,
        field: String,
        type_name: String,
    },

    #[error("{entity}.{field} is declared as an array, but it's missing type information. Set it as an option: type = String.")]
    ArrayMissingType { entity: String, field: String },

    #[error("{entity}.{field} should be of type String to support string validators.")]
    StringValidators { entity: String, field: String },

    #[error("{entity}.{field} should be of type Number or Date to support number or date validators.")]
    NumberValidators { entity: String, field: String },

    #[error("Entity not declared: {0}")]
    UnknownEntity(String),

    #[error("Inheritance cycle through entity: {0}")]
    InheritanceCycle(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchemaError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownType { .. } => "SCHEMA_UNKNOWN_TYPE",
            SchemaError::UnsupportedType { .. } => "SCHEMA_UNSUPPORTED_TYPE",
            SchemaError::ArrayMissingType { .. } => "SCHEMA_ARRAY_MISSING_TYPE",
            SchemaError::StringValidators { .. } => "SCHEMA_STRING_VALIDATORS",
            SchemaError::NumberValidators { .. } => "SCHEMA_NUMBER_VALIDATORS",
            SchemaError::UnknownEntity(_) => "SCHEMA_UNKNOWN_ENTITY",
            SchemaError::InheritanceCycle(_) => "SCHEMA_INHERITANCE_CYCLE",
            SchemaError::InvalidConfig(_) => "SCHEMA_INVALID_CONFIG",
            SchemaError::Internal(_) => "SCHEMA_INTERNAL",
        }
    }

    /// Field the error was raised for, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::UnknownType { field, .. }
            | SchemaError::UnsupportedType { field, .. }
            | SchemaError::ArrayMissingType { field, .. }
            | SchemaError::StringValidators { field, .. }
            | SchemaError::NumberValidators { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn lock_poisoned() -> Self {
        SchemaError::Internal("Lock poisoned".into())
    }
}
