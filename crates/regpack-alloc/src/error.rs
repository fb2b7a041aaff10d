//! Allocation errors.

use regpack_core::ConversionError;
use thiserror::Error;

/// Errors that can occur while validating fields or allocating registers.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("duplicate field names: {}", names.join(", "))]
    DuplicateNames { names: Vec<String> },

    #[error("invalid field name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error(
        "fields require {requested} bits but only {available} are available ({deficit} bits over)"
    )]
    Overflow {
        requested: u32,
        available: u32,
        deficit: u32,
    },

    #[error("field '{name}' is {width} bits wide; values cannot span registers (max 32)")]
    FieldTooWide { name: String, width: u32 },

    #[error("ran out of registers while placing '{name}'")]
    RegistersExhausted { name: String },

    #[error("unknown strategy '{name}' (expected first_fit, best_fit or type_clustering)")]
    UnknownStrategy { name: String },

    #[error("no field named '{name}' in allocation")]
    UnknownField { name: String },

    #[error("invalid allocation record: {reason}")]
    InvalidRecord { reason: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, AllocationError>;
