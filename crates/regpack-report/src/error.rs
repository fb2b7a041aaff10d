//! Errors from the reporting layer.

use regpack_alloc::AllocationError;
use thiserror::Error;

/// Convenience alias for results within the report crate.
pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown report format: '{name}'. Available formats: table, markdown, json, bars")]
    UnknownFormat { name: String },

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
