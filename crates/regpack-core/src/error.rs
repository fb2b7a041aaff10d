//! Conversion errors.

use crate::platform::ClockPeriod;
use crate::types::{TimeUnit, ValueType};

/// Errors raised while converting between engineering units and raw bits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Engineering-unit value outside the type's numeric domain.
    #[error("{value} is outside the domain of {value_type}: valid range is [{min}, {max}]")]
    OutOfRange {
        value_type: ValueType,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Raw register value outside the N-bit domain of the type.
    #[error("raw value {raw} is outside the {value_type} raw domain [{min}, {max}]")]
    RawOutOfRange {
        value_type: ValueType,
        raw: i64,
        min: i64,
        max: i64,
    },

    /// A voltage conversion was requested for a non-voltage type.
    #[error("{value_type} is not a voltage type")]
    NotAVoltage { value_type: ValueType },

    /// A boolean was supplied for a numeric type, or vice versa.
    #[error("{value_type} expects a {expected} value")]
    KindMismatch {
        value_type: ValueType,
        expected: &'static str,
    },

    /// `Rounding::Exact` was requested but the duration does not divide the clock period.
    #[error("{value}{unit} is not evenly divisible by clock period {period}; use round_up or round_down")]
    InexactDuration {
        value: u64,
        unit: TimeUnit,
        period: ClockPeriod,
    },

    /// No duration type exists for the requested unit and width.
    #[error("no {unit} duration type is {width} bits wide")]
    UnsupportedWidth { unit: TimeUnit, width: u32 },

    /// Clock period that cannot be represented exactly in picoseconds.
    #[error("invalid clock: {reason}")]
    InvalidClock { reason: String },

    /// Cycle or duration arithmetic exceeded 64 bits.
    #[error("cycle count overflow: {detail}")]
    CycleOverflow { detail: String },

    /// Identifier that names no catalog type.
    #[error("unknown value type '{name}'")]
    UnknownType { name: String },

    /// Identifier that names no time unit.
    #[error("unknown time unit '{name}' (expected ns, us, ms, or s)")]
    UnknownUnit { name: String },

    /// Identifier that names no rounding policy.
    #[error("unknown rounding policy '{name}' (expected exact, round_up, or round_down)")]
    UnknownRounding { name: String },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;
