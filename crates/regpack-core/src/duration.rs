//! Validated duration values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::{self, Rounding};
use crate::error::{ConversionError, Result};
use crate::platform::ClockPeriod;
use crate::types::{TimeUnit, ValueType};

/// A duration that is known to fit its register encoding.
///
/// Deserialization goes through [`Duration::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DurationRepr")]
pub struct Duration {
    value: u64,
    unit: TimeUnit,
    value_type: ValueType,
}

impl Duration {
    /// Validate `value` against the `(unit, width)` encoding.
    pub fn new(value: u64, unit: TimeUnit, width: u32) -> Result<Self> {
        let value_type = ValueType::duration(unit, width)?;
        let max = (1u64 << width) - 1;
        if value > max {
            return Err(ConversionError::OutOfRange {
                value_type,
                value: i64::try_from(value).unwrap_or(i64::MAX),
                min: 0,
                max: max as i64,
            });
        }
        Ok(Self {
            value,
            unit,
            value_type,
        })
    }

    /// Recover a duration from a cycle count, truncating to whole units.
    pub fn from_cycles(cycles: u64, unit: TimeUnit, width: u32, clock: ClockPeriod) -> Result<Self> {
        Self::new(convert::cycles_to_time(cycles, unit, clock)?, unit, width)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn as_nanos(&self) -> u128 {
        self.value as u128 * self.unit.nanos_per_unit() as u128
    }

    pub fn to_cycles(&self, clock: ClockPeriod, rounding: Rounding) -> Result<u64> {
        convert::time_to_cycles(self.value, self.unit, clock, rounding)
    }
}

#[derive(Deserialize)]
struct DurationRepr {
    value: u64,
    unit: TimeUnit,
    value_type: ValueType,
}

impl TryFrom<DurationRepr> for Duration {
    type Error = ConversionError;

    fn try_from(repr: DurationRepr) -> Result<Self> {
        let duration = Self::new(repr.value, repr.unit, repr.value_type.bit_width())?;
        if duration.value_type != repr.value_type {
            return Err(ConversionError::KindMismatch {
                value_type: repr.value_type,
                expected: repr.value_type.time_unit().map_or("duration", TimeUnit::as_str),
            });
        }
        Ok(duration)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
