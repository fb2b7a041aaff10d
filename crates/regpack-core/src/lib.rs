//! Value types and unit conversion for control-register serialization.
//!
//! Values reach the target through a bank of 32-bit control registers. This
//! crate defines the closed catalog of register encodings and converts
//! between engineering units and their raw bit patterns:
//! - **Voltages:** millivolts ↔ signed/unsigned N-bit codes per range
//! - **Durations:** time units ↔ clock cycles under a rounding policy
//! - **Booleans:** 1-bit flags

pub mod convert;
pub mod duration;
pub mod error;
pub mod platform;
pub mod types;

pub use convert::{decode, encode, Rounding};
pub use duration::Duration;
pub use error::{ConversionError, Result};
pub use platform::{ClockPeriod, Platform};
pub use types::{lookup, Category, Direction, Signedness, TimeUnit, TypeInfo, Unit, Value, ValueType, VoltageRange};
