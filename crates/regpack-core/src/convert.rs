//! Engineering-unit ↔ raw conversion.
//!
//! Voltages scale linearly onto the signed or unsigned N-bit range of their
//! type. Durations become clock-cycle counts under an explicit rounding
//! policy. Booleans map to 1/0. `encode`/`decode` dispatch over any
//! [`ValueType`] and produce the width-masked bit pattern stored in a
//! register.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, Result};
use crate::platform::ClockPeriod;
use crate::types::{TimeUnit, Value, ValueType};

const PICOS_PER_NANO: u128 = 1_000;

/// How a duration that is not a whole number of cycles is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Fail unless the duration divides the clock period.
    #[default]
    Exact,
    RoundUp,
    RoundDown,
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rounding::Exact => "exact",
            Rounding::RoundUp => "round_up",
            Rounding::RoundDown => "round_down",
        })
    }
}

impl FromStr for Rounding {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(Rounding::Exact),
            "round_up" | "up" | "ceil" => Ok(Rounding::RoundUp),
            "round_down" | "down" | "floor" => Ok(Rounding::RoundDown),
            _ => Err(ConversionError::UnknownRounding {
                name: s.to_string(),
            }),
        }
    }
}

/// Bit mask covering the low `width` bits.
pub fn width_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

fn scale(value_type: ValueType) -> f64 {
    let width = value_type.bit_width();
    if value_type.is_signed() {
        ((1i64 << (width - 1)) - 1) as f64
    } else {
        ((1i64 << width) - 1) as f64
    }
}

fn full_scale(value_type: ValueType) -> Result<f64> {
    value_type
        .voltage_range()
        .map(|r| r.full_scale_mv() as f64)
        .ok_or(ConversionError::NotAVoltage { value_type })
}

fn check_domain(value_type: ValueType, value: i64) -> Result<()> {
    if let Some((min, max)) = value_type.info().domain {
        if value < min || value > max {
            return Err(ConversionError::OutOfRange {
                value_type,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

fn check_raw(value_type: ValueType, raw: i64) -> Result<()> {
    let (min, max) = value_type.raw_range();
    if raw < min || raw > max {
        return Err(ConversionError::RawOutOfRange {
            value_type,
            raw,
            min,
            max,
        });
    }
    Ok(())
}

/// Convert millivolts to the raw signed/unsigned code of a voltage type.
pub fn voltage_to_raw(value_type: ValueType, millivolts: i64) -> Result<i64> {
    let range = full_scale(value_type)?;
    check_domain(value_type, millivolts)?;
    let (min, max) = value_type.raw_range();
    let raw = (millivolts as f64 / range * scale(value_type)).round() as i64;
    Ok(raw.clamp(min, max))
}

/// Convert a raw code back to millivolts.
pub fn raw_to_millivolts(value_type: ValueType, raw: i64) -> Result<f64> {
    let range = full_scale(value_type)?;
    check_raw(value_type, raw)?;
    Ok(raw as f64 * range / scale(value_type))
}

/// Millivolts represented by one raw step.
pub fn quantization_step_mv(value_type: ValueType) -> Result<f64> {
    Ok(full_scale(value_type)? / scale(value_type))
}

/// Convert a duration to clock cycles.
pub fn time_to_cycles(value: u64, unit: TimeUnit, clock: ClockPeriod, rounding: Rounding) -> Result<u64> {
    let picos = value as u128 * unit.nanos_per_unit() as u128 * PICOS_PER_NANO;
    let period = clock.picos() as u128;
    let (quotient, remainder) = (picos / period, picos % period);
    let cycles = match rounding {
        Rounding::Exact if remainder != 0 => {
            return Err(ConversionError::InexactDuration {
                value,
                unit,
                period: clock,
            })
        }
        Rounding::RoundUp if remainder != 0 => quotient + 1,
        _ => quotient,
    };
    u64::try_from(cycles).map_err(|_| ConversionError::CycleOverflow {
        detail: format!("{value}{unit} at {clock} is {cycles} cycles"),
    })
}

/// Convert clock cycles back to a duration in `unit`, truncating.
pub fn cycles_to_time(cycles: u64, unit: TimeUnit, clock: ClockPeriod) -> Result<u64> {
    let picos = cycles as u128 * clock.picos() as u128;
    let value = picos / (unit.nanos_per_unit() as u128 * PICOS_PER_NANO);
    u64::try_from(value).map_err(|_| ConversionError::CycleOverflow {
        detail: format!("{cycles} cycles at {clock} exceed 64 bits of {unit}"),
    })
}

pub fn bool_to_raw(flag: bool) -> u32 {
    u32::from(flag)
}

pub fn raw_to_bool(raw: u32) -> Result<bool> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ConversionError::RawOutOfRange {
            value_type: ValueType::Boolean,
            raw: raw as i64,
            min: 0,
            max: 1,
        }),
    }
}

/// Check that `value` has the right kind and lies in the type's domain.
pub fn validate_value(value_type: ValueType, value: &Value) -> Result<()> {
    match (value_type.is_boolean(), value) {
        (true, Value::Bool(_)) => Ok(()),
        (true, Value::Int(_)) => Err(ConversionError::KindMismatch {
            value_type,
            expected: "boolean",
        }),
        (false, Value::Bool(_)) => Err(ConversionError::KindMismatch {
            value_type,
            expected: "integer",
        }),
        (false, Value::Int(v)) => check_domain(value_type, *v),
    }
}

/// Encode a value to its width-masked register bits.
pub fn encode(value_type: ValueType, value: &Value) -> Result<u32> {
    validate_value(value_type, value)?;
    let mask = width_mask(value_type.bit_width());
    let raw = match *value {
        Value::Bool(flag) => bool_to_raw(flag) as i64,
        Value::Int(mv) if value_type.is_voltage() => voltage_to_raw(value_type, mv)?,
        Value::Int(count) => count,
    };
    // Two's complement truncated to the field width.
    Ok((raw as u32) & mask)
}

/// Decode width-masked register bits to an engineering-unit value.
pub fn decode(value_type: ValueType, bits: u32) -> Result<Value> {
    let width = value_type.bit_width();
    let mask = width_mask(width);
    if bits & !mask != 0 {
        return Err(ConversionError::RawOutOfRange {
            value_type,
            raw: bits as i64,
            min: 0,
            max: mask as i64,
        });
    }
    if value_type.is_boolean() {
        return raw_to_bool(bits).map(Value::Bool);
    }
    if !value_type.is_voltage() {
        return Ok(Value::Int(bits as i64));
    }
    let raw = if value_type.is_signed() {
        let shift = 32 - width;
        (((bits << shift) as i32) >> shift) as i64
    } else {
        bits as i64
    };
    Ok(Value::Int(raw_to_millivolts(value_type, raw)?.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn voltage_types() -> impl Iterator<Item = ValueType> {
        ValueType::ALL.into_iter().filter(|t| t.is_voltage())
    }

    #[test]
    fn signed_full_scale() {
        let t = ValueType::VoltageOutput05vS16;
        assert_eq!(voltage_to_raw(t, 5000).unwrap(), 32_767);
        assert_eq!(voltage_to_raw(t, -5000).unwrap(), -32_767);
        assert_eq!(voltage_to_raw(t, 0).unwrap(), 0);
        assert_eq!(voltage_to_raw(t, 2400).unwrap(), 15_728);
    }

    #[test]
    fn unsigned_full_scale() {
        let t = ValueType::VoltageOutput05vU7;
        assert_eq!(voltage_to_raw(t, 5000).unwrap(), 127);
        assert_eq!(voltage_to_raw(t, 2500).unwrap(), 64);
        assert!(matches!(
            voltage_to_raw(t, -1),
            Err(ConversionError::OutOfRange { min: 0, max: 5000, .. })
        ));
    }

    #[test]
    fn ranges_are_not_cross_applied() {
        // The same raw code means different voltages per range.
        let out = raw_to_millivolts(ValueType::VoltageOutput05vS8, 127).unwrap();
        let in20 = raw_to_millivolts(ValueType::VoltageInput20vS8, 127).unwrap();
        let in25 = raw_to_millivolts(ValueType::VoltageInput25vS8, 127).unwrap();
        assert_eq!((out, in20, in25), (5000.0, 20_000.0, 25_000.0));
        assert_eq!(ValueType::VoltageInput20vS8.direction(), Some(Direction::Input));
    }

    #[test]
    fn out_of_domain_reports_bounds() {
        let err = voltage_to_raw(ValueType::VoltageInput20vS16, 20_001).unwrap_err();
        assert_eq!(
            err,
            ConversionError::OutOfRange {
                value_type: ValueType::VoltageInput20vS16,
                value: 20_001,
                min: -20_000,
                max: 20_000,
            }
        );
    }

    #[test]
    fn non_voltage_rejected() {
        assert!(matches!(
            voltage_to_raw(ValueType::PulseDurationNsU8, 10),
            Err(ConversionError::NotAVoltage { .. })
        ));
        assert!(matches!(
            quantization_step_mv(ValueType::Boolean),
            Err(ConversionError::NotAVoltage { .. })
        ));
    }

    #[test]
    fn raw_outside_width_rejected() {
        assert!(matches!(
            raw_to_millivolts(ValueType::VoltageOutput05vS8, 128),
            Err(ConversionError::RawOutOfRange { min: -128, max: 127, .. })
        ));
        assert!(raw_to_millivolts(ValueType::VoltageOutput05vU15, -1).is_err());
    }

    #[test]
    fn voltage_round_trip_within_one_step() {
        for t in voltage_types() {
            let (min, max) = t.info().domain.unwrap();
            let step = quantization_step_mv(t).unwrap();
            for mv in min..=max {
                let raw = voltage_to_raw(t, mv).unwrap();
                let back = raw_to_millivolts(t, raw).unwrap();
                assert!(
                    (back - mv as f64).abs() <= step,
                    "{t}: {mv} mV -> {raw} -> {back} mV (step {step})"
                );
            }
        }
    }

    #[test]
    fn exact_time_round_trip() {
        let clocks = [
            ClockPeriod::from_nanos(8).unwrap(),
            ClockPeriod::from_nanos(2).unwrap(),
            ClockPeriod::from_picos(800).unwrap(),
            ClockPeriod::from_picos(200).unwrap(),
        ];
        for clock in clocks {
            for unit in TimeUnit::ALL {
                for value in [0u64, 1, 2, 5, 8, 40, 100, 255, 1000, 65_535] {
                    let Ok(cycles) = time_to_cycles(value, unit, clock, Rounding::Exact) else {
                        continue;
                    };
                    assert_eq!(cycles_to_time(cycles, unit, clock).unwrap(), value);
                }
            }
        }
    }

    #[test]
    fn rounding_policies() {
        let clock = ClockPeriod::from_nanos(8).unwrap();
        assert_eq!(time_to_cycles(100, TimeUnit::Ns, clock, Rounding::RoundUp).unwrap(), 13);
        assert_eq!(time_to_cycles(100, TimeUnit::Ns, clock, Rounding::RoundDown).unwrap(), 12);
        assert_eq!(time_to_cycles(96, TimeUnit::Ns, clock, Rounding::Exact).unwrap(), 12);
        let err = time_to_cycles(100, TimeUnit::Ns, clock, Rounding::Exact).unwrap_err();
        assert!(matches!(err, ConversionError::InexactDuration { value: 100, .. }));
        assert!(err.to_string().contains("8 ns"));
    }

    #[test]
    fn fractional_period() {
        let clock = ClockPeriod::from_mhz(1250).unwrap();
        assert_eq!(time_to_cycles(4, TimeUnit::Ns, clock, Rounding::Exact).unwrap(), 5);
        assert_eq!(time_to_cycles(1, TimeUnit::Us, clock, Rounding::Exact).unwrap(), 1250);
        assert!(time_to_cycles(1, TimeUnit::Ns, clock, Rounding::Exact).is_err());
        assert_eq!(time_to_cycles(1, TimeUnit::Ns, clock, Rounding::RoundUp).unwrap(), 2);
    }

    #[test]
    fn cycle_overflow() {
        let clock = ClockPeriod::from_picos(1).unwrap();
        let err = time_to_cycles(u64::MAX, TimeUnit::S, clock, Rounding::Exact).unwrap_err();
        assert!(matches!(err, ConversionError::CycleOverflow { .. }));
    }

    #[test]
    fn cycles_truncate() {
        let clock = ClockPeriod::from_nanos(8).unwrap();
        assert_eq!(cycles_to_time(13, TimeUnit::Ns, clock).unwrap(), 104);
        assert_eq!(cycles_to_time(124_999, TimeUnit::Ms, clock).unwrap(), 0);
        assert_eq!(cycles_to_time(125_000, TimeUnit::Ms, clock).unwrap(), 1);
    }

    #[test]
    fn rounding_parse() {
        assert_eq!("exact".parse::<Rounding>().unwrap(), Rounding::Exact);
        assert_eq!("up".parse::<Rounding>().unwrap(), Rounding::RoundUp);
        assert_eq!("round-down".parse::<Rounding>().unwrap(), Rounding::RoundDown);
        assert!("nearest".parse::<Rounding>().is_err());
    }

    #[test]
    fn booleans() {
        assert_eq!(bool_to_raw(true), 1);
        assert!(!raw_to_bool(0).unwrap());
        assert!(raw_to_bool(2).is_err());
    }

    #[test]
    fn encode_masks_negative_voltages() {
        let t = ValueType::VoltageOutput05vS8;
        assert_eq!(encode(t, &Value::Int(-5000)).unwrap(), 0x81);
        assert_eq!(decode(t, 0x81).unwrap(), Value::Int(-5000));
        assert_eq!(decode(t, 0x80).unwrap(), Value::Int(-5039));
    }

    #[test]
    fn encode_decode_all_kinds() {
        assert_eq!(encode(ValueType::Boolean, &Value::Bool(true)).unwrap(), 1);
        assert_eq!(decode(ValueType::Boolean, 1).unwrap(), Value::Bool(true));
        assert_eq!(
            encode(ValueType::PulseDurationNsU32, &Value::Int(u32::MAX as i64)).unwrap(),
            u32::MAX
        );
        assert_eq!(
            decode(ValueType::PulseDurationUsU24, 0xFF_FFFF).unwrap(),
            Value::Int(16_777_215)
        );
        let t = ValueType::VoltageInput25vS16;
        let bits = encode(t, &Value::Int(-12_500)).unwrap();
        assert_eq!(bits & !0xFFFF, 0);
        assert_eq!(decode(t, bits).unwrap(), Value::Int(-12_500));
    }

    #[test]
    fn kind_mismatch() {
        assert!(matches!(
            encode(ValueType::Boolean, &Value::Int(1)),
            Err(ConversionError::KindMismatch { expected: "boolean", .. })
        ));
        assert!(matches!(
            validate_value(ValueType::PulseDurationMsU8, &Value::Bool(true)),
            Err(ConversionError::KindMismatch { expected: "integer", .. })
        ));
    }

    #[test]
    fn duration_domain_checked() {
        assert!(matches!(
            encode(ValueType::PulseDurationNsU8, &Value::Int(256)),
            Err(ConversionError::OutOfRange { max: 255, .. })
        ));
        assert!(encode(ValueType::PulseDurationNsU8, &Value::Int(-1)).is_err());
    }

    #[test]
    fn decode_rejects_stray_bits() {
        assert!(matches!(
            decode(ValueType::PulseDurationNsU8, 0x100),
            Err(ConversionError::RawOutOfRange { max: 255, .. })
        ));
    }
}
