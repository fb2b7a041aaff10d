//! The value-type catalog.
//!
//! Every value that crosses the control-register bank has one of a closed set
//! of encodings. Each encoding fixes a bit width, a numeric domain in native
//! units, a signedness, and an I/O direction. Metadata lives in a static
//! table indexed by the enum discriminant, so lookups are total and free.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// A serialized register encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "voltage_output_05v_s8")]
    VoltageOutput05vS8,
    #[serde(rename = "voltage_output_05v_s16")]
    VoltageOutput05vS16,
    #[serde(rename = "voltage_output_05v_u7")]
    VoltageOutput05vU7,
    #[serde(rename = "voltage_output_05v_u15")]
    VoltageOutput05vU15,
    #[serde(rename = "voltage_input_20v_s8")]
    VoltageInput20vS8,
    #[serde(rename = "voltage_input_20v_s16")]
    VoltageInput20vS16,
    #[serde(rename = "voltage_input_20v_u7")]
    VoltageInput20vU7,
    #[serde(rename = "voltage_input_20v_u15")]
    VoltageInput20vU15,
    #[serde(rename = "voltage_input_25v_s8")]
    VoltageInput25vS8,
    #[serde(rename = "voltage_input_25v_s16")]
    VoltageInput25vS16,
    #[serde(rename = "voltage_input_25v_u7")]
    VoltageInput25vU7,
    #[serde(rename = "voltage_input_25v_u15")]
    VoltageInput25vU15,
    #[serde(rename = "pulse_duration_ns_u8")]
    PulseDurationNsU8,
    #[serde(rename = "pulse_duration_ns_u16")]
    PulseDurationNsU16,
    #[serde(rename = "pulse_duration_ns_u32")]
    PulseDurationNsU32,
    #[serde(rename = "pulse_duration_us_u8")]
    PulseDurationUsU8,
    #[serde(rename = "pulse_duration_us_u16")]
    PulseDurationUsU16,
    #[serde(rename = "pulse_duration_us_u24")]
    PulseDurationUsU24,
    #[serde(rename = "pulse_duration_ms_u8")]
    PulseDurationMsU8,
    #[serde(rename = "pulse_duration_ms_u16")]
    PulseDurationMsU16,
    #[serde(rename = "pulse_duration_s_u8")]
    PulseDurationSU8,
    #[serde(rename = "pulse_duration_s_u16")]
    PulseDurationSU16,
    #[serde(rename = "boolean")]
    Boolean,
}

/// Native unit of a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mV")]
    Millivolts,
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "s")]
    Seconds,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Millivolts => "mV",
            Unit::Nanoseconds => "ns",
            Unit::Microseconds => "us",
            Unit::Milliseconds => "ms",
            Unit::Seconds => "s",
        }
    }

    /// The time unit, if this is one.
    pub fn time_unit(self) -> Option<TimeUnit> {
        match self {
            Unit::Millivolts => None,
            Unit::Nanoseconds => Some(TimeUnit::Ns),
            Unit::Microseconds => Some(TimeUnit::Us),
            Unit::Milliseconds => Some(TimeUnit::Ms),
            Unit::Seconds => Some(TimeUnit::S),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Time units accepted by the duration converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [TimeUnit::Ns, TimeUnit::Us, TimeUnit::Ms, TimeUnit::S];

    /// Nanoseconds in one unit.
    pub fn nanos_per_unit(self) -> u64 {
        match self {
            TimeUnit::Ns => 1,
            TimeUnit::Us => 1_000,
            TimeUnit::Ms => 1_000_000,
            TimeUnit::S => 1_000_000_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            TimeUnit::Ns => Unit::Nanoseconds,
            TimeUnit::Us => Unit::Microseconds,
            TimeUnit::Ms => Unit::Milliseconds,
            TimeUnit::S => Unit::Seconds,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ns" => Ok(TimeUnit::Ns),
            "us" | "µs" => Ok(TimeUnit::Us),
            "ms" => Ok(TimeUnit::Ms),
            "s" => Ok(TimeUnit::S),
            _ => Err(ConversionError::UnknownUnit {
                name: s.to_string(),
            }),
        }
    }
}

/// Signal direction relative to the target system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sampled by an ADC.
    Input,
    /// Driven by a DAC.
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// Full-scale voltage ranges. Each is a distinct scale constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageRange {
    /// ±5 V DAC output.
    Output5V,
    /// ±20 V ADC input.
    Input20V,
    /// ±25 V ADC input.
    Input25V,
}

impl VoltageRange {
    pub const fn full_scale_mv(self) -> i64 {
        match self {
            VoltageRange::Output5V => 5_000,
            VoltageRange::Input20V => 20_000,
            VoltageRange::Input25V => 25_000,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            VoltageRange::Output5V => Direction::Output,
            VoltageRange::Input20V | VoltageRange::Input25V => Direction::Input,
        }
    }
}

/// An engineering-unit value: millivolts, a duration count, or a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
        }
    }
}

/// Coarse grouping used by the clustering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    VoltageOutput,
    VoltageInput,
    Duration,
    Boolean,
}

/// Immutable metadata for one [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub value_type: ValueType,
    pub name: &'static str,
    pub bit_width: u32,
    /// Inclusive domain in native units. `None` for boolean.
    pub domain: Option<(i64, i64)>,
    pub unit: Option<Unit>,
    pub direction: Option<Direction>,
    pub signedness: Option<Signedness>,
    pub default_value: Value,
    pub description: &'static str,
}

const fn voltage(
    value_type: ValueType,
    name: &'static str,
    range: VoltageRange,
    signed: bool,
    bit_width: u32,
    description: &'static str,
) -> TypeInfo {
    let fs = range.full_scale_mv();
    TypeInfo {
        value_type,
        name,
        bit_width,
        domain: Some(if signed { (-fs, fs) } else { (0, fs) }),
        unit: Some(Unit::Millivolts),
        direction: Some(range.direction()),
        signedness: Some(if signed {
            Signedness::Signed
        } else {
            Signedness::Unsigned
        }),
        default_value: Value::Int(0),
        description,
    }
}

const fn duration(
    value_type: ValueType,
    name: &'static str,
    unit: Unit,
    bit_width: u32,
    description: &'static str,
) -> TypeInfo {
    TypeInfo {
        value_type,
        name,
        bit_width,
        domain: Some((0, (1i64 << bit_width) - 1)),
        unit: Some(unit),
        direction: None,
        signedness: Some(Signedness::Unsigned),
        default_value: Value::Int(0),
        description,
    }
}

use ValueType as V;
use VoltageRange::{Input20V, Input25V, Output5V};

static CATALOG: [TypeInfo; 23] = [
    voltage(V::VoltageOutput05vS8, "voltage_output_05v_s8", Output5V, true, 8, "8-bit signed, ±5 V DAC output"),
    voltage(V::VoltageOutput05vS16, "voltage_output_05v_s16", Output5V, true, 16, "16-bit signed, ±5 V DAC output"),
    voltage(V::VoltageOutput05vU7, "voltage_output_05v_u7", Output5V, false, 7, "7-bit unsigned, 0 to +5 V DAC output"),
    voltage(V::VoltageOutput05vU15, "voltage_output_05v_u15", Output5V, false, 15, "15-bit unsigned, 0 to +5 V DAC output"),
    voltage(V::VoltageInput20vS8, "voltage_input_20v_s8", Input20V, true, 8, "8-bit signed, ±20 V ADC input"),
    voltage(V::VoltageInput20vS16, "voltage_input_20v_s16", Input20V, true, 16, "16-bit signed, ±20 V ADC input"),
    voltage(V::VoltageInput20vU7, "voltage_input_20v_u7", Input20V, false, 7, "7-bit unsigned, 0 to +20 V ADC input"),
    voltage(V::VoltageInput20vU15, "voltage_input_20v_u15", Input20V, false, 15, "15-bit unsigned, 0 to +20 V ADC input"),
    voltage(V::VoltageInput25vS8, "voltage_input_25v_s8", Input25V, true, 8, "8-bit signed, ±25 V ADC input"),
    voltage(V::VoltageInput25vS16, "voltage_input_25v_s16", Input25V, true, 16, "16-bit signed, ±25 V ADC input"),
    voltage(V::VoltageInput25vU7, "voltage_input_25v_u7", Input25V, false, 7, "7-bit unsigned, 0 to +25 V ADC input"),
    voltage(V::VoltageInput25vU15, "voltage_input_25v_u15", Input25V, false, 15, "15-bit unsigned, 0 to +25 V ADC input"),
    duration(V::PulseDurationNsU8, "pulse_duration_ns_u8", Unit::Nanoseconds, 8, "0-255 ns"),
    duration(V::PulseDurationNsU16, "pulse_duration_ns_u16", Unit::Nanoseconds, 16, "0-65,535 ns"),
    duration(V::PulseDurationNsU32, "pulse_duration_ns_u32", Unit::Nanoseconds, 32, "0-4.29 s in ns"),
    duration(V::PulseDurationUsU8, "pulse_duration_us_u8", Unit::Microseconds, 8, "0-255 us"),
    duration(V::PulseDurationUsU16, "pulse_duration_us_u16", Unit::Microseconds, 16, "0-65,535 us"),
    duration(V::PulseDurationUsU24, "pulse_duration_us_u24", Unit::Microseconds, 24, "0-16.7 s in us"),
    duration(V::PulseDurationMsU8, "pulse_duration_ms_u8", Unit::Milliseconds, 8, "0-255 ms"),
    duration(V::PulseDurationMsU16, "pulse_duration_ms_u16", Unit::Milliseconds, 16, "0-65,535 ms"),
    duration(V::PulseDurationSU8, "pulse_duration_s_u8", Unit::Seconds, 8, "0-255 s"),
    duration(V::PulseDurationSU16, "pulse_duration_s_u16", Unit::Seconds, 16, "0-65,535 s"),
    TypeInfo {
        value_type: V::Boolean,
        name: "boolean",
        bit_width: 1,
        domain: None,
        unit: None,
        direction: None,
        signedness: None,
        default_value: Value::Bool(false),
        description: "1-bit flag",
    },
];

/// Metadata for a value type. Total over the enum.
pub fn lookup(value_type: ValueType) -> &'static TypeInfo {
    &CATALOG[value_type as usize]
}

impl ValueType {
    /// Every catalog member, in declaration order.
    pub const ALL: [ValueType; 23] = [
        V::VoltageOutput05vS8,
        V::VoltageOutput05vS16,
        V::VoltageOutput05vU7,
        V::VoltageOutput05vU15,
        V::VoltageInput20vS8,
        V::VoltageInput20vS16,
        V::VoltageInput20vU7,
        V::VoltageInput20vU15,
        V::VoltageInput25vS8,
        V::VoltageInput25vS16,
        V::VoltageInput25vU7,
        V::VoltageInput25vU15,
        V::PulseDurationNsU8,
        V::PulseDurationNsU16,
        V::PulseDurationNsU32,
        V::PulseDurationUsU8,
        V::PulseDurationUsU16,
        V::PulseDurationUsU24,
        V::PulseDurationMsU8,
        V::PulseDurationMsU16,
        V::PulseDurationSU8,
        V::PulseDurationSU16,
        V::Boolean,
    ];

    pub fn info(self) -> &'static TypeInfo {
        lookup(self)
    }

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        self.info().name
    }

    pub fn bit_width(self) -> u32 {
        self.info().bit_width
    }

    pub fn is_voltage(self) -> bool {
        self.info().unit == Some(Unit::Millivolts)
    }

    pub fn is_duration(self) -> bool {
        self.time_unit().is_some()
    }

    pub fn is_boolean(self) -> bool {
        self == V::Boolean
    }

    pub fn is_signed(self) -> bool {
        self.info().signedness == Some(Signedness::Signed)
    }

    pub fn direction(self) -> Option<Direction> {
        self.info().direction
    }

    pub fn time_unit(self) -> Option<TimeUnit> {
        self.info().unit.and_then(Unit::time_unit)
    }

    pub fn voltage_range(self) -> Option<VoltageRange> {
        match self {
            V::VoltageOutput05vS8 | V::VoltageOutput05vS16 | V::VoltageOutput05vU7 | V::VoltageOutput05vU15 => {
                Some(Output5V)
            }
            V::VoltageInput20vS8 | V::VoltageInput20vS16 | V::VoltageInput20vU7 | V::VoltageInput20vU15 => {
                Some(Input20V)
            }
            V::VoltageInput25vS8 | V::VoltageInput25vS16 | V::VoltageInput25vU7 | V::VoltageInput25vU15 => {
                Some(Input25V)
            }
            _ => None,
        }
    }

    pub fn category(self) -> Category {
        match (self.direction(), self.is_duration()) {
            (Some(Direction::Output), _) => Category::VoltageOutput,
            (Some(Direction::Input), _) => Category::VoltageInput,
            (None, true) => Category::Duration,
            (None, false) => Category::Boolean,
        }
    }

    /// Inclusive range of the raw N-bit pattern, interpreted per signedness.
    pub fn raw_range(self) -> (i64, i64) {
        let width = self.bit_width();
        if self.is_signed() {
            (-(1i64 << (width - 1)), (1i64 << (width - 1)) - 1)
        } else {
            (0, (1i64 << width) - 1)
        }
    }

    /// The duration type for a (unit, width) pair.
    pub fn duration(unit: TimeUnit, width: u32) -> Result<ValueType, ConversionError> {
        ValueType::ALL
            .into_iter()
            .find(|t| t.time_unit() == Some(unit) && t.bit_width() == width)
            .ok_or(ConversionError::UnsupportedWidth { unit, width })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ValueType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| ConversionError::UnknownType {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_discriminant() {
        for (i, t) in ValueType::ALL.iter().enumerate() {
            assert_eq!(*t as usize, i);
            assert_eq!(lookup(*t).value_type, *t);
        }
    }

    #[test]
    fn serde_names_match_identifiers() {
        for t in ValueType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            let back: ValueType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, t);
        }
    }

    #[test]
    fn parse_identifier() {
        assert_eq!(
            "voltage_output_05v_s16".parse::<ValueType>().unwrap(),
            ValueType::VoltageOutput05vS16
        );
        assert_eq!("BOOLEAN".parse::<ValueType>().unwrap(), ValueType::Boolean);
        assert!(matches!(
            "voltage_output_10v_s16".parse::<ValueType>(),
            Err(ConversionError::UnknownType { .. })
        ));
    }

    #[test]
    fn widths_within_register() {
        for t in ValueType::ALL {
            assert!((1..=32).contains(&t.bit_width()), "{t}");
        }
        assert_eq!(ValueType::PulseDurationNsU32.bit_width(), 32);
        assert_eq!(ValueType::VoltageOutput05vU15.bit_width(), 15);
    }

    #[test]
    fn category_counts() {
        let count = |c| ValueType::ALL.iter().filter(|t| t.category() == c).count();
        assert_eq!(count(Category::VoltageOutput), 4);
        assert_eq!(count(Category::VoltageInput), 8);
        assert_eq!(count(Category::Duration), 10);
        assert_eq!(count(Category::Boolean), 1);
    }

    #[test]
    fn voltage_domains() {
        let s16 = ValueType::VoltageInput25vS16;
        assert_eq!(s16.info().domain, Some((-25_000, 25_000)));
        assert_eq!(s16.voltage_range(), Some(VoltageRange::Input25V));
        let u7 = ValueType::VoltageInput20vU7;
        assert_eq!(u7.info().domain, Some((0, 20_000)));
        assert_eq!(u7.direction(), Some(Direction::Input));
        assert_eq!(ValueType::PulseDurationMsU8.voltage_range(), None);
    }

    #[test]
    fn duration_lookup() {
        assert_eq!(
            ValueType::duration(TimeUnit::Us, 24).unwrap(),
            ValueType::PulseDurationUsU24
        );
        assert_eq!(
            ValueType::PulseDurationSU16.info().domain,
            Some((0, 65_535))
        );
        assert!(matches!(
            ValueType::duration(TimeUnit::S, 32),
            Err(ConversionError::UnsupportedWidth { .. })
        ));
    }

    #[test]
    fn boolean_metadata() {
        let info = ValueType::Boolean.info();
        assert_eq!(info.bit_width, 1);
        assert_eq!(info.domain, None);
        assert_eq!(info.default_value, Value::Bool(false));
        assert_eq!(ValueType::Boolean.raw_range(), (0, 1));
    }

    #[test]
    fn raw_ranges() {
        assert_eq!(ValueType::VoltageOutput05vS8.raw_range(), (-128, 127));
        assert_eq!(ValueType::VoltageOutput05vU15.raw_range(), (0, 32_767));
        assert_eq!(ValueType::PulseDurationNsU32.raw_range(), (0, u32::MAX as i64));
    }
}
