//! `regpack convert`: one-off unit conversions.

use anyhow::{bail, Context, Result};
use regpack_core::convert::{self, Rounding};
use regpack_core::{ClockPeriod, Platform, TimeUnit, Value, ValueType};

pub fn voltage(value_type: &str, millivolts: i64) -> Result<()> {
    println!("{}", voltage_line(value_type, millivolts)?);
    Ok(())
}

pub fn raw(value_type: &str, raw: i64) -> Result<()> {
    println!("{}", raw_line(value_type, raw)?);
    Ok(())
}

pub fn time(
    value: u64,
    unit: &str,
    platform: Option<&str>,
    period_ps: Option<u64>,
    rounding: Option<&str>,
) -> Result<()> {
    println!("{}", time_line(value, unit, platform, period_ps, rounding)?);
    Ok(())
}

fn voltage_type(name: &str) -> Result<ValueType> {
    let value_type: ValueType = name.parse()?;
    if !value_type.is_voltage() {
        bail!("{value_type} is not a voltage type");
    }
    Ok(value_type)
}

fn hex(value_type: ValueType, bits: u32) -> String {
    let digits = value_type.bit_width().div_ceil(4) as usize;
    format!("0x{bits:0digits$X}")
}

pub(crate) fn voltage_line(value_type: &str, millivolts: i64) -> Result<String> {
    let value_type = voltage_type(value_type)?;
    let raw = convert::voltage_to_raw(value_type, millivolts)?;
    let bits = convert::encode(value_type, &Value::Int(millivolts))?;
    let step = convert::quantization_step_mv(value_type)?;
    Ok(format!(
        "{millivolts} mV -> raw {raw} ({}) [{value_type}, {step:.4} mV/step]",
        hex(value_type, bits)
    ))
}

pub(crate) fn raw_line(value_type: &str, raw: i64) -> Result<String> {
    let value_type = voltage_type(value_type)?;
    let millivolts = convert::raw_to_millivolts(value_type, raw)?;
    Ok(format!("raw {raw} -> {millivolts:.3} mV [{value_type}]"))
}

pub(crate) fn time_line(
    value: u64,
    unit: &str,
    platform: Option<&str>,
    period_ps: Option<u64>,
    rounding: Option<&str>,
) -> Result<String> {
    let unit: TimeUnit = unit.parse()?;
    let rounding: Rounding = rounding.map(str::parse::<Rounding>).transpose()?.unwrap_or_default();
    let clock = match (platform, period_ps) {
        (Some(_), Some(_)) => bail!("specify either --platform or --period-ps, not both"),
        (Some(id), None) => Platform::resolve(id)
            .with_context(|| format!("unknown platform '{id}'"))?
            .clock_period()?,
        (None, Some(ps)) => ClockPeriod::from_picos(ps)?,
        (None, None) => bail!("specify --platform or --period-ps"),
    };
    let cycles = convert::time_to_cycles(value, unit, clock, rounding)?;
    let back = convert::cycles_to_time(cycles, unit, clock)?;
    Ok(format!(
        "{value}{unit} @ {clock} -> {cycles} cycles ({rounding}; {cycles} cycles = {back}{unit})"
    ))
}
