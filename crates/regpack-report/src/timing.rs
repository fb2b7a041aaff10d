//! Duration fields expressed in clock cycles for a target clock.


use regpack_alloc::Field;
use regpack_core::convert::{time_to_cycles, Rounding};
use regpack_core::{ClockPeriod, Value};
use serde::Serialize;

use crate::format::format_time_ns;

/// One duration field at a given clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingRow {
    pub name: String,
    pub default: u64,
    pub default_ns: u128,
    /// Cycles for the default, rounded up.
    pub default_cycles: u64,
    /// Cycles for the largest encodable value, rounded up.
    pub max_cycles: u64,
    /// Whether the default is a whole number of cycles.
    pub exact: bool,
}

/// Rows for every duration field. Non-duration fields are skipped.
pub fn timing_rows(fields: &[Field], clock: ClockPeriod) -> Vec<TimingRow> {
    fields
        .iter()
        .filter_map(|f| {
            let unit = f.value_type.time_unit()?;
            let default = match f.default_value() {
                Value::Int(v) => u64::try_from(v).ok()?,
                Value::Bool(_) => return None,
            };
            let (_, max) = f.value_type.info().domain?;
            let max_cycles = time_to_cycles(max as u64, unit, clock, Rounding::RoundUp).ok()?;
            Some(TimingRow {
                name: f.name.clone(),
                default,
                default_ns: default as u128 * unit.nanos_per_unit() as u128,
                default_cycles: time_to_cycles(default, unit, clock, Rounding::RoundUp).ok()?,
                max_cycles,
                exact: time_to_cycles(default, unit, clock, Rounding::Exact).is_ok(),
            })
        })
        .collect()
}

/// Render the rows as text.
pub fn timing_table(fields: &[Field], clock: ClockPeriod) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Durations @ {clock} ===\n"));
    let rows = timing_rows(fields, clock);
    if rows.is_empty() {
        out.push_str("  (no duration fields)\n");
    }
    for row in rows {
        let marker = if row.exact { "" } else { " (rounded up)" };
        out.push_str(&format!(
            "  {:<24} {:>10} = {:>10} cycles{marker}  (max {} cycles)\n",
            row.name,
            format_time_ns(row.default_ns),
            row.default_cycles,
            row.max_cycles
        ));
    }
    out
}
