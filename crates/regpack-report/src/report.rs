//! Allocation reports.
//!
//! An [`AllocationReport`] is a read-only projection of an [`Allocation`]:
//! placements grouped by register, capacity totals, and the renderings built
//! from them.

use std::collections::BTreeMap;
use std::fmt;

use regpack_alloc::{
    Allocation, Placement, Strategy, FIRST_REGISTER, LAST_REGISTER, REGISTER_BITS, REGISTER_COUNT,
    TOTAL_BITS,
};
use serde::Serialize;

use crate::error::Result;
use crate::format::{bar_chart, bit_slice, round2};
use crate::record::AllocationRecord;

const RULE_WIDTH: usize = 80;
const BAR_WIDTH: usize = 32;

/// Occupancy of one control register.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterUsage {
    pub register: u8,
    pub used_bits: u32,
    pub free_bits: u32,
}

/// Headline numbers for an allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub strategy: Strategy,
    pub bits_used: u32,
    pub bits_available: u32,
    /// Bits used over the whole bank, 0..=100.
    pub efficiency_percent: f64,
    /// Bits used over the registers touched, 0..=100.
    pub packing_efficiency_percent: f64,
    pub registers_used: u32,
    pub registers: Vec<RegisterUsage>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Allocation Summary ({}) ===", self.strategy)?;
        writeln!(
            f,
            "  Bits used:      {}/{} ({:.2}%)",
            self.bits_used, self.bits_available, self.efficiency_percent
        )?;
        writeln!(
            f,
            "  Registers used: {}/{REGISTER_COUNT} ({:.2}% packed)",
            self.registers_used, self.packing_efficiency_percent
        )?;
        for usage in self.registers.iter().filter(|u| u.used_bits > 0) {
            writeln!(f, "  CR{:<2} {} bits free", usage.register, usage.free_bits)?;
        }
        Ok(())
    }
}

/// A report over one allocation.
#[derive(Debug, Clone)]
pub struct AllocationReport<'a> {
    allocation: &'a Allocation,
    registers: BTreeMap<u8, Vec<&'a Placement>>,
}

impl<'a> AllocationReport<'a> {
    pub fn new(allocation: &'a Allocation) -> Self {
        Self {
            allocation,
            registers: allocation.by_register(),
        }
    }

    pub fn allocation(&self) -> &Allocation {
        self.allocation
    }

    /// Placements grouped by register, high bit first.
    pub fn register_map(&self) -> &BTreeMap<u8, Vec<&'a Placement>> {
        &self.registers
    }

    pub fn bits_used(&self) -> u32 {
        self.allocation.bits_used()
    }

    pub fn registers_used(&self) -> u32 {
        self.registers.len() as u32
    }

    /// Fraction of the full 384-bit bank in use.
    pub fn efficiency(&self) -> f64 {
        self.bits_used() as f64 / TOTAL_BITS as f64
    }

    /// Fraction of the touched registers' bits in use. Zero for an empty allocation.
    pub fn packing_efficiency(&self) -> f64 {
        match self.registers_used() {
            0 => 0.0,
            n => self.bits_used() as f64 / (n * REGISTER_BITS) as f64,
        }
    }

    fn used_in(&self, register: u8) -> u32 {
        self.registers
            .get(&register)
            .map(|ps| ps.iter().map(|p| p.width()).sum())
            .unwrap_or(0)
    }

    pub fn summary(&self) -> Summary {
        let registers = (FIRST_REGISTER..=LAST_REGISTER)
            .map(|register| {
                let used_bits = self.used_in(register);
                RegisterUsage {
                    register,
                    used_bits,
                    free_bits: REGISTER_BITS - used_bits,
                }
            })
            .collect();
        Summary {
            strategy: self.allocation.strategy(),
            bits_used: self.bits_used(),
            bits_available: TOTAL_BITS,
            efficiency_percent: round2(self.efficiency() * 100.0),
            packing_efficiency_percent: round2(self.packing_efficiency() * 100.0),
            registers_used: self.registers_used(),
            registers,
        }
    }

    /// Register-by-register layout, including unused registers.
    pub fn table(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!("REGISTER MAP ({})\n", self.allocation.strategy()));
        out.push_str(&format!("{rule}\n"));

        for (register, placements) in &self.registers {
            let mut parts: Vec<String> = placements
                .iter()
                .map(|p| format!("{} {} ({}-bit)", bit_slice(p.msb, p.lsb), p.name, p.width()))
                .collect();
            if let Some(lowest) = placements.last().filter(|p| p.lsb > 0) {
                parts.push(format!("{} UNUSED", bit_slice(lowest.lsb - 1, 0)));
            }
            out.push_str(&format!("CR{register:<2}  {}\n", parts.join(" | ")));
        }
        for register in (FIRST_REGISTER..=LAST_REGISTER).filter(|r| !self.registers.contains_key(r)) {
            out.push_str(&format!("CR{register:<2}  [31:0] UNUSED\n"));
        }

        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!(
            "Efficiency: {}/{TOTAL_BITS} bits ({:.2}%)\n",
            self.bits_used(),
            self.efficiency() * 100.0
        ));
        out.push_str(&format!(
            "Registers used: {}/{REGISTER_COUNT}\n",
            self.registers_used()
        ));
        out.push_str(&format!("{rule}\n"));
        out
    }

    /// Markdown table of placements with a summary list.
    pub fn markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Register Map\n");
        out.push('\n');
        out.push_str("| CR | Bit Slice | Name | Type | Width |\n");
        out.push_str("|----|-----------|------|------|-------|\n");
        for (register, placements) in &self.registers {
            for p in placements {
                out.push_str(&format!(
                    "| {register} | {}:{} | {} | {} | {} |\n",
                    p.msb,
                    p.lsb,
                    p.name,
                    p.value_type,
                    p.width()
                ));
            }
        }
        out.push('\n');
        out.push_str("## Summary\n");
        out.push('\n');
        out.push_str(&format!("- **Strategy**: {}\n", self.allocation.strategy()));
        out.push_str(&format!(
            "- **Total bits used**: {}/{TOTAL_BITS}\n",
            self.bits_used()
        ));
        out.push_str(&format!("- **Efficiency**: {:.2}%\n", self.efficiency() * 100.0));
        out.push_str(&format!(
            "- **Registers used**: {}/{REGISTER_COUNT}\n",
            self.registers_used()
        ));
        out
    }

    /// One utilization bar per register in use.
    pub fn utilization_bars(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Register Utilization ===\n");
        for register in self.registers.keys() {
            let used = self.used_in(*register);
            out.push_str(&format!(
                "  CR{register:<2} {} {used:>2}/{REGISTER_BITS}\n",
                bar_chart(used as u64, REGISTER_BITS as u64, BAR_WIDTH)
            ));
        }
        out.push_str(&format!(
            "  Bank {} {}/{TOTAL_BITS}\n",
            bar_chart(self.bits_used() as u64, TOTAL_BITS as u64, BAR_WIDTH),
            self.bits_used()
        ));
        out
    }

    pub fn to_record(&self) -> AllocationRecord {
        AllocationRecord::from_allocation(self.allocation)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }
}

impl fmt::Display for AllocationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table())
    }
}
