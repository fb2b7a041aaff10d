//! Side-by-side strategy comparison.


use log::debug;
use regpack_alloc::{allocate, Field, Strategy, REGISTER_COUNT};
use serde::Serialize;

use crate::error::Result;
use crate::report::{AllocationReport, Summary};

/// The outcome of one strategy over a field set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyComparison {
    pub summary: Summary,
    /// Layout fingerprint; equal fingerprints mean identical placements.
    pub fingerprint: String,
}

/// Run every strategy over `fields`.
///
/// Validation is strategy-independent, so either all strategies succeed or
/// the first failure is returned.
pub fn compare_strategies(fields: &[Field]) -> Result<Vec<StrategyComparison>> {
    Strategy::ALL
        .into_iter()
        .map(|strategy| -> Result<StrategyComparison> {
            let allocation = allocate(fields, strategy)?;
            let summary = AllocationReport::new(&allocation).summary();
            debug!(
                "{strategy}: {} registers, {:.2}% packed",
                summary.registers_used, summary.packing_efficiency_percent
            );
            Ok(StrategyComparison {
                summary,
                fingerprint: allocation.fingerprint()?,
            })
        })
        .collect()
}

/// The comparison using the fewest registers. Ties keep the earlier strategy.
pub fn best(comparisons: &[StrategyComparison]) -> Option<&StrategyComparison> {
    comparisons
        .iter()
        .reduce(|best, c| {
            if c.summary.registers_used < best.summary.registers_used {
                c
            } else {
                best
            }
        })
}

/// Render comparisons as an aligned text table.
pub fn render_comparison(comparisons: &[StrategyComparison]) -> String {
    let mut out = String::new();
    out.push_str("=== Strategy Comparison ===\n");
    out.push_str(&format!(
        "  {:<16} {:>9} {:>10} {:>8}  {}\n",
        "strategy", "registers", "efficiency", "packed", "layout"
    ));
    for c in comparisons {
        let s = &c.summary;
        out.push_str(&format!(
            "  {:<16} {:>6}/{REGISTER_COUNT} {:>9.2}% {:>7.2}%  {}\n",
            s.strategy.as_str(),
            s.registers_used,
            s.efficiency_percent,
            s.packing_efficiency_percent,
            &c.fingerprint[..12.min(c.fingerprint.len())]
        ));
    }
    if let Some(b) = best(comparisons) {
        out.push_str(&format!("  Best: {}\n", b.summary.strategy));
    }
    out
}
