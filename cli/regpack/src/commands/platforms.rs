//! `regpack platforms`: list clock presets.

use anyhow::Result;
use regpack_core::Platform;

pub fn run() -> Result<()> {
    println!("{:<12} {:<12} {:>9} {:>8} {:>6}", "id", "name", "clock", "period", "slots");
    for p in Platform::builtin() {
        println!(
            "{:<12} {:<12} {:>5} MHz {:>8} {:>6}",
            p.id,
            p.display_name,
            p.clock_mhz,
            p.clock_period()?.to_string(),
            p.slots
        );
    }
    Ok(())
}
