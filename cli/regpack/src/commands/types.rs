//! `regpack types`: list the value-type catalog.

use anyhow::{bail, Result};
use regpack_core::{TypeInfo, ValueType};

pub fn run(format: Option<&str>) -> Result<()> {
    let infos: Vec<&TypeInfo> = ValueType::ALL.iter().map(|t| t.info()).collect();
    match format {
        None | Some("table") => print!("{}", render_table(&infos)),
        Some("json") => println!("{}", serde_json::to_string_pretty(&infos)?),
        Some(other) => bail!("unknown format '{other}' (expected table or json)"),
    }
    Ok(())
}

fn render_table(infos: &[&TypeInfo]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:>5}  {:<20} {:<4} {:<9}\n",
        "type", "bits", "domain", "unit", "direction"
    ));
    for info in infos {
        let domain = info
            .domain
            .map(|(lo, hi)| format!("{lo}..={hi}"))
            .unwrap_or_else(|| "false/true".to_string());
        let unit = info.unit.map(|u| u.symbol()).unwrap_or("-");
        let direction = match info.direction {
            Some(d) => format!("{d:?}").to_lowercase(),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<24} {:>5}  {:<20} {:<4} {:<9}\n",
            info.name, info.bit_width, domain, unit, direction
        ));
    }
    out
}
