//! `regpack map`: allocate the manifest's fields and print a report.

use anyhow::{Context, Result};
use regpack_alloc::{allocate, Strategy};
use regpack_report::{render, timing_table, AllocationReport, ReportFormat};

use crate::manifest::RegpackManifest;

pub fn run(manifest: &RegpackManifest, strategy: Option<&str>, format: Option<&str>) -> Result<()> {
    print!("{}", render_map(manifest, strategy, format)?);
    Ok(())
}

/// A `--strategy` override, or the manifest's strategy.
pub(crate) fn resolve_strategy(manifest: &RegpackManifest, strategy: Option<&str>) -> Result<Strategy> {
    match strategy {
        Some(s) => Ok(s.parse::<Strategy>()?),
        None => Ok(manifest.strategy()),
    }
}

pub(crate) fn render_map(
    manifest: &RegpackManifest,
    strategy: Option<&str>,
    format: Option<&str>,
) -> Result<String> {
    let strategy = resolve_strategy(manifest, strategy)?;
    let format = format
        .map(ReportFormat::parse)
        .transpose()?
        .unwrap_or_default();

    let fields = manifest.fields()?;
    let allocation = allocate(&fields, strategy)
        .with_context(|| format!("allocating '{}'", manifest.package.name))?;
    let report = AllocationReport::new(&allocation);
    let mut out = render(&report, format)?;
    if format == ReportFormat::Json {
        out.push('\n');
    }

    if format == ReportFormat::Table {
        out.push_str(&format!("Fingerprint: {}\n", allocation.fingerprint()?));
        if let Some(platform) = manifest.platform()? {
            out.push('\n');
            out.push_str(&timing_table(&fields, platform.clock_period()?));
        }
    }
    Ok(out)
}
