//! `regpack compare`: run every strategy over the manifest's fields.

use anyhow::Result;
use regpack_report::{compare_strategies, render_comparison};

use crate::manifest::RegpackManifest;

pub fn run(manifest: &RegpackManifest) -> Result<()> {
    let fields = manifest.fields()?;
    let comparisons = compare_strategies(&fields)?;
    print!("{}", render_comparison(&comparisons));
    Ok(())
}
