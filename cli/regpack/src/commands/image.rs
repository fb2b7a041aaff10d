//! `regpack image`: register words built from field defaults.

use anyhow::Result;
use regpack_alloc::{allocate, RegisterImage};

use crate::commands::map::resolve_strategy;
use crate::manifest::RegpackManifest;

pub fn run(manifest: &RegpackManifest, strategy: Option<&str>) -> Result<()> {
    print!("{}", build(manifest, strategy)?);
    Ok(())
}

pub(crate) fn build(manifest: &RegpackManifest, strategy: Option<&str>) -> Result<RegisterImage> {
    let strategy = resolve_strategy(manifest, strategy)?;
    let fields = manifest.fields()?;
    let allocation = allocate(&fields, strategy)?;
    Ok(RegisterImage::build(&allocation, &fields)?)
}
