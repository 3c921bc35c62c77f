//! Image validation

use anyhow::Result;
use spriteforge_gen::validate::validate_image;
use std::path::Path;

pub fn run(path: &str, size: Option<u32>) -> Result<()> {
    let report = validate_image(Path::new(path), size)?;
    report.print_summary();

    if !report.passed {
        anyhow::bail!("validation failed for {}", path);
    }
    Ok(())
}
