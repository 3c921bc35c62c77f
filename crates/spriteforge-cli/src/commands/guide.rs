//! Reference guide generation

use anyhow::Result;
use spriteforge_catalog::{guide_path_for, write_reference_guide, AssetManifest};
use spriteforge_gen::SpriteConfig;
use std::path::PathBuf;

pub fn run(manifest: Option<&str>, output: Option<&str>, title: Option<&str>) -> Result<()> {
    let config = SpriteConfig::load()?;
    let manifest_path = manifest
        .map(PathBuf::from)
        .unwrap_or_else(|| config.manifest_path());
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| guide_path_for(&manifest_path));
    let title = title.unwrap_or(config.project_title());

    let manifest = AssetManifest::load(&manifest_path)?;
    write_reference_guide(&manifest, title, &output_path)?;

    println!("Asset reference written to: {}", output_path.display());
    Ok(())
}
