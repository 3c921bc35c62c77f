//! Asset catalog integration

use anyhow::Result;
use spriteforge_catalog::{guide_path_for, write_reference_guide, AssetManifest, CatalogIntegrator};
use spriteforge_gen::SpriteConfig;
use std::path::PathBuf;

pub struct IntegrateArgs {
    pub manifest: Option<String>,
    pub project_root: Option<String>,
    pub catalog: Option<String>,
    pub guide: bool,
}

pub fn run(args: IntegrateArgs) -> Result<()> {
    let config = SpriteConfig::load()?;
    let manifest_path = args
        .manifest
        .map(PathBuf::from)
        .unwrap_or_else(|| config.manifest_path());
    let project_root = args
        .project_root
        .map(PathBuf::from)
        .unwrap_or_else(|| config.project_root());
    let catalog_dir = args
        .catalog
        .map(PathBuf::from)
        .unwrap_or_else(|| config.catalog_dir());

    println!("{}", "=".repeat(60));
    println!("ASSET CATALOG INTEGRATION");
    println!("{}", "=".repeat(60));

    let manifest = AssetManifest::load(&manifest_path)?;
    println!("Manifest: {} ({} assets)", manifest_path.display(), manifest.len());

    let integrator = CatalogIntegrator::new(&project_root, &catalog_dir);
    let report = integrator.integrate(&manifest)?;

    println!("\nIntegrated: {}/{}", report.integrated.len(), report.total);
    if !report.missing.is_empty() {
        println!("Missing: {}", report.missing.len());
        for missing in &report.missing {
            println!("  {} ({})", missing.name, missing.path.display());
        }
    }
    if !report.failed.is_empty() {
        println!("Failed: {}", report.failed.len());
        for (name, err) in &report.failed {
            println!("  {}: {}", name, err);
        }
    }

    if args.guide {
        let guide_path = guide_path_for(&manifest_path);
        write_reference_guide(&manifest, config.project_title(), &guide_path)?;
        println!("\nAsset reference written to: {}", guide_path.display());
    }

    Ok(())
}
