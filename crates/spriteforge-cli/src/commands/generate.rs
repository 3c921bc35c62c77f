//! Roster batch generation

use anyhow::Result;
use spriteforge_gen::validate::validate_image;
use spriteforge_gen::{
    AssetWriter, BatchGenerator, JobStore, PixelLabClient, Roster, Section, SpriteConfig,
};
use std::path::PathBuf;

pub struct GenerateArgs {
    pub roster: String,
    pub only: Vec<String>,
    pub output: Option<String>,
    pub validate: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = SpriteConfig::load()?;
    let roster = Roster::find(&args.roster)?;
    let client = PixelLabClient::from_config(&config)?;

    let output_dir = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output_dir());
    let manifest_path = output_dir.join(spriteforge_catalog::MANIFEST_FILE);
    let writer = AssetWriter::new(client.transport(), &output_dir);
    let store = JobStore::new(config.jobs_dir());

    let sections = args
        .only
        .iter()
        .map(|s| s.trim().parse::<Section>())
        .collect::<Result<Vec<_>, _>>()?;

    let title = roster
        .title()
        .unwrap_or(roster.roster.name.as_str())
        .to_uppercase();
    println!("{}", "=".repeat(60));
    println!("{} ASSET GENERATION", title);
    println!("{}", "=".repeat(60));
    println!("Roster: {} ({} assets)", roster.roster.name, roster.total());
    println!("Output: {}\n", output_dir.display());

    let mut generator = BatchGenerator::new(&client, &writer).with_job_store(&store);
    if !sections.is_empty() {
        generator = generator.with_sections(&sections);
    }
    let report = generator.run(&roster, &manifest_path)?;

    println!("\n{}", "=".repeat(60));
    println!("Generated: {}", report.generated());
    if !report.failures.is_empty() {
        println!("Failed: {}", report.failures.len());
        for (name, err) in &report.failures {
            println!("  {}: {}", name, err);
        }
    }
    if !report.queued.is_empty() {
        println!("Queued: {}", report.queued.len());
        for job in &report.queued {
            println!(
                "  {}: job {} (spriteforge character wait {})",
                job.asset_name, job.id, job.asset_name
            );
        }
    }
    println!("Manifest: {}", report.manifest_path.display());

    if args.validate {
        println!();
        let mut failing = 0;
        for entry in report.manifest.entries() {
            match validate_image(&PathBuf::from(&entry.path), None) {
                Ok(validation) => {
                    if !validation.passed {
                        failing += 1;
                        validation.print_summary();
                    }
                }
                Err(e) => {
                    failing += 1;
                    println!("Validation: {}\n  {}", entry.path, e);
                }
            }
        }
        println!(
            "Validated {} file(s), {} with problems",
            report.manifest.len(),
            failing
        );
    }

    Ok(())
}
