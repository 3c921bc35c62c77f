//! Local job records

use anyhow::Result;
use clap::Subcommand;
use spriteforge_gen::{JobStore, SpriteConfig};

#[derive(Subcommand)]
pub enum JobCommands {
    /// Show a tracked job
    Status {
        /// Local job ID, remote ID, or asset name
        id: String,
    },

    /// List all tracked jobs
    List,
}

pub fn run(cmd: JobCommands) -> Result<()> {
    let config = SpriteConfig::load()?;
    let store = JobStore::new(config.jobs_dir());

    match cmd {
        JobCommands::Status { id } => {
            let job = store.find(&id)?;

            println!("Job: {}", job.id);
            println!("  Remote ID: {}", job.remote_id);
            println!("  Asset: {}", job.asset_name);
            println!("  Status: {}", job.status);
            println!("  Progress: {}%", job.progress);
            println!("  Submitted: {}", job.submitted_at);
            if let Some(ref err) = job.error {
                println!("  Error: {}", err);
            }
            if let Some(ref path) = job.output_path {
                println!("  Output: {}", path);
            }
            Ok(())
        }
        JobCommands::List => {
            let jobs = store.list()?;

            if jobs.is_empty() {
                println!("No jobs found.");
                return Ok(());
            }

            println!("{} job(s):\n", jobs.len());
            for job in &jobs {
                println!(
                    "  {} {} {} {}%",
                    job.id, job.asset_name, job.status, job.progress
                );
            }
            Ok(())
        }
    }
}
