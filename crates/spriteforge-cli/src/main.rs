//! SpriteForge CLI - generate game sprites with PixelLab and wire them into
//! an asset catalog

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{character, generate, guide, integrate, job, tools, validate};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "spriteforge")]
#[command(about = "Pixel-art sprite generation and asset catalog integration", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools the generation service exposes
    Tools {
        /// Also write the raw tool list to this JSON file
        #[arg(long)]
        save: Option<String>,
    },

    /// Generate every asset in a roster
    Generate {
        /// Roster name or path to a .roster.toml file
        #[arg(default_value = "desert_survivors")]
        roster: String,

        /// Comma-separated sections to generate (characters, enemies,
        /// animations, tilesets, map_objects, ui_elements)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Output directory (defaults to config paths.output_dir)
        #[arg(long)]
        output: Option<String>,

        /// Decode and check each written image
        #[arg(long)]
        validate: bool,
    },

    /// Long-running character jobs
    #[command(subcommand)]
    Character(character::CharacterCommands),

    /// Locally tracked jobs
    #[command(subcommand)]
    Job(job::JobCommands),

    /// Copy manifest assets into the asset catalog
    Integrate {
        /// Manifest path (defaults to <output_dir>/asset_manifest.json)
        #[arg(long)]
        manifest: Option<String>,

        /// Project root that manifest paths are relative to
        #[arg(long)]
        project_root: Option<String>,

        /// Catalog directory relative to the project root
        #[arg(long)]
        catalog: Option<String>,

        /// Also write the asset reference guide
        #[arg(long)]
        guide: bool,
    },

    /// Write the Markdown asset reference guide
    Guide {
        /// Manifest path (defaults to <output_dir>/asset_manifest.json)
        #[arg(long)]
        manifest: Option<String>,

        /// Output path (defaults to ASSET_REFERENCE.md beside the manifest)
        #[arg(short, long)]
        output: Option<String>,

        /// Project title for the heading
        #[arg(long)]
        title: Option<String>,
    },

    /// Check a generated image file
    Validate {
        /// Path to the image
        path: String,

        /// Expected sprite edge in pixels
        #[arg(long)]
        size: Option<u32>,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Tools { save } => tools::run(save.as_deref()),
        Commands::Generate {
            roster,
            only,
            output,
            validate,
        } => generate::run(generate::GenerateArgs {
            roster,
            only,
            output,
            validate,
        }),
        Commands::Character(cmd) => character::run(cmd),
        Commands::Job(cmd) => job::run(cmd),
        Commands::Integrate {
            manifest,
            project_root,
            catalog,
            guide,
        } => integrate::run(integrate::IntegrateArgs {
            manifest,
            project_root,
            catalog,
            guide,
        }),
        Commands::Guide {
            manifest,
            output,
            title,
        } => guide::run(manifest.as_deref(), output.as_deref(), title.as_deref()),
        Commands::Validate { path, size } => validate::run(&path, size),
    }
}
