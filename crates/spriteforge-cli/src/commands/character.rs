//! Long-running character jobs: create, check, wait and download

use anyhow::Result;
use clap::Subcommand;
use spriteforge_catalog::{AssetType, MANIFEST_FILE};
use spriteforge_core::SpriteError;
use spriteforge_gen::rpc;
use spriteforge_gen::status::{classify_response, extract_job_id};
use spriteforge_gen::tools::CharacterRequest;
use spriteforge_gen::{
    check_asset_name, download_when_ready, AssetWriter, HttpTransport, JobStatus, JobStore,
    PixelLabClient, RemoteJob, SavedDownload, SpriteConfig,
};
use std::path::PathBuf;
use std::time::Duration;

const CHARACTER_DIR: &str = "characters";

#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Submit a multi-direction character job
    Create {
        /// Character name
        name: String,

        /// Character description
        #[arg(long, short)]
        description: String,

        /// Canvas size in pixels
        #[arg(long, default_value = "64")]
        size: u32,

        /// Number of directional views
        #[arg(long, default_value = "8")]
        directions: u8,

        /// Body proportion preset
        #[arg(long, default_value = "heroic")]
        proportions: String,

        #[arg(long, default_value = "single color black outline")]
        outline: String,

        #[arg(long, default_value = "medium shading")]
        shading: String,

        #[arg(long, default_value = "high detail")]
        detail: String,

        /// Comma-separated hex colors
        #[arg(long, value_delimiter = ',')]
        palette: Vec<String>,

        /// Record the result as an enemy rather than a character
        #[arg(long)]
        enemy: bool,

        /// Wait for the job and download the result
        #[arg(long)]
        wait: bool,
    },

    /// Check a character job once
    Status {
        /// Local job ID, remote character ID, or character name
        id: String,
    },

    /// Poll a character job until it finishes, then download it
    Wait {
        /// Local job ID, remote character ID, or character name
        id: String,

        /// Seconds between status checks
        #[arg(long)]
        interval: Option<u64>,

        /// Maximum number of status checks
        #[arg(long)]
        attempts: Option<u32>,

        /// Output directory (defaults to config paths.output_dir)
        #[arg(long)]
        output: Option<String>,
    },
}

struct Context {
    config: SpriteConfig,
    client: PixelLabClient<HttpTransport>,
    store: JobStore,
}

impl Context {
    fn load() -> Result<Self> {
        let config = SpriteConfig::load()?;
        let client = PixelLabClient::from_config(&config)?;
        let store = JobStore::new(config.jobs_dir());
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// A tracked job, or an untracked one for a bare remote ID
    fn job_for(&self, id: &str) -> Result<RemoteJob> {
        match self.store.find(id) {
            Ok(job) => Ok(job),
            Err(SpriteError::JobNotFound(_)) => Ok(RemoteJob::new(id, id)),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn run(cmd: CharacterCommands) -> Result<()> {
    let ctx = Context::load()?;

    match cmd {
        CharacterCommands::Create {
            name,
            description,
            size,
            directions,
            proportions,
            outline,
            shading,
            detail,
            palette,
            enemy,
            wait,
        } => {
            let request = CharacterRequest {
                name,
                description,
                size,
                color_palette: palette,
                n_directions: Some(directions),
                proportions: Some(CharacterRequest::preset_proportions(&proportions)),
                outline: Some(outline),
                shading: Some(shading),
                detail: Some(detail),
                ..Default::default()
            };
            let asset_type = if enemy {
                AssetType::Enemy
            } else {
                AssetType::Character
            };
            let job = run_create(&ctx, &request, asset_type)?;
            if let Some(job) = job.filter(|_| wait) {
                run_wait(&ctx, job, None, None, None)?;
            }
            Ok(())
        }
        CharacterCommands::Status { id } => run_status(&ctx, &id),
        CharacterCommands::Wait {
            id,
            interval,
            attempts,
            output,
        } => {
            let job = ctx.job_for(&id)?;
            run_wait(&ctx, job, interval, attempts, output)
        }
    }
}

/// Submit the job. Returns the tracked job, or `None` when the service
/// answered with the image directly.
fn run_create(
    ctx: &Context,
    request: &CharacterRequest,
    asset_type: AssetType,
) -> Result<Option<RemoteJob>> {
    check_asset_name(&request.name)?;
    println!("Creating character {}...", request.name);
    println!("  Size: {}px", request.size);
    if let Some(n) = request.n_directions {
        println!("  Directions: {}", n);
    }

    let response = ctx.client.create_character(request)?;
    let writer = AssetWriter::new(ctx.client.transport(), ctx.config.output_dir());
    let saved = writer.save_raw_response(
        &response,
        &format!("{}/{}_creation_response.json", CHARACTER_DIR, request.name),
    )?;
    println!("  Response saved to: {}", saved.display());

    if rpc::image_source(&response).is_some() {
        let written =
            writer.save_response(&response, &format!("{}/{}.png", CHARACTER_DIR, request.name))?;
        println!("  Saved to: {}", written.path.display());
        return Ok(None);
    }

    let Some(remote_id) = extract_job_id(&response) else {
        anyhow::bail!(
            "no character or job id in response: {}",
            rpc::text_content(&response)
        );
    };

    let job = RemoteJob::new(&remote_id, &request.name).with_asset_type(asset_type);
    ctx.store.save(&job)?;

    println!("\nJob queued.");
    println!("  Job ID: {}", job.id);
    println!("  Remote ID: {}", job.remote_id);
    println!("  Check with: spriteforge character wait {}", request.name);
    Ok(Some(job))
}

fn run_status(ctx: &Context, id: &str) -> Result<()> {
    let mut job = ctx.job_for(id)?;
    let response = ctx.client.get_character(&job.remote_id)?;
    let state = classify_response(&response, &ctx.config.poll_config().markers);

    println!("Character: {} ({})", job.asset_name, job.remote_id);
    println!("  State: {:?}", state);
    let text = rpc::text_content(&response);
    if !text.is_empty() {
        println!("\n{}", text);
    }

    if ctx.store.load(&job.id).is_ok() {
        job.apply_state(&state);
        ctx.store.save(&job)?;
    }
    Ok(())
}

fn run_wait(
    ctx: &Context,
    mut job: RemoteJob,
    interval: Option<u64>,
    attempts: Option<u32>,
    output: Option<String>,
) -> Result<()> {
    let mut poll = ctx.config.poll_config();
    if let Some(secs) = interval {
        poll.interval = Duration::from_secs(secs);
    }
    if let Some(n) = attempts {
        poll.max_attempts = n;
    }
    let output_dir = output
        .map(PathBuf::from)
        .unwrap_or_else(|| ctx.config.output_dir());
    let tracked = ctx.store.load(&job.id).is_ok();

    println!("{}", "=".repeat(60));
    println!("WAITING FOR {}", job.asset_name.to_uppercase());
    println!("{}", "=".repeat(60));

    let writer = AssetWriter::new(ctx.client.transport(), &output_dir);
    let result = download_when_ready(
        &ctx.client,
        &job.remote_id,
        &poll,
        &writer,
        &job.asset_name,
        CHARACTER_DIR,
    );

    match result {
        Ok(saved) => {
            match &saved {
                SavedDownload::Image(asset) => {
                    println!("\nSaved to: {}", asset.path.display());
                }
                SavedDownload::Bundle {
                    archive,
                    extracted_to,
                    files,
                } => {
                    println!("\nArchive saved to: {}", archive.path.display());
                    println!("Extracted {} file(s) to: {}", files, extracted_to.display());
                }
            }
            job.status = JobStatus::Ready;
            job.progress = 100;
            job.output_path = Some(saved.primary_path().to_string_lossy().to_string());

            let manifest_path = output_dir.join(MANIFEST_FILE);
            match saved.record_in_manifest(&manifest_path, job.asset_type, &job.asset_name)? {
                Some(sprite) => println!(
                    "Recorded {} in {}",
                    sprite.display(),
                    manifest_path.display()
                ),
                None => println!("No PNG found in the bundle; manifest left unchanged"),
            }
        }
        Err(SpriteError::PollTimeout { attempts, .. }) => {
            println!(
                "\nStill not ready after {} checks. Run `spriteforge character wait {}` again later.",
                attempts, job.asset_name
            );
            job.status = JobStatus::TimedOut;
        }
        Err(e) => {
            job.status = JobStatus::Failed;
            job.error = Some(e.to_string());
            if tracked {
                ctx.store.save(&job)?;
            }
            return Err(e.into());
        }
    }

    if tracked {
        ctx.store.save(&job)?;
    }
    Ok(())
}
