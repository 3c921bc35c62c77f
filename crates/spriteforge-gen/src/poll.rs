//! Bounded poll loop for long-running character jobs
//!
//! One status check per attempt, a fixed sleep between attempts, and a hard
//! ceiling. There is no backoff and no retry beyond the ceiling.

use crate::client::PixelLabClient;
use crate::rpc::{self, ImageSource};
use crate::status::{classify_response, JobState, StatusMarkers};
use crate::transport::Transport;
use crate::writer::{check_asset_name, AssetWriter, SavedDownload};
use spriteforge_core::{Result, SpriteError};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    pub markers: StatusMarkers,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            markers: StatusMarkers::default(),
        }
    }
}

/// A job that reached the ready state
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Status checks issued, including the successful one
    pub attempts: u32,
    pub source: Option<ImageSource>,
    /// Status text of the final response
    pub message: String,
}

/// Check a job until it is ready, failed, or the attempt ceiling is hit.
pub fn poll_job<T: Transport>(
    client: &PixelLabClient<T>,
    job_id: &str,
    config: &PollConfig,
) -> Result<PollOutcome> {
    info!(job_id, max_attempts = config.max_attempts, "polling job");

    for attempt in 1..=config.max_attempts {
        match client.get_character(job_id) {
            Ok(response) => {
                let message = rpc::text_content(&response);
                let state = classify_response(&response, &config.markers);
                debug!(job_id, attempt, ?state, "status check");

                match state {
                    JobState::Ready { source } => {
                        println!("  Ready after {} check(s)", attempt);
                        return Ok(PollOutcome {
                            attempts: attempt,
                            source,
                            message,
                        });
                    }
                    JobState::Failed { reason } => {
                        return Err(SpriteError::JobFailed(reason));
                    }
                    JobState::Processing { percent: Some(p) } => {
                        println!("  [{}/{}] Processing... {}%", attempt, config.max_attempts, p);
                    }
                    JobState::Processing { percent: None } => {
                        println!("  [{}/{}] Processing...", attempt, config.max_attempts);
                    }
                    JobState::Queued => {
                        println!("  [{}/{}] Queued", attempt, config.max_attempts);
                    }
                    JobState::Unrecognized => {
                        println!("  [{}/{}] Waiting...", attempt, config.max_attempts);
                        debug!(job_id, %message, "unrecognized status text");
                    }
                }
            }
            Err(e) => {
                warn!(job_id, attempt, error = %e, "status check failed");
            }
        }

        if attempt < config.max_attempts {
            std::thread::sleep(config.interval);
        }
    }

    Err(SpriteError::PollTimeout {
        job_id: job_id.to_string(),
        attempts: config.max_attempts,
    })
}

/// Poll a job and, once it is ready, save its result under `<subdir>/`.
/// Nothing is written unless the job finishes.
pub fn download_when_ready<T: Transport, W: Transport>(
    client: &PixelLabClient<T>,
    job_id: &str,
    config: &PollConfig,
    writer: &AssetWriter<W>,
    name: &str,
    subdir: &str,
) -> Result<SavedDownload> {
    check_asset_name(name)?;
    let outcome = poll_job(client, job_id, config)?;

    match outcome.source {
        Some(ImageSource::Url(url)) => writer.save_download(&url, name, subdir),
        Some(inline @ ImageSource::Inline(_)) => {
            let asset = writer.write_source(&inline, &format!("{}/{}.png", subdir, name))?;
            Ok(SavedDownload::Image(asset))
        }
        None => Err(SpriteError::UnexpectedResponse(format!(
            "job {} is ready but no download link was found in: {}",
            job_id, outcome.message
        ))),
    }
}
