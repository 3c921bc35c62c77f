//! Tracking for remote character jobs
//!
//! Jobs are persisted as `.job.toml` files in `.spriteforge/jobs/` so a job
//! created in one invocation can be waited on in another.

use crate::status::JobState;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use spriteforge_catalog::AssetType;
use spriteforge_core::{Result, SpriteError};
use std::path::{Path, PathBuf};

const JOB_FILE_SUFFIX: &str = ".job.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Submitted,
    Processing,
    Ready,
    Failed,
    TimedOut,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Processing => "processing",
            JobStatus::Ready => "ready",
            JobStatus::Failed => "failed",
            JobStatus::TimedOut => "timed_out",
        };
        write!(f, "{}", s)
    }
}

/// A tracked remote job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteJob {
    /// Local job ID (UUID)
    pub id: String,
    /// Identifier assigned by the service
    pub remote_id: String,
    pub asset_name: String,
    /// Manifest type the finished image is recorded under
    #[serde(default = "default_asset_type")]
    pub asset_type: AssetType,
    pub status: JobStatus,
    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,
    /// RFC 3339 timestamp when submitted
    pub submitted_at: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl RemoteJob {
    pub fn new(remote_id: &str, asset_name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            remote_id: remote_id.to_string(),
            asset_name: asset_name.to_string(),
            asset_type: AssetType::Character,
            status: JobStatus::Submitted,
            progress: 0,
            submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            error: None,
            output_path: None,
        }
    }

    pub fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    /// Fold a classified status response into the record
    pub fn apply_state(&mut self, state: &JobState) {
        match state {
            JobState::Queued | JobState::Unrecognized => {}
            JobState::Processing { percent } => {
                self.status = JobStatus::Processing;
                if let Some(p) = percent {
                    self.progress = *p;
                }
            }
            JobState::Ready { .. } => {
                self.status = JobStatus::Ready;
                self.progress = 100;
                self.error = None;
            }
            JobState::Failed { reason } => {
                self.status = JobStatus::Failed;
                self.error = Some(reason.clone());
            }
        }
    }
}

fn default_asset_type() -> AssetType {
    AssetType::Character
}

/// File-based job store
pub struct JobStore {
    root: PathBuf,
}

impl JobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, job_id: &str) -> PathBuf {
        self.root.join(format!("{}{}", job_id, JOB_FILE_SUFFIX))
    }

    pub fn save(&self, job: &RemoteJob) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let wrapper = JobFile { job: job.clone() };
        let content = toml::to_string_pretty(&wrapper)?;
        std::fs::write(self.path_for(&job.id), content)?;
        Ok(())
    }

    /// Load a job by local ID
    pub fn load(&self, job_id: &str) -> Result<RemoteJob> {
        let path = self.path_for(job_id);
        if !path.exists() {
            return Err(SpriteError::JobNotFound(job_id.to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        let file: JobFile = toml::from_str(&content)?;
        Ok(file.job)
    }

    /// All tracked jobs, oldest first. Unreadable job files are skipped.
    pub fn list(&self) -> Result<Vec<RemoteJob>> {
        let mut jobs = Vec::new();

        if !self.root.exists() {
            return Ok(jobs);
        }

        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_job = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(JOB_FILE_SUFFIX))
                .unwrap_or(false);
            if !is_job {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            match toml::from_str::<JobFile>(&content) {
                Ok(file) => jobs.push(file.job),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping job file"),
            }
        }

        jobs.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(jobs)
    }

    /// Look a job up by local ID, remote ID, or asset name (most recent wins)
    pub fn find(&self, key: &str) -> Result<RemoteJob> {
        if let Ok(job) = self.load(key) {
            return Ok(job);
        }
        self.list()?
            .into_iter()
            .rev()
            .find(|j| j.remote_id == key || j.asset_name == key)
            .ok_or_else(|| SpriteError::JobNotFound(key.to_string()))
    }

    pub fn update_status(&self, job_id: &str, status: JobStatus, progress: u8) -> Result<RemoteJob> {
        let mut job = self.load(job_id)?;
        job.status = status;
        job.progress = progress;
        self.save(&job)?;
        Ok(job)
    }
}

#[derive(Serialize, Deserialize)]
struct JobFile {
    job: RemoteJob,
}
