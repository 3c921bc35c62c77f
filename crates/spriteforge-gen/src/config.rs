//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `SPRITEFORGE_API_KEY`, `SPRITEFORGE_API_URL`
//! 2. Project-local: `.spriteforge/config.toml`
//! 3. Global: `~/.spriteforge/config.toml`
//!
//! The API key has no default. Running without one is a config error.

use crate::poll::PollConfig;
use crate::status::StatusMarkers;
use serde::{Deserialize, Serialize};
use spriteforge_catalog::MANIFEST_FILE;
use spriteforge_core::{Result, SpriteError};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.pixellab.ai/mcp";
pub const ENV_API_KEY: &str = "SPRITEFORGE_API_KEY";
pub const ENV_API_URL: &str = "SPRITEFORGE_API_URL";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_POLL_ATTEMPTS: u32 = 60;
const DEFAULT_OUTPUT_DIR: &str = "GeneratedAssets";
const DEFAULT_CATALOG_DIR: &str = "Assets.xcassets";
const DEFAULT_JOBS_DIR: &str = ".spriteforge/jobs";
const DEFAULT_PROJECT_TITLE: &str = "Desert Survivors";

/// `[api]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,
}

/// `[poll]` section. Marker lists replace the built-in vocabulary when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollSettings {
    #[serde(default)]
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub processing_markers: Option<Vec<String>>,
    #[serde(default)]
    pub queued_markers: Option<Vec<String>>,
    #[serde(default)]
    pub failed_markers: Option<Vec<String>>,
    #[serde(default)]
    pub ready_markers: Option<Vec<String>>,
}

/// `[paths]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub project_root: Option<String>,
    /// Asset catalog directory, relative to the project root
    #[serde(default)]
    pub catalog_dir: Option<String>,
    #[serde(default)]
    pub jobs_dir: Option<String>,
    /// Title used in the generated reference guide
    #[serde(default)]
    pub project_title: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteConfigFile {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Resolved configuration with environment overrides applied
#[derive(Debug, Clone, Default)]
pub struct SpriteConfig {
    pub api: ApiConfig,
    pub poll: PollSettings,
    pub paths: PathsConfig,
}

impl SpriteConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = SpriteConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".spriteforge/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        Ok(config.into())
    }

    /// Load config from a specific file path only, still honoring env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config.into())
    }

    /// The bearer token. Never defaulted.
    pub fn api_key(&self) -> Result<&str> {
        self.api
            .key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                SpriteError::ConfigError(format!(
                    "API key not configured. Set {} or add `key` under [api] in .spriteforge/config.toml",
                    ENV_API_KEY
                ))
            })
    }

    pub fn api_url(&self) -> &str {
        self.api.url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(
            self.api
                .download_timeout_secs
                .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
        )
    }

    /// Poll loop settings with configured markers applied over the defaults
    pub fn poll_config(&self) -> PollConfig {
        let mut markers = StatusMarkers::default();
        if let Some(ref m) = self.poll.processing_markers {
            markers.processing = m.clone();
        }
        if let Some(ref m) = self.poll.queued_markers {
            markers.queued = m.clone();
        }
        if let Some(ref m) = self.poll.failed_markers {
            markers.failed = m.clone();
        }
        if let Some(ref m) = self.poll.ready_markers {
            markers.ready = m.clone();
        }

        PollConfig {
            interval: Duration::from_secs(
                self.poll.interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            max_attempts: self.poll.max_attempts.unwrap_or(DEFAULT_POLL_ATTEMPTS),
            markers,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(
            self.paths
                .output_dir
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_DIR),
        )
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir().join(MANIFEST_FILE)
    }

    pub fn project_root(&self) -> PathBuf {
        PathBuf::from(self.paths.project_root.as_deref().unwrap_or("."))
    }

    pub fn catalog_dir(&self) -> PathBuf {
        PathBuf::from(
            self.paths
                .catalog_dir
                .as_deref()
                .unwrap_or(DEFAULT_CATALOG_DIR),
        )
    }

    pub fn jobs_dir(&self) -> PathBuf {
        PathBuf::from(self.paths.jobs_dir.as_deref().unwrap_or(DEFAULT_JOBS_DIR))
    }

    pub fn project_title(&self) -> &str {
        self.paths
            .project_title
            .as_deref()
            .unwrap_or(DEFAULT_PROJECT_TITLE)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spriteforge").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<SpriteConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            SpriteError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut SpriteConfigFile, overlay: SpriteConfigFile) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut base.api.url, overlay.api.url);
        take(&mut base.api.key, overlay.api.key);
        take(&mut base.api.timeout_secs, overlay.api.timeout_secs);
        take(
            &mut base.api.download_timeout_secs,
            overlay.api.download_timeout_secs,
        );

        take(&mut base.poll.interval_secs, overlay.poll.interval_secs);
        take(&mut base.poll.max_attempts, overlay.poll.max_attempts);
        take(
            &mut base.poll.processing_markers,
            overlay.poll.processing_markers,
        );
        take(&mut base.poll.queued_markers, overlay.poll.queued_markers);
        take(&mut base.poll.failed_markers, overlay.poll.failed_markers);
        take(&mut base.poll.ready_markers, overlay.poll.ready_markers);

        take(&mut base.paths.output_dir, overlay.paths.output_dir);
        take(&mut base.paths.project_root, overlay.paths.project_root);
        take(&mut base.paths.catalog_dir, overlay.paths.catalog_dir);
        take(&mut base.paths.jobs_dir, overlay.paths.jobs_dir);
        take(&mut base.paths.project_title, overlay.paths.project_title);
    }

    fn apply_env_overrides<F>(config: &mut SpriteConfigFile, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            config.api.key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL) {
            config.api.url = Some(url);
        }
    }
}

impl From<SpriteConfigFile> for SpriteConfig {
    fn from(file: SpriteConfigFile) -> Self {
        Self {
            api: file.api,
            poll: file.poll,
            paths: file.paths,
        }
    }
}
