//! Roster-driven batch generation
//!
//! Generates every asset in a roster one call at a time. A failed asset is
//! logged and skipped; the manifest records only what was written. Assets the
//! service queues instead of returning are kept as tracked jobs.

use crate::client::PixelLabClient;
use crate::job::{JobStore, RemoteJob};
use crate::roster::Roster;
use crate::rpc;
use crate::status;
use crate::tools::{AnimationRequest, CharacterRequest, MapObjectRequest, TilesetRequest};
use crate::transport::Transport;
use crate::writer::{check_asset_name, AssetWriter};
use spriteforge_catalog::{AssetDescriptor, AssetManifest, AssetType};
use spriteforge_core::{Result, SpriteError};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// A roster section, generated in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Characters,
    Enemies,
    Animations,
    Tilesets,
    MapObjects,
    UiElements,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Characters,
        Section::Enemies,
        Section::Animations,
        Section::Tilesets,
        Section::MapObjects,
        Section::UiElements,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Characters => "characters",
            Section::Enemies => "enemies",
            Section::Animations => "animations",
            Section::Tilesets => "tilesets",
            Section::MapObjects => "map_objects",
            Section::UiElements => "ui_elements",
        }
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            Section::Characters => AssetType::Character,
            Section::Enemies => AssetType::Enemy,
            Section::Animations => AssetType::Animation,
            Section::Tilesets => AssetType::Tileset,
            Section::MapObjects => AssetType::MapObject,
            Section::UiElements => AssetType::UiElement,
        }
    }
}

impl FromStr for Section {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Section::ALL.iter().map(|s| s.key()).collect();
                SpriteError::ConfigError(format!(
                    "Unknown section '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchReport {
    pub manifest: AssetManifest,
    pub manifest_path: PathBuf,
    /// `(asset name, error)` for every asset that was skipped
    pub failures: Vec<(String, String)>,
    /// Assets accepted as remote jobs, to be fetched with `character wait`
    pub queued: Vec<RemoteJob>,
}

impl BatchReport {
    pub fn generated(&self) -> usize {
        self.manifest.len()
    }
}

enum ToolCall {
    Character(CharacterRequest),
    Animation(AnimationRequest),
    Tileset(TilesetRequest),
    MapObject(MapObjectRequest),
}

enum AssetOutcome {
    Written(PathBuf),
    Queued(RemoteJob),
}

/// One planned tool call and where its image goes
struct PlannedAsset {
    name: String,
    manifest_name: String,
    relative_path: String,
    call: ToolCall,
}

pub struct BatchGenerator<'a, T: Transport, W: Transport> {
    client: &'a PixelLabClient<T>,
    writer: &'a AssetWriter<W>,
    job_store: Option<&'a JobStore>,
    sections: Vec<Section>,
}

impl<'a, T: Transport, W: Transport> BatchGenerator<'a, T, W> {
    pub fn new(client: &'a PixelLabClient<T>, writer: &'a AssetWriter<W>) -> Self {
        Self {
            client,
            writer,
            job_store: None,
            sections: Section::ALL.to_vec(),
        }
    }

    /// Persist queued jobs so they can be waited on later
    pub fn with_job_store(mut self, store: &'a JobStore) -> Self {
        self.job_store = Some(store);
        self
    }

    /// Restrict the run to the given sections (kept in generation order)
    pub fn with_sections(mut self, sections: &[Section]) -> Self {
        self.sections = Section::ALL
            .into_iter()
            .filter(|s| sections.contains(s))
            .collect();
        self
    }

    /// Generate the roster and save the manifest to `manifest_path`.
    /// Only a failure to write the manifest is an error.
    pub fn run(&self, roster: &Roster, manifest_path: &Path) -> Result<BatchReport> {
        let mut manifest = AssetManifest::new();
        let mut failures = Vec::new();
        let mut queued = Vec::new();

        for section in &self.sections {
            let planned = Self::plan(*section, roster);
            if planned.is_empty() {
                continue;
            }

            println!("{}", "=".repeat(60));
            println!("Generating {}", section.asset_type().title());
            println!("{}", "=".repeat(60));

            for asset in planned {
                println!("\nGenerating {}...", asset.name);
                match self.generate_one(*section, &asset) {
                    Ok(AssetOutcome::Written(path)) => {
                        println!("  Saved to: {}", path.display());
                        manifest.push(AssetDescriptor::new(
                            section.asset_type(),
                            &asset.manifest_name,
                            &path,
                        ));
                    }
                    Ok(AssetOutcome::Queued(job)) => {
                        println!("  Queued as job {} (remote id {})", job.id, job.remote_id);
                        queued.push(job);
                    }
                    Err(e) => {
                        println!("  Error: {}", e);
                        warn!(asset = %asset.name, error = %e, "asset generation failed");
                        failures.push((asset.name.clone(), e.to_string()));
                    }
                }
            }
        }

        manifest.save(manifest_path)?;
        info!(
            generated = manifest.len(),
            failed = failures.len(),
            queued = queued.len(),
            path = %manifest_path.display(),
            "manifest saved"
        );

        Ok(BatchReport {
            manifest,
            manifest_path: manifest_path.to_path_buf(),
            failures,
            queued,
        })
    }

    fn generate_one(&self, section: Section, asset: &PlannedAsset) -> Result<AssetOutcome> {
        check_asset_name(&asset.name)?;
        let response = match &asset.call {
            ToolCall::Character(req) => self.client.create_character(req)?,
            ToolCall::Animation(req) => self.client.animate_character(req)?,
            ToolCall::Tileset(req) => self.client.create_tileset(req)?,
            ToolCall::MapObject(req) => self.client.create_map_object(req)?,
        };

        if rpc::image_source(&response).is_none() {
            if let Some(remote_id) = status::extract_job_id(&response) {
                let job = RemoteJob::new(&remote_id, &asset.manifest_name)
                    .with_asset_type(section.asset_type());
                match self.job_store {
                    Some(store) => store.save(&job)?,
                    None => warn!(asset = %asset.name, remote_id = %remote_id, "queued job not persisted"),
                }
                info!(asset = %asset.name, job_id = %job.id, remote_id = %remote_id, "asset queued");
                return Ok(AssetOutcome::Queued(job));
            }
        }

        let written = self.writer.save_response(&response, &asset.relative_path)?;
        Ok(AssetOutcome::Written(written.path))
    }

    fn plan(section: Section, roster: &Roster) -> Vec<PlannedAsset> {
        match section {
            Section::Characters | Section::Enemies => {
                let requests = if section == Section::Characters {
                    roster.character_requests()
                } else {
                    roster.enemy_requests()
                };
                requests
                    .into_iter()
                    .map(|req| PlannedAsset {
                        name: req.name.clone(),
                        manifest_name: req.name.clone(),
                        relative_path: format!("characters/{}.png", req.name),
                        call: ToolCall::Character(req),
                    })
                    .collect()
            }
            Section::Animations => roster
                .animation_requests()
                .into_iter()
                .map(|req| PlannedAsset {
                    name: req.character_name.clone(),
                    manifest_name: format!("{}_animations", req.character_name),
                    relative_path: format!("animations/{}_spritesheet.png", req.character_name),
                    call: ToolCall::Animation(req),
                })
                .collect(),
            Section::Tilesets => roster
                .tilesets
                .iter()
                .cloned()
                .map(|req| PlannedAsset {
                    name: req.name.clone(),
                    manifest_name: req.name.clone(),
                    relative_path: format!("tilesets/{}_{}.png", req.name, req.tileset_type),
                    call: ToolCall::Tileset(req),
                })
                .collect(),
            Section::MapObjects | Section::UiElements => {
                let requests = if section == Section::MapObjects {
                    roster.map_object_requests()
                } else {
                    roster.ui_requests()
                };
                requests
                    .into_iter()
                    .map(|req| PlannedAsset {
                        name: req.name.clone(),
                        manifest_name: req.name.clone(),
                        relative_path: format!("objects/{}.png", req.name),
                        call: ToolCall::MapObject(req),
                    })
                    .collect()
            }
        }
    }
}
