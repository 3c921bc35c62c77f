//! Batch plans describing a game's full sprite set
//!
//! A roster is a TOML file listing every character, enemy, animation,
//! tileset, map object and UI element to generate. Rosters are looked up by
//! name in `rosters/` and `.spriteforge/rosters/`.

use crate::tools::{AnimationRequest, CharacterRequest, MapObjectRequest, TilesetRequest};
use serde::{Deserialize, Serialize};
use spriteforge_core::{Result, SpriteError};
use std::path::Path;

const DEFAULT_STYLE: &str = "16-bit";
const DEFAULT_VIEW: &str = "top-down";
const DEFAULT_CHARACTER_SIZE: u32 = 64;
const DEFAULT_ENEMY_SIZE: u32 = 48;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterMeta {
    pub name: String,
    /// Project title used in the reference guide
    #[serde(default)]
    pub title: Option<String>,
}

/// Values applied to entries that leave them unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterDefaults {
    pub style: Option<String>,
    pub view: Option<String>,
    pub character_size: Option<u32>,
    pub enemy_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// One `animate_character` call per listed character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationPlan {
    pub characters: Vec<String>,
    pub animations: Vec<String>,
    pub frames_per_animation: u32,
    pub frame_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObjectEntry {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub size: u32,
    #[serde(default = "default_true")]
    pub has_shadow: bool,
}

/// UI elements are generated as shadowless props
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiEntry {
    pub name: String,
    pub description: String,
    pub size: u32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub roster: RosterMeta,
    #[serde(default)]
    pub defaults: RosterDefaults,
    #[serde(default)]
    pub characters: Vec<CharacterEntry>,
    #[serde(default)]
    pub enemies: Vec<CharacterEntry>,
    #[serde(default)]
    pub animations: Option<AnimationPlan>,
    #[serde(default)]
    pub tilesets: Vec<TilesetRequest>,
    #[serde(default)]
    pub map_objects: Vec<MapObjectEntry>,
    #[serde(default)]
    pub ui_elements: Vec<UiEntry>,
}

impl Roster {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Find a roster by name, or load it directly when `name` is a path
    pub fn find(name: &str) -> Result<Self> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Self::load(direct);
        }

        let candidates = [
            format!("rosters/{}.roster.toml", name),
            format!(".spriteforge/rosters/{}.roster.toml", name),
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(SpriteError::ConfigError(format!(
            "Roster '{}' not found (searched: {})",
            name,
            candidates.join(", ")
        )))
    }

    pub fn title(&self) -> Option<&str> {
        self.roster.title.as_deref()
    }

    fn character_request(&self, entry: &CharacterEntry, default_size: u32) -> CharacterRequest {
        CharacterRequest {
            name: entry.name.clone(),
            description: entry.description.clone(),
            style: Some(
                self.defaults
                    .style
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            ),
            view: Some(
                self.defaults
                    .view
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VIEW.to_string()),
            ),
            size: entry.size.unwrap_or(default_size),
            color_palette: entry.palette.clone(),
            ..Default::default()
        }
    }

    pub fn character_requests(&self) -> Vec<CharacterRequest> {
        let size = self
            .defaults
            .character_size
            .unwrap_or(DEFAULT_CHARACTER_SIZE);
        self.characters
            .iter()
            .map(|c| self.character_request(c, size))
            .collect()
    }

    pub fn enemy_requests(&self) -> Vec<CharacterRequest> {
        let size = self.defaults.enemy_size.unwrap_or(DEFAULT_ENEMY_SIZE);
        self.enemies
            .iter()
            .map(|e| self.character_request(e, size))
            .collect()
    }

    pub fn animation_requests(&self) -> Vec<AnimationRequest> {
        let Some(plan) = &self.animations else {
            return Vec::new();
        };
        plan.characters
            .iter()
            .map(|name| AnimationRequest {
                character_name: name.clone(),
                animations: plan.animations.clone(),
                frames_per_animation: plan.frames_per_animation,
                frame_duration: plan.frame_duration,
            })
            .collect()
    }

    pub fn map_object_requests(&self) -> Vec<MapObjectRequest> {
        self.map_objects
            .iter()
            .map(|o| MapObjectRequest {
                name: o.name.clone(),
                description: o.description.clone(),
                object_type: o.object_type.clone(),
                size: o.size,
                has_shadow: o.has_shadow,
            })
            .collect()
    }

    pub fn ui_requests(&self) -> Vec<MapObjectRequest> {
        self.ui_elements
            .iter()
            .map(|u| MapObjectRequest {
                name: u.name.clone(),
                description: u.description.clone(),
                object_type: "prop".to_string(),
                size: u.size,
                has_shadow: false,
            })
            .collect()
    }

    /// Number of generation calls the roster implies
    pub fn total(&self) -> usize {
        self.characters.len()
            + self.enemies.len()
            + self.animations.as_ref().map_or(0, |a| a.characters.len())
            + self.tilesets.len()
            + self.map_objects.len()
            + self.ui_elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
[roster]
name = "sample"
title = "Sample Game"

[defaults]
enemy_size = 40

[[characters]]
name = "Tariq"
description = "Young warrior"
palette = ["#D4A574", "#8B4513"]

[[enemies]]
name = "Scorpion"
description = "Black scorpion"

[[enemies]]
name = "SandWorm"
description = "Huge worm"
size = 96

[animations]
characters = ["Tariq"]
animations = ["idle", "walk_up"]
frames_per_animation = 4
frame_duration = 0.15

[[tilesets]]
name = "Oasis"
type = "top-down"
tiles = ["water_edge", "mud"]
tile_size = 64
variations = 2

[[map_objects]]
name = "Campfire"
description = "Stone circle"
type = "prop"
size = 48

[[ui_elements]]
name = "Heart_Icon"
description = "Pixel heart"
size = 16
"##;

    #[test]
    fn test_parse_sample() {
        let roster = Roster::parse(SAMPLE).unwrap();
        assert_eq!(roster.roster.name, "sample");
        assert_eq!(roster.title(), Some("Sample Game"));
        assert_eq!(roster.total(), 7);
    }

    #[test]
    fn test_requests_apply_defaults() {
        let roster = Roster::parse(SAMPLE).unwrap();

        let chars = roster.character_requests();
        assert_eq!(chars[0].size, 64);
        assert_eq!(chars[0].style.as_deref(), Some("16-bit"));
        assert_eq!(chars[0].view.as_deref(), Some("top-down"));
        assert_eq!(chars[0].color_palette.len(), 2);

        let enemies = roster.enemy_requests();
        assert_eq!(enemies[0].size, 40);
        assert_eq!(enemies[1].size, 96);
        assert!(enemies[0].color_palette.is_empty());

        let anims = roster.animation_requests();
        assert_eq!(anims.len(), 1);
        assert_eq!(anims[0].character_name, "Tariq");
        assert_eq!(anims[0].frame_duration, 0.15);

        assert!(roster.map_object_requests()[0].has_shadow);
        let ui = roster.ui_requests();
        assert!(!ui[0].has_shadow);
        assert_eq!(ui[0].object_type, "prop");
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::parse("[roster]\nname = \"empty\"\n").unwrap();
        assert_eq!(roster.total(), 0);
        assert!(roster.animation_requests().is_empty());
    }

    #[test]
    fn test_bundled_roster_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../rosters/desert_survivors.roster.toml");
        let roster = Roster::load(&path).unwrap();
        assert_eq!(roster.characters.len(), 8);
        assert_eq!(roster.enemies.len(), 8);
        assert_eq!(roster.animation_requests().len(), 8);
        assert_eq!(roster.tilesets.len(), 3);
        assert_eq!(roster.map_objects.len(), 21);
        assert_eq!(roster.ui_elements.len(), 6);
    }

    #[test]
    fn test_find_missing() {
        assert!(Roster::find("definitely_not_a_roster").is_err());
    }
}
