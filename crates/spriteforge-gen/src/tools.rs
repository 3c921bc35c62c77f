//! Argument sets for the PixelLab tools
//!
//! Each struct serializes straight into the `arguments` object of a
//! `tools/call` request. Optional fields are omitted when unset.

use serde::{Deserialize, Serialize};

pub const TOOL_CREATE_CHARACTER: &str = "create_character";
pub const TOOL_ANIMATE_CHARACTER: &str = "animate_character";
pub const TOOL_CREATE_TILESET: &str = "create_tileset";
pub const TOOL_CREATE_MAP_OBJECT: &str = "create_map_object";
pub const TOOL_GET_CHARACTER: &str = "get_character";

/// `create_character`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterRequest {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_palette: Vec<String>,
    /// Number of directional views, e.g. 4 or 8
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_directions: Option<u8>,
    /// Body proportions, sent as a JSON-encoded string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CharacterRequest {
    /// Preset proportions in the string form the service expects
    pub fn preset_proportions(preset: &str) -> String {
        serde_json::json!({"type": "preset", "name": preset}).to_string()
    }
}

/// `animate_character`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub character_name: String,
    pub animations: Vec<String>,
    pub frames_per_animation: u32,
    pub frame_duration: f64,
}

/// `create_tileset`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetRequest {
    pub name: String,
    /// Projection: "top-down", "sidescroller" or "isometric"
    #[serde(rename = "type")]
    pub tileset_type: String,
    pub tiles: Vec<String>,
    pub tile_size: u32,
    pub variations: u32,
}

/// `create_map_object`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObjectRequest {
    pub name: String,
    pub description: String,
    /// "prop", "decoration" or "obstacle"
    #[serde(rename = "type")]
    pub object_type: String,
    pub size: u32,
    pub has_shadow: bool,
}
