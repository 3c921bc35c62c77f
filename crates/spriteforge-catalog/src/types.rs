//! Asset type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a generated asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Character,
    Enemy,
    Animation,
    Tileset,
    MapObject,
    UiElement,
    /// Any type string this version does not know about
    #[serde(other)]
    Other,
}

impl AssetType {
    /// Every known type, in reference-guide order
    pub const ALL: [AssetType; 6] = [
        AssetType::Character,
        AssetType::Enemy,
        AssetType::Animation,
        AssetType::Tileset,
        AssetType::MapObject,
        AssetType::UiElement,
    ];

    /// Folder inside the asset catalog that holds this type's imagesets
    pub fn category_folder(&self) -> &'static str {
        match self {
            AssetType::Character => "Characters",
            AssetType::Enemy => "Enemies",
            AssetType::Animation => "Animations",
            AssetType::Tileset => "Tilesets",
            AssetType::MapObject => "MapObjects",
            AssetType::UiElement => "UI",
            AssetType::Other => "Generated",
        }
    }

    /// Heading used in console output and the reference guide
    pub fn title(&self) -> &'static str {
        match self {
            AssetType::Character => "Characters",
            AssetType::Enemy => "Enemies",
            AssetType::Animation => "Animations",
            AssetType::Tileset => "Tilesets",
            AssetType::MapObject => "Map Objects",
            AssetType::UiElement => "UI Elements",
            AssetType::Other => "Other",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetType::Character => "character",
            AssetType::Enemy => "enemy",
            AssetType::Animation => "animation",
            AssetType::Tileset => "tileset",
            AssetType::MapObject => "map_object",
            AssetType::UiElement => "ui_element",
            AssetType::Other => "other",
        };
        write!(f, "{}", s)
    }
}
