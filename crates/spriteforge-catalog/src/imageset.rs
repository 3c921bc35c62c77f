//! `Contents.json` descriptor for a catalog imageset
//!
//! Only the 1x slot carries a file; 2x and 3x are declared empty so the
//! consuming project can fill them in later.

use serde::{Deserialize, Serialize};
use spriteforge_core::Result;
use std::path::Path;

pub const CONTENTS_FILE: &str = "Contents.json";

/// Scale slots declared for every imageset
pub const SCALES: [&str; 3] = ["1x", "2x", "3x"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub idiom: String,
    pub scale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsInfo {
    pub author: String,
    pub version: u32,
}

impl Default for ContentsInfo {
    fn default() -> Self {
        Self {
            author: "xcode".to_string(),
            version: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesetProperties {
    #[serde(rename = "preserves-vector-representation")]
    pub preserves_vector_representation: bool,
}

/// The full `Contents.json` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesetContents {
    pub images: Vec<ImageSlot>,
    pub info: ContentsInfo,
    #[serde(default)]
    pub properties: ImagesetProperties,
}

impl ImagesetContents {
    /// Descriptor with `filename` in the 1x slot and empty 2x/3x slots
    pub fn for_image(filename: &str) -> Self {
        let images = SCALES
            .iter()
            .map(|scale| ImageSlot {
                filename: (*scale == "1x").then(|| filename.to_string()),
                idiom: "universal".to_string(),
                scale: scale.to_string(),
            })
            .collect();

        Self {
            images,
            info: ContentsInfo::default(),
            properties: ImagesetProperties::default(),
        }
    }

    /// Write `Contents.json` into an imageset directory
    pub fn write_to(&self, imageset_dir: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(imageset_dir.join(CONTENTS_FILE), content)?;
        Ok(())
    }
}
