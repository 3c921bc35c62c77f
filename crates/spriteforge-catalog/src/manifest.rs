//! Asset manifest for a generation run
//!
//! The manifest is an ordered JSON array of `{type, name, path}` records.
//! Each run builds a fresh manifest and overwrites the file on save.

use crate::types::AssetType;
use serde::{Deserialize, Serialize};
use spriteforge_core::Result;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "asset_manifest.json";

/// One generated asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub name: String,
    /// Path of the written file, as produced by the writer
    pub path: String,
}

impl AssetDescriptor {
    pub fn new(asset_type: AssetType, name: &str, path: impl AsRef<Path>) -> Self {
        Self {
            asset_type,
            name: name.to_string(),
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Resolve the descriptor path against a project root (absolute paths win)
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

/// Ordered list of generated assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: Vec<AssetDescriptor>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: AssetDescriptor) {
        self.entries.push(descriptor);
    }

    /// Replace the entry with the same type and name, or append a new one
    pub fn upsert(&mut self, descriptor: AssetDescriptor) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.asset_type == descriptor.asset_type && e.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    pub fn entries(&self) -> &[AssetDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of every entry of the given type, in manifest order
    pub fn names_of(&self, asset_type: AssetType) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.asset_type == asset_type)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Group entries by type, keeping the order in which types first appear
    pub fn grouped(&self) -> Vec<(AssetType, Vec<&AssetDescriptor>)> {
        let mut groups: Vec<(AssetType, Vec<&AssetDescriptor>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(ty, _)| *ty == entry.asset_type) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.asset_type, vec![entry])),
            }
        }
        groups
    }

    /// Load the manifest at `path`, or start an empty one when there is none
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Write the manifest, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spriteforge_manifest_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_manifest_is_plain_array() {
        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(
            AssetType::Character,
            "Tariq",
            "GeneratedAssets/characters/Tariq.png",
        ));

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"type": "character", "name": "Tariq", "path": "GeneratedAssets/characters/Tariq.png"}
            ])
        );
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let dir = temp_dir();
        let path = dir.join("asset_manifest.json");

        let mut first = AssetManifest::new();
        first.push(AssetDescriptor::new(AssetType::Enemy, "Scorpion", "a.png"));
        first.push(AssetDescriptor::new(AssetType::Enemy, "DesertRat", "b.png"));
        first.save(&path).unwrap();

        let mut second = AssetManifest::new();
        second.push(AssetDescriptor::new(AssetType::Tileset, "Oasis", "c.png"));
        second.save(&path).unwrap();

        let loaded = AssetManifest::load(&path).unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_grouped_keeps_first_appearance_order() {
        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(AssetType::Tileset, "Oasis", "o.png"));
        manifest.push(AssetDescriptor::new(AssetType::Character, "Omar", "c.png"));
        manifest.push(AssetDescriptor::new(AssetType::Tileset, "DesertGround", "d.png"));

        let groups = manifest.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, AssetType::Tileset);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, AssetType::Character);
        assert_eq!(manifest.names_of(AssetType::Tileset), vec!["Oasis", "DesertGround"]);
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let root = Path::new("/project");
        let relative = AssetDescriptor::new(AssetType::UiElement, "Heart_Icon", "out/h.png");
        assert_eq!(relative.resolve(root), PathBuf::from("/project/out/h.png"));

        let absolute = AssetDescriptor::new(AssetType::UiElement, "Gold_Coin", "/tmp/g.png");
        assert_eq!(absolute.resolve(root), PathBuf::from("/tmp/g.png"));
    }

    #[test]
    fn test_upsert_replaces_same_asset() {
        let dir = temp_dir();
        let path = dir.join("asset_manifest.json");

        let mut manifest = AssetManifest::load_or_default(&path).unwrap();
        assert!(manifest.is_empty());
        manifest.push(AssetDescriptor::new(AssetType::Enemy, "Scorpion", "a.png"));
        manifest.upsert(AssetDescriptor::new(AssetType::Character, "Tariq", "old.png"));
        manifest.upsert(AssetDescriptor::new(AssetType::Character, "Tariq", "new.png"));
        manifest.save(&path).unwrap();

        let reloaded = AssetManifest::load_or_default(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entries()[1].path, "new.png");

        std::fs::remove_dir_all(&dir).ok();
    }
}
