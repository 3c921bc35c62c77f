//! Markdown reference guide mapping asset names to texture lookups
//!
//! The output is for humans only; nothing reads it back.

use crate::manifest::AssetManifest;
use crate::types::AssetType;
use spriteforge_core::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_GUIDE_FILE: &str = "ASSET_REFERENCE.md";

/// Guide location for a manifest: the same directory, `ASSET_REFERENCE.md`
pub fn guide_path_for(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_GUIDE_FILE)
}

/// Swift identifier used for an asset of the given type
pub fn identifier_for(asset_type: AssetType, name: &str) -> String {
    let lower = name.to_lowercase();
    let compact = name.replace('_', "").to_lowercase();
    match asset_type {
        AssetType::Character | AssetType::Enemy => format!("{}Sprite", lower),
        AssetType::Animation => format!("{}Atlas", lower),
        AssetType::Tileset => lower,
        AssetType::MapObject => format!("{}Sprite", compact),
        AssetType::UiElement => format!("{}Icon", compact),
        AssetType::Other => compact,
    }
}

/// Render the guide. Sections appear in a fixed order and empty ones are omitted.
pub fn render_reference_guide(manifest: &AssetManifest, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} Asset Reference\n", title);
    out.push_str("This guide shows how to reference generated assets in Swift code.\n\n");

    for asset_type in AssetType::ALL {
        let names = manifest.names_of(asset_type);
        if names.is_empty() {
            continue;
        }

        let _ = writeln!(out, "## {}\n", asset_type.title());
        out.push_str("```swift\n");
        if asset_type == AssetType::Animation {
            out.push_str("// Animation spritesheets - use SKTextureAtlas or slice manually\n");
        }
        for name in names {
            let _ = writeln!(
                out,
                "let {} = SKTexture(imageNamed: \"{}\")",
                identifier_for(asset_type, name),
                name
            );
        }
        out.push_str("```\n\n");
    }

    out
}

/// Render and write the guide to `path`
pub fn write_reference_guide(manifest: &AssetManifest, title: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_reference_guide(manifest, title))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::AssetDescriptor;

    #[test]
    fn test_identifier_rules() {
        assert_eq!(identifier_for(AssetType::Character, "Tariq"), "tariqSprite");
        assert_eq!(identifier_for(AssetType::Enemy, "SandScarab"), "sandscarabSprite");
        assert_eq!(
            identifier_for(AssetType::Animation, "Omar_animations"),
            "omar_animationsAtlas"
        );
        assert_eq!(identifier_for(AssetType::Tileset, "DesertGround"), "desertground");
        assert_eq!(identifier_for(AssetType::MapObject, "Cactus_Small"), "cactussmallSprite");
        assert_eq!(identifier_for(AssetType::UiElement, "XP_Gem_Blue"), "xpgemblueIcon");
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(AssetType::UiElement, "Heart_Icon", "h.png"));
        manifest.push(AssetDescriptor::new(AssetType::Character, "Layla", "l.png"));
        manifest.push(AssetDescriptor::new(AssetType::Animation, "Layla_animations", "la.png"));

        let guide = render_reference_guide(&manifest, "Desert Survivors");

        assert!(guide.starts_with("# Desert Survivors Asset Reference\n"));
        let characters = guide.find("## Characters").unwrap();
        let animations = guide.find("## Animations").unwrap();
        let ui = guide.find("## UI Elements").unwrap();
        assert!(characters < animations && animations < ui);
        assert!(!guide.contains("## Tilesets"));
        assert!(guide.contains("let laylaSprite = SKTexture(imageNamed: \"Layla\")"));
        assert!(guide.contains("// Animation spritesheets"));
        assert!(guide.contains("let hearticonIcon = SKTexture(imageNamed: \"Heart_Icon\")"));
    }

    #[test]
    fn test_guide_sits_beside_manifest() {
        assert_eq!(
            guide_path_for(Path::new("runs/2024/asset_manifest.json")),
            PathBuf::from("runs/2024/ASSET_REFERENCE.md")
        );
        assert_eq!(
            guide_path_for(Path::new("asset_manifest.json")),
            PathBuf::from("ASSET_REFERENCE.md")
        );
    }
}
