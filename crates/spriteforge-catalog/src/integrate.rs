//! Copy generated sprites into an asset catalog
//!
//! Each descriptor becomes `<catalog>/<Category>/<name>.imageset/` holding
//! `<name>.png` and a `Contents.json`. A missing source file is reported and
//! skipped; only a missing catalog directory aborts the run.

use crate::imageset::ImagesetContents;
use crate::manifest::{AssetDescriptor, AssetManifest};
use spriteforge_core::{ContentHash, Result, SpriteError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// An asset copied into the catalog
#[derive(Debug, Clone)]
pub struct IntegratedAsset {
    pub name: String,
    pub category: &'static str,
    pub imageset_path: PathBuf,
    pub content_hash: ContentHash,
}

/// A descriptor whose source file was not on disk
#[derive(Debug, Clone)]
pub struct MissingAsset {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of integrating a manifest
#[derive(Debug, Default)]
pub struct IntegrationReport {
    pub total: usize,
    pub integrated: Vec<IntegratedAsset>,
    pub missing: Vec<MissingAsset>,
    /// Assets that existed but could not be copied, with the error text
    pub failed: Vec<(String, String)>,
}

pub struct CatalogIntegrator {
    project_root: PathBuf,
    catalog_dir: PathBuf,
}

impl CatalogIntegrator {
    /// `catalog_dir` may be relative to `project_root`
    pub fn new<P: AsRef<Path>, C: AsRef<Path>>(project_root: P, catalog_dir: C) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        let catalog_dir = project_root.join(catalog_dir.as_ref());
        Self {
            project_root,
            catalog_dir,
        }
    }

    pub fn catalog_dir(&self) -> &Path {
        &self.catalog_dir
    }

    /// Integrate every descriptor in the manifest
    pub fn integrate(&self, manifest: &AssetManifest) -> Result<IntegrationReport> {
        if !self.catalog_dir.is_dir() {
            return Err(SpriteError::CatalogError(format!(
                "Asset catalog not found at {}",
                self.catalog_dir.display()
            )));
        }

        info!(
            catalog = %self.catalog_dir.display(),
            assets = manifest.len(),
            "integrating manifest"
        );
        println!("Found {} assets to integrate", manifest.len());

        let mut report = IntegrationReport {
            total: manifest.len(),
            ..Default::default()
        };

        for (asset_type, assets) in manifest.grouped() {
            println!("\n{}:", asset_type.title());

            for asset in assets {
                let source = asset.resolve(&self.project_root);
                if !source.exists() {
                    warn!(name = %asset.name, path = %source.display(), "source image missing");
                    println!("  x {}: file not found at {}", asset.name, source.display());
                    report.missing.push(MissingAsset {
                        name: asset.name.clone(),
                        path: source,
                    });
                    continue;
                }

                match self.create_imageset(asset, &source) {
                    Ok(integrated) => {
                        println!("  + {}: {}/", asset.name, integrated.category);
                        report.integrated.push(integrated);
                    }
                    Err(e) => {
                        warn!(name = %asset.name, error = %e, "integration failed");
                        println!("  x {}: {}", asset.name, e);
                        report.failed.push((asset.name.clone(), e.to_string()));
                    }
                }
            }
        }

        println!(
            "\nIntegrated {}/{} assets into {}",
            report.integrated.len(),
            report.total,
            self.catalog_dir.display()
        );
        Ok(report)
    }

    /// Create (or refresh) the imageset folder for one asset
    pub fn create_imageset(
        &self,
        asset: &AssetDescriptor,
        source: &Path,
    ) -> Result<IntegratedAsset> {
        let category = asset.asset_type.category_folder();
        let imageset_path = self
            .catalog_dir
            .join(category)
            .join(format!("{}.imageset", asset.name));
        std::fs::create_dir_all(&imageset_path)?;

        let filename = format!("{}.png", asset.name);
        let dest = imageset_path.join(&filename);
        std::fs::copy(source, &dest)?;

        ImagesetContents::for_image(&filename).write_to(&imageset_path)?;

        let content_hash = ContentHash::from_file(&dest)?;

        Ok(IntegratedAsset {
            name: asset.name.clone(),
            category,
            imageset_path,
            content_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetType;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spriteforge_integrate_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_reported_not_fatal() {
        let root = temp_dir();
        std::fs::create_dir_all(root.join("Assets.xcassets")).unwrap();
        std::fs::create_dir_all(root.join("GeneratedAssets/objects")).unwrap();
        std::fs::write(root.join("GeneratedAssets/objects/Campfire.png"), b"fire").unwrap();

        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(
            AssetType::MapObject,
            "Obelisk",
            "GeneratedAssets/objects/Obelisk.png",
        ));
        manifest.push(AssetDescriptor::new(
            AssetType::MapObject,
            "Campfire",
            "GeneratedAssets/objects/Campfire.png",
        ));

        let integrator = CatalogIntegrator::new(&root, "Assets.xcassets");
        let report = integrator.integrate(&manifest).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.integrated.len(), 1);
        assert_eq!(report.integrated[0].name, "Campfire");
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].name, "Obelisk");
        assert!(report.failed.is_empty());

        let imageset = root.join("Assets.xcassets/MapObjects/Campfire.imageset");
        assert_eq!(std::fs::read(imageset.join("Campfire.png")).unwrap(), b"fire");
        assert!(imageset.join("Contents.json").exists());
        assert!(!root.join("Assets.xcassets/MapObjects/Obelisk.imageset").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_contents_json_lists_scales() {
        let root = temp_dir();
        std::fs::create_dir_all(root.join("Assets.xcassets")).unwrap();
        let source = root.join("Tariq.png");
        std::fs::write(&source, b"tariq").unwrap();

        let integrator = CatalogIntegrator::new(&root, "Assets.xcassets");
        let asset = AssetDescriptor::new(AssetType::Character, "Tariq", &source);
        let integrated = integrator.create_imageset(&asset, &source).unwrap();

        assert_eq!(integrated.category, "Characters");
        assert_eq!(integrated.content_hash, ContentHash::from_bytes(b"tariq"));

        let contents: ImagesetContents = serde_json::from_str(
            &std::fs::read_to_string(integrated.imageset_path.join("Contents.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(contents, ImagesetContents::for_image("Tariq.png"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let root = temp_dir();
        let integrator = CatalogIntegrator::new(&root, "Assets.xcassets");
        let result = integrator.integrate(&AssetManifest::new());
        assert!(matches!(result, Err(SpriteError::CatalogError(_))));
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_unknown_type_goes_to_generated() {
        let root = temp_dir();
        std::fs::create_dir_all(root.join("Assets.xcassets")).unwrap();
        std::fs::write(root.join("swirl.png"), b"swirl").unwrap();

        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(AssetType::Other, "SandSwirl", "swirl.png"));

        let report = CatalogIntegrator::new(&root, "Assets.xcassets")
            .integrate(&manifest)
            .unwrap();
        assert_eq!(report.integrated[0].category, "Generated");
        assert!(root
            .join("Assets.xcassets/Generated/SandSwirl.imageset/SandSwirl.png")
            .exists());

        std::fs::remove_dir_all(&root).ok();
    }
}
