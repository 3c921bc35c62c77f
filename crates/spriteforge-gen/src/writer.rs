//! Writing generated images to disk
//!
//! Images arrive either inline (base64) or as a URL to fetch. Character
//! bundles arrive as zip archives and are unpacked next to the archive.

use crate::rpc::{self, ImageSource};
use crate::transport::Transport;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;
use spriteforge_catalog::{AssetDescriptor, AssetManifest, AssetType};
use spriteforge_core::{ContentHash, Result, SpriteError};
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Frame a character bundle is represented by in the catalog
pub const BUNDLE_DEFAULT_FRAME: &str = "rotations/south.png";

/// A file written by the writer
#[derive(Debug, Clone)]
pub struct WrittenAsset {
    pub path: PathBuf,
    pub bytes: usize,
    pub content_hash: ContentHash,
}

/// Outcome of saving a downloaded job result
#[derive(Debug, Clone)]
pub enum SavedDownload {
    Image(WrittenAsset),
    Bundle {
        archive: WrittenAsset,
        extracted_to: PathBuf,
        files: usize,
    },
}

impl SavedDownload {
    /// The image file, or the directory the bundle was extracted to
    pub fn primary_path(&self) -> &Path {
        match self {
            SavedDownload::Image(asset) => &asset.path,
            SavedDownload::Bundle { extracted_to, .. } => extracted_to,
        }
    }

    /// A single image to stand for this download in the manifest
    pub fn sprite_path(&self) -> Option<PathBuf> {
        match self {
            SavedDownload::Image(asset) => Some(asset.path.clone()),
            SavedDownload::Bundle { extracted_to, .. } => bundle_default_frame(extracted_to),
        }
    }

    /// Add or refresh this download's entry in the manifest at `manifest_path`.
    /// Returns the recorded image, or `None` for a bundle with no PNG in it.
    pub fn record_in_manifest(
        &self,
        manifest_path: &Path,
        asset_type: AssetType,
        name: &str,
    ) -> Result<Option<PathBuf>> {
        let Some(sprite) = self.sprite_path() else {
            warn!(name, dir = %self.primary_path().display(), "bundle has no PNG to record");
            return Ok(None);
        };
        let mut manifest = AssetManifest::load_or_default(manifest_path)?;
        manifest.upsert(AssetDescriptor::new(asset_type, name, &sprite));
        manifest.save(manifest_path)?;
        info!(name, path = %sprite.display(), manifest = %manifest_path.display(), "recorded download");
        Ok(Some(sprite))
    }
}

/// The south-facing rotation of an extracted bundle, else its first PNG
pub fn bundle_default_frame(dir: &Path) -> Option<PathBuf> {
    let preferred = dir.join(BUNDLE_DEFAULT_FRAME);
    if preferred.is_file() {
        return Some(preferred);
    }
    first_png(dir)
}

fn first_png(dir: &Path) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in &entries {
        let is_png = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if path.is_file() && is_png {
            return Some(path.clone());
        }
    }
    entries
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|path| first_png(path))
}

/// Reject asset names that are empty, absolute, or contain path separators
pub fn check_asset_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name == "."
        || name == ".."
        || Path::new(name).is_absolute();
    if invalid {
        return Err(SpriteError::ValidationError(format!(
            "invalid asset name '{}': must be a plain file name",
            name
        )));
    }
    Ok(())
}

/// Relative paths made only of plain components stay under the output directory
fn check_relative_path(relative_path: &str) -> Result<()> {
    let path = Path::new(relative_path);
    let plain = path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !plain || relative_path.contains('\\') {
        return Err(SpriteError::ValidationError(format!(
            "refusing to write outside the output directory: {}",
            relative_path
        )));
    }
    Ok(())
}

pub struct AssetWriter<T: Transport> {
    transport: T,
    output_dir: PathBuf,
}

impl<T: Transport> AssetWriter<T> {
    pub fn new<P: AsRef<Path>>(transport: T, output_dir: P) -> Self {
        Self {
            transport,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write bytes under the output directory, creating parents
    pub fn write_bytes(&self, bytes: &[u8], relative_path: &str) -> Result<WrittenAsset> {
        check_relative_path(relative_path)?;
        let path = self.output_dir.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote file");

        Ok(WrittenAsset {
            path,
            bytes: bytes.len(),
            content_hash: ContentHash::from_bytes(bytes),
        })
    }

    /// Resolve an image source to bytes and write them
    pub fn write_source(&self, source: &ImageSource, relative_path: &str) -> Result<WrittenAsset> {
        let bytes = match source {
            ImageSource::Inline(data) => decode_inline(data)?,
            ImageSource::Url(url) => self.transport.get_bytes(url)?,
        };
        self.write_bytes(&bytes, relative_path)
    }

    /// Save the image carried by a decoded tool response
    pub fn save_response(&self, response: &Value, relative_path: &str) -> Result<WrittenAsset> {
        let source = rpc::image_source(response).ok_or_else(|| {
            let result = rpc::result_of(response).cloned().unwrap_or(Value::Null);
            SpriteError::UnexpectedResponse(format!(
                "no image_data, image_url or image content in result: {}",
                result
            ))
        })?;
        self.write_source(&source, relative_path)
    }

    /// Keep a raw response next to the assets for later inspection
    pub fn save_raw_response(&self, response: &Value, relative_path: &str) -> Result<PathBuf> {
        let pretty = serde_json::to_string_pretty(response)?;
        Ok(self.write_bytes(pretty.as_bytes(), relative_path)?.path)
    }

    /// Fetch a finished job's result into `<subdir>/`.
    ///
    /// A zip payload is kept as `<name>.zip` and extracted to `<name>/`;
    /// anything else is written as `<name>.png`.
    pub fn save_download(&self, url: &str, name: &str, subdir: &str) -> Result<SavedDownload> {
        check_asset_name(name)?;
        check_relative_path(subdir)?;
        let bytes = self.transport.get_bytes(url)?;
        info!(url, bytes = bytes.len(), "downloaded job result");

        if is_zip(&bytes) {
            let archive = self.write_bytes(&bytes, &format!("{}/{}.zip", subdir, name))?;
            let extracted_to = self.output_dir.join(subdir).join(name);
            let files = extract_bundle(&bytes, &extracted_to)?;
            Ok(SavedDownload::Bundle {
                archive,
                extracted_to,
                files,
            })
        } else {
            let image = self.write_bytes(&bytes, &format!("{}/{}.png", subdir, name))?;
            Ok(SavedDownload::Image(image))
        }
    }
}

/// Base64 payload, tolerating a `data:<mime>;base64,` prefix
fn decode_inline(data: &str) -> Result<Vec<u8>> {
    let payload = match data.strip_prefix("data:") {
        Some(uri) => uri.split_once(',').map(|(_, b64)| b64).unwrap_or(uri),
        None => data,
    };
    BASE64
        .decode(payload.trim())
        .map_err(|e| SpriteError::DecodeError(format!("invalid base64 image data: {}", e)))
}

pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC)
}

/// Extract a zip archive into `dest`, replacing whatever was there.
/// Returns the number of files written. Entries whose paths would escape
/// `dest` are skipped.
pub fn extract_bundle(bytes: &[u8], dest: &Path) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SpriteError::ArchiveError(format!("Failed to read zip: {}", e)))?;

    if dest.exists() {
        std::fs::remove_dir_all(dest)?;
    }
    std::fs::create_dir_all(dest)?;

    let mut files = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| SpriteError::ArchiveError(format!("Failed to read zip entry: {}", e)))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping zip entry outside target directory");
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
        files += 1;
    }

    info!(dest = %dest.display(), files, "extracted bundle");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;
    use std::io::Write;

    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRfake-sprite";

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spriteforge_writer_test_{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn zip_of(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_inline_and_url_produce_identical_files() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        transport.serve_download("https://cdn.example/scarab.png", PNG_BYTES);
        let writer = AssetWriter::new(&transport, &dir);

        let inline = json!({"result": {"image_data": BASE64.encode(PNG_BYTES)}});
        let by_url = json!({"result": {"image_url": "https://cdn.example/scarab.png"}});

        let a = writer.save_response(&inline, "characters/inline.png").unwrap();
        let b = writer.save_response(&by_url, "characters/url.png").unwrap();

        let bytes_a = std::fs::read(&a.path).unwrap();
        let bytes_b = std::fs::read(&b.path).unwrap();
        assert_eq!(bytes_a, PNG_BYTES);
        assert_eq!(bytes_a, bytes_b);
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(transport.fetched(), vec!["https://cdn.example/scarab.png"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_content_item_data_uri() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        let writer = AssetWriter::new(&transport, &dir);

        let response = json!({"result": {"content": [{
            "type": "image",
            "data": format!("data:image/png;base64,{}", BASE64.encode(PNG_BYTES)),
            "mimeType": "image/png"
        }]}});
        let written = writer.save_response(&response, "objects/Campfire.png").unwrap();

        assert_eq!(written.path, dir.join("objects/Campfire.png"));
        assert_eq!(std::fs::read(&written.path).unwrap(), PNG_BYTES);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unrecognized_response_fails() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        let writer = AssetWriter::new(&transport, &dir);

        let err = writer
            .save_response(&json!({"result": {"status": "ok"}}), "x.png")
            .unwrap_err();
        assert!(matches!(err, SpriteError::UnexpectedResponse(_)));
        assert!(!dir.join("x.png").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_download_fails() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        let writer = AssetWriter::new(&transport, &dir);

        let source = ImageSource::Url("https://cdn.example/missing.png".to_string());
        assert!(matches!(
            writer.write_source(&source, "missing.png"),
            Err(SpriteError::StatusError { code: 404, .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bundle_download_extracts_and_replaces() {
        let dir = temp_dir();
        let stale = dir.join("characters/Tariq/old.png");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"old").unwrap();

        let transport = MockTransport::new();
        let bundle = zip_of(&[
            ("rotations/south.png", PNG_BYTES),
            ("rotations/north.png", PNG_BYTES),
            ("metadata.json", b"{}"),
        ]);
        transport.serve_download("https://api.example/tariq.zip", &bundle);
        let writer = AssetWriter::new(&transport, &dir);

        let saved = writer
            .save_download("https://api.example/tariq.zip", "Tariq", "characters")
            .unwrap();

        match &saved {
            SavedDownload::Bundle {
                archive,
                extracted_to,
                files,
            } => {
                assert_eq!(*files, 3);
                assert_eq!(archive.path, dir.join("characters/Tariq.zip"));
                assert_eq!(extracted_to, &dir.join("characters/Tariq"));
            }
            other => panic!("expected bundle, got {:?}", other),
        }
        assert!(dir.join("characters/Tariq/rotations/south.png").exists());
        assert!(!stale.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_plain_download_written_as_png() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        transport.serve_download("https://api.example/omar.png", PNG_BYTES);
        let writer = AssetWriter::new(&transport, &dir);

        let saved = writer
            .save_download("https://api.example/omar.png", "Omar", "characters")
            .unwrap();
        assert_eq!(saved.primary_path(), dir.join("characters/Omar.png"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let dir = temp_dir();
        let err = extract_bundle(b"PK\x03\x04 not really a zip", &dir.join("out")).unwrap_err();
        assert!(matches!(err, SpriteError::ArchiveError(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_names_that_escape_output_dir_are_rejected() {
        let dir = temp_dir();
        let output = dir.join("out");
        let transport = MockTransport::new();
        transport.serve_download("https://api.example/x.png", PNG_BYTES);
        let writer = AssetWriter::new(&transport, &output);

        for name in ["../Tariq", "/tmp/Tariq", "rotations/Tariq", "..", ""] {
            let err = writer
                .save_download("https://api.example/x.png", name, "characters")
                .unwrap_err();
            assert!(matches!(err, SpriteError::ValidationError(_)), "{name:?}");
        }
        for path in ["../escaped.png", "/tmp/escaped.png", "characters/../../escaped.png"] {
            let err = writer.write_bytes(PNG_BYTES, path).unwrap_err();
            assert!(matches!(err, SpriteError::ValidationError(_)), "{path:?}");
        }

        assert!(transport.fetched().is_empty());
        assert!(!dir.join("escaped.png").exists());
        assert!(!dir.join("Tariq.png").exists());
        assert!(writer.write_bytes(PNG_BYTES, "characters/Tariq.png").is_ok());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bundle_default_frame_reaches_catalog() {
        use spriteforge_catalog::CatalogIntegrator;

        let dir = temp_dir();
        std::fs::create_dir_all(dir.join("Assets.xcassets")).unwrap();
        let south: &[u8] = b"\x89PNG\r\n\x1a\nsouth-frame";
        let transport = MockTransport::new();
        let bundle = zip_of(&[
            ("rotations/east.png", PNG_BYTES),
            ("rotations/south.png", south),
            ("metadata.json", b"{}"),
        ]);
        transport.serve_download("https://api.example/tariq.zip", &bundle);
        let writer = AssetWriter::new(&transport, dir.join("output"));
        let manifest_path = dir.join("output/asset_manifest.json");

        let mut manifest = AssetManifest::new();
        manifest.push(AssetDescriptor::new(AssetType::Character, "Tariq", "stale.png"));
        manifest.push(AssetDescriptor::new(AssetType::Enemy, "Scarab", "scarab.png"));
        manifest.save(&manifest_path).unwrap();

        let saved = writer
            .save_download("https://api.example/tariq.zip", "Tariq", "characters")
            .unwrap();
        let recorded = saved
            .record_in_manifest(&manifest_path, AssetType::Character, "Tariq")
            .unwrap()
            .unwrap();
        assert_eq!(recorded, dir.join("output/characters/Tariq/rotations/south.png"));

        let manifest = AssetManifest::load(&manifest_path).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries()[0].path, recorded.to_string_lossy());

        let report = CatalogIntegrator::new(&dir, "Assets.xcassets")
            .integrate(&manifest)
            .unwrap();
        assert_eq!(report.integrated.len(), 1);
        assert_eq!(report.missing.len(), 1);

        let imported = dir.join("Assets.xcassets/Characters/Tariq.imageset/Tariq.png");
        assert_eq!(std::fs::read(imported).unwrap(), south);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_bundle_not_recorded() {
        let dir = temp_dir();
        let transport = MockTransport::new();
        transport.serve_download(
            "https://api.example/empty.zip",
            &zip_of(&[("metadata.json", b"{}")]),
        );
        let writer = AssetWriter::new(&transport, &dir);
        let manifest_path = dir.join("asset_manifest.json");

        let saved = writer
            .save_download("https://api.example/empty.zip", "Omar", "characters")
            .unwrap();
        assert_eq!(
            saved
                .record_in_manifest(&manifest_path, AssetType::Character, "Omar")
                .unwrap(),
            None
        );
        assert!(!manifest_path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bundle_without_south_uses_first_png() {
        let dir = temp_dir();
        let extracted = dir.join("Omar");
        std::fs::create_dir_all(extracted.join("rotations")).unwrap();
        std::fs::write(extracted.join("metadata.json"), b"{}").unwrap();
        std::fs::write(extracted.join("rotations/west.png"), PNG_BYTES).unwrap();
        std::fs::write(extracted.join("rotations/east.png"), PNG_BYTES).unwrap();

        assert_eq!(
            bundle_default_frame(&extracted),
            Some(extracted.join("rotations/east.png"))
        );
        assert_eq!(bundle_default_frame(&dir.join("missing")), None);
        std::fs::remove_dir_all(&dir).ok();
    }
}
