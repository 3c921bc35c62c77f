//! SpriteForge Catalog - manifest bookkeeping and asset catalog output
//!
//! Generated sprites are recorded in an [`AssetManifest`]. The
//! [`CatalogIntegrator`] copies them into an `Assets.xcassets`-style tree of
//! imagesets, and [`guide`] renders a Markdown lookup reference.

pub mod guide;
pub mod imageset;
pub mod integrate;
pub mod manifest;
pub mod types;

pub use guide::{guide_path_for, render_reference_guide, write_reference_guide};
pub use imageset::ImagesetContents;
pub use integrate::{CatalogIntegrator, IntegrationReport};
pub use manifest::{AssetDescriptor, AssetManifest, MANIFEST_FILE};
pub use types::AssetType;
