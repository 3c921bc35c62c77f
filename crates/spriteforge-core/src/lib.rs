//! SpriteForge Core - shared types for the SpriteForge workspace
//!
//! - `SpriteError` and the `Result` alias used by every crate
//! - `ContentHash` for recording what was written to disk

mod error;
mod hash;

pub use error::{Result, SpriteError};
pub use hash::ContentHash;
