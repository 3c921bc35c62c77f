//! SpriteForge Gen - sprite generation against the PixelLab MCP API
//!
//! A linear, synchronous pipeline: build a JSON-RPC envelope, POST it through
//! a [`Transport`], decode the JSON or event-stream reply, poll long-running
//! character jobs, and write the returned images (inline base64, URL, or a
//! zipped bundle) to disk. [`batch`] drives a whole [`Roster`] and records
//! the results in an asset manifest.

pub mod batch;
pub mod client;
pub mod config;
pub mod decode;
pub mod job;
pub mod poll;
pub mod roster;
pub mod rpc;
pub mod status;
pub mod tools;
pub mod transport;
pub mod validate;
pub mod writer;

pub use batch::{BatchGenerator, BatchReport, Section};
pub use client::PixelLabClient;
pub use config::SpriteConfig;
pub use job::{JobStatus, JobStore, RemoteJob};
pub use poll::{download_when_ready, poll_job, PollConfig, PollOutcome};
pub use roster::Roster;
pub use rpc::{ImageSource, RpcRequest};
pub use status::{JobState, StatusMarkers};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use writer::{
    bundle_default_frame, check_asset_name, AssetWriter, SavedDownload, WrittenAsset,
};
