//! Image Resizer - keeps uploaded images in text surfaces at a fixed width
//!
//! Markdown image references to uploaded images are rewritten into sized
//! `<img>` tags, and existing tags for the same uploads have their width
//! normalized. The sync engine follows the Elm Architecture: page signals
//! arrive as [`Msg`]s, [`update`](update::update) changes the [`SyncModel`]
//! and returns [`Cmd`]s, and a [`Runtime`] performs them against a host.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod host;
pub mod messages;
pub mod model;
pub mod preferences;
pub mod runtime;
pub mod tracing;
pub mod transform;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::ResizerConfig;
pub use messages::Msg;
pub use model::SyncModel;
pub use runtime::Runtime;
pub use transform::{transform, TransformOutcome};
