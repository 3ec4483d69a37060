//! Core data model and resolution logic for the Maplift workspace.
//!
//! This crate defines the upload request, Sentry configuration, child
//! environment resolution, the staging area for artifacts, and the log
//! sink used to surface progress to callers.

pub mod config;
pub mod constants;
pub mod log;
pub mod manifest;
pub mod request;
pub mod staging;

pub use config::{resolve_env, MapliftConfig, SentryConfig};
pub use log::LogSink;
pub use manifest::Manifest;
pub use request::{BuildArtifacts, UploadRequest};
pub use staging::StagingArea;
