use std::path::PathBuf;

use crate::config::SentryConfig;
use crate::manifest::Manifest;

/// The four build outputs staged for upload, treated as opaque UTF-8 text.
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub ios_bundle: String,
    pub android_bundle: String,
    pub ios_source_map: String,
    pub android_source_map: String,
}

/// Everything the upload operation needs from its caller.
#[derive(Debug)]
pub struct UploadRequest {
    pub project_root: PathBuf,
    pub artifacts: BuildArtifacts,
    pub ios_manifest: Manifest,
    pub config: Option<SentryConfig>,
}
