use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::debug;

use crate::constants::{ANDROID_BUNDLE_FILE, ANDROID_MAP_FILE, IOS_BUNDLE_FILE, IOS_MAP_FILE};
use crate::request::BuildArtifacts;

/// An ephemeral directory holding the four files sentry-cli will read.
///
/// Each invocation gets its own uniquely-suffixed directory under
/// `<project_root>/.tmp`, so concurrent uploads against the same project
/// root cannot corrupt each other. The directory is removed when the
/// `StagingArea` is dropped, on every exit path.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn create(project_root: &Path) -> Result<Self> {
        let base = project_root.join(".tmp");
        fs::create_dir_all(&base)
            .with_context(|| format!("failed to create scratch root '{}'", base.display()))?;

        let dir = tempfile::Builder::new()
            .prefix("sentry-")
            .tempdir_in(&base)
            .with_context(|| format!("failed to create staging dir under '{}'", base.display()))?;

        debug!("staging area created at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Materializes the four artifacts under their fixed names.
    pub fn write_artifacts(&self, artifacts: &BuildArtifacts) -> Result<()> {
        let files = [
            (IOS_BUNDLE_FILE, &artifacts.ios_bundle),
            (ANDROID_BUNDLE_FILE, &artifacts.android_bundle),
            (IOS_MAP_FILE, &artifacts.ios_source_map),
            (ANDROID_MAP_FILE, &artifacts.android_source_map),
        ];

        for (name, contents) in files {
            let path = self.path().join(name);
            fs::write(&path, contents)
                .with_context(|| format!("failed to stage '{}'", path.display()))?;
            debug!("staged {} ({} bytes)", name, contents.len());
        }

        Ok(())
    }
}
