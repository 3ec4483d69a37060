use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use maplift_core::{BuildArtifacts, Manifest, MapliftConfig, SentryConfig, UploadRequest};
use maplift_sentry::UploadOutcome;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod styles;

use styles as s;

/// The command-line interface for Maplift.
#[derive(Debug, Parser)]
#[command(name = "maplift")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Upload bundles and source maps to a Sentry release")]
#[command(
    long_about = "Maplift stages a build's bundles and source maps, then drives sentry-cli to
create a release named after the build manifest's revision id and attach the
staged files to it. Sentry credentials come from maplift.toml or from the
SENTRY_* environment variables."
)]
struct Cli {
    /// Path to the iOS bundle.
    #[arg(long)]
    ios_bundle: PathBuf,
    /// Path to the Android bundle.
    #[arg(long)]
    android_bundle: PathBuf,
    /// Path to the iOS source map.
    #[arg(long)]
    ios_map: PathBuf,
    /// Path to the Android source map.
    #[arg(long)]
    android_map: PathBuf,
    /// Path to the iOS build manifest (JSON with a revisionId field).
    #[arg(long)]
    ios_manifest: String,
    /// Path to Maplift config file.
    #[arg(long, default_value = "maplift.toml")]
    config: String,
    /// Project root; the bundled sentry-cli and the scratch directory
    /// resolve against it.
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let request = UploadRequest {
        project_root: cli.project_root.clone(),
        artifacts: BuildArtifacts {
            ios_bundle: read_artifact(&cli.ios_bundle)?,
            android_bundle: read_artifact(&cli.android_bundle)?,
            ios_source_map: read_artifact(&cli.ios_map)?,
            android_source_map: read_artifact(&cli.android_map)?,
        },
        ios_manifest: Manifest::load_from_file(&cli.ios_manifest)?,
        config: load_optional_config(&cli.config)?,
    };

    let sink = |message: &str| println!("{message}");
    match maplift_sentry::run(&request, &sink)? {
        UploadOutcome::Completed => Ok(()),
        UploadOutcome::Failed { .. } => bail!("sourcemap upload failed"),
    }
}

/// Loads the Sentry section of the config file. A missing file is not an
/// error; the upload falls back to environment variables.
fn load_optional_config(path: &str) -> Result<Option<SentryConfig>> {
    if !Path::new(path).exists() {
        debug!("no config file at '{}'", path);
        return Ok(None);
    }

    let cfg = MapliftConfig::load_from_file(path)?;
    Ok(cfg.sentry)
}

fn read_artifact(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact '{}'", path.display()))
}
