use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

use maplift_core::SentryConfig;

/// Relative location of the npm-vendored sentry-cli binary.
const BUNDLED_CLI: &str = "node_modules/@sentry/cli/bin/sentry-cli";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}")]
    NonZeroExit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl ToolError {
    /// Captured error-stream text, when any non-blank text was produced.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Picks the sentry-cli executable: the bare command name (resolved via the
/// search path) when the global tool is requested, otherwise the bundled
/// copy under the project's node_modules.
pub fn sentry_cli_path(config: Option<&SentryConfig>, project_root: &Path) -> PathBuf {
    if config.is_some_and(|c| c.use_global_sentry_cli) {
        PathBuf::from("sentry-cli")
    } else {
        project_root.join(BUNDLED_CLI)
    }
}

/// Runs an external command with an explicit environment, waiting for it to
/// exit and capturing both output streams. Returns captured stdout as text;
/// a spawn failure or non-zero exit becomes a [`ToolError`].
///
/// The child sees exactly `env`, nothing inherited.
pub fn run_tool(
    program: &Path,
    args: &[&str],
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<String, ToolError> {
    debug!("running {} {:?} in {}", program.display(), args, cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .env_clear()
        .envs(env)
        .output()
        .map_err(|source| ToolError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::NonZeroExit {
            program: program.display().to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
