use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use tracing::{info, instrument};

use maplift_core::{resolve_env, LogSink, StagingArea, UploadRequest};

use crate::tool::{run_tool, sentry_cli_path, ToolError};

const ERROR_PREFIX: &str = "Error uploading sourcemaps to Sentry";

const NO_CONFIG_LINE: &str =
    "No config found in maplift.toml, falling back to environment variables...";

const CONFIG_HELP_LINE: &str = "Verify that your Sentry configuration in maplift.toml is correct \
     and refer to https://docs.sentry.io/product/cli/releases/";

/// How an upload run ended. Staging and other filesystem problems surface
/// as errors instead; a `Failed` outcome means sentry-cli itself failed and
/// the translated message has already been delivered to the log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Completed,
    Failed { message: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Uploads the staged bundles and source maps as a Sentry release.
///
/// Stages the four artifacts in a scratch directory, then runs sentry-cli
/// twice: once to create the release named by the manifest's revision id,
/// once to upload the staged files as that release's source maps. Tool
/// stdout and any translated failure go through `log`; the scratch
/// directory is removed on every exit path.
#[instrument(skip(request, log), fields(release = %request.ios_manifest.revision_id))]
pub fn run(request: &UploadRequest, log: &dyn LogSink) -> Result<UploadOutcome> {
    let version = request.ios_manifest.revision_id.as_str();

    let staging = StagingArea::create(&request.project_root)?;
    staging.write_artifacts(&request.artifacts)?;

    if request.config.is_none() {
        log.line(NO_CONFIG_LINE);
    }

    let ambient: HashMap<String, String> = std::env::vars().collect();
    let env = resolve_env(request.config.as_ref(), &ambient);
    let binary = sentry_cli_path(request.config.as_ref(), &request.project_root);

    info!("uploading sourcemaps for release {}", version);

    match invoke(&binary, version, staging.path(), &env, log) {
        Ok(()) => Ok(UploadOutcome::Completed),
        Err(err) => {
            let message = message_for_error(&err);
            log.line(&message);
            log.line(CONFIG_HELP_LINE);
            Ok(UploadOutcome::Failed { message })
        }
    }
}

/// The two sentry-cli invocations, strictly sequential: the upload assumes
/// the release created by the first call exists, so a create failure stops
/// the flow before any upload is attempted.
fn invoke(
    binary: &Path,
    version: &str,
    staging_dir: &Path,
    env: &HashMap<String, String>,
    log: &dyn LogSink,
) -> Result<(), ToolError> {
    let created = run_tool(binary, &["releases", "new", version], staging_dir, env)?;
    log.line(&created);

    let uploaded = run_tool(
        binary,
        &[
            "releases",
            "files",
            version,
            "upload-sourcemaps",
            ".",
            "--ext",
            "bundle",
            "--ext",
            "map",
            "--rewrite",
        ],
        staging_dir,
        env,
    )?;
    log.line(&uploaded);

    Ok(())
}

fn message_for_error(err: &ToolError) -> String {
    translate_failure(err.stderr(), &err.to_string())
}

/// Builds the single user-visible error line: captured stderr (trimmed)
/// when present, else the failure's own description, with sentry-cli's
/// `error: ` prefix stripped.
fn translate_failure(stderr: Option<&str>, description: &str) -> String {
    let raw = stderr.map(str::trim).unwrap_or(description);
    let message = raw.strip_prefix("error: ").unwrap_or(raw);

    if message.is_empty() {
        ERROR_PREFIX.to_string()
    } else {
        format!("{ERROR_PREFIX}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    use maplift_core::{BuildArtifacts, Manifest, SentryConfig};

    struct Collected {
        lines: Mutex<Vec<String>>,
    }

    impl Collected {
        fn new() -> Self {
            Self {
                lines: Mutex::new(Vec::new()),
            }
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl LogSink for Collected {
        fn line(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    /// Installs a fake sentry-cli at the bundled location under `root`.
    fn install_fake_cli(root: &Path, body: &str) -> PathBuf {
        let bin_dir = root.join("node_modules/@sentry/cli/bin");
        fs::create_dir_all(&bin_dir).unwrap();

        let path = bin_dir.join("sentry-cli");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();

        path
    }

    fn request(root: &TempDir, config: Option<SentryConfig>) -> UploadRequest {
        UploadRequest {
            project_root: root.path().to_path_buf(),
            artifacts: BuildArtifacts {
                ios_bundle: "var ios=1;".to_string(),
                android_bundle: "var android=1;".to_string(),
                ios_source_map: "{\"version\":3}".to_string(),
                android_source_map: "{\"version\":3}".to_string(),
            },
            ios_manifest: Manifest {
                revision_id: "rev-4f2a91c".to_string(),
            },
            config,
        }
    }

    fn bundled_config() -> SentryConfig {
        SentryConfig {
            organization: Some("acme".to_string()),
            project: Some("mobile-app".to_string()),
            auth_token: Some("secret".to_string()),
            url: None,
            use_global_sentry_cli: false,
        }
    }

    fn staging_leftovers(root: &Path) -> usize {
        match fs::read_dir(root.join(".tmp")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    #[test]
    fn runs_both_invocations_with_verbatim_version() {
        let root = tempfile::tempdir().unwrap();
        let record = root.path().join("args.log");

        // The mock asserts it runs inside the staging area before recording
        // its argv.
        install_fake_cli(
            root.path(),
            &format!(
                "[ -f main.ios.bundle ] || exit 9\n\
                 printf '%s\\n' \"$*\" >> {}\n\
                 echo done",
                record.display()
            ),
        );

        let sink = Collected::new();
        let outcome = run(&request(&root, Some(bundled_config())), &sink).unwrap();

        assert_eq!(outcome, UploadOutcome::Completed);

        let recorded = fs::read_to_string(&record).unwrap();
        let calls: Vec<&str> = recorded.lines().collect();
        assert_eq!(
            calls,
            vec![
                "releases new rev-4f2a91c",
                "releases files rev-4f2a91c upload-sourcemaps . --ext bundle --ext map --rewrite",
            ]
        );

        assert_eq!(sink.lines(), vec!["done\n", "done\n"]);
        assert_eq!(staging_leftovers(root.path()), 0);
    }

    #[test]
    fn create_failure_skips_upload_and_logs_translated_message() {
        let root = tempfile::tempdir().unwrap();
        let record = root.path().join("args.log");

        install_fake_cli(
            root.path(),
            &format!(
                "printf '%s\\n' \"$*\" >> {}\n\
                 if [ \"$2\" = \"new\" ]; then\n\
                   printf 'error: invalid org slug\\n' >&2\n\
                   exit 1\n\
                 fi\n\
                 echo ok",
                record.display()
            ),
        );

        let sink = Collected::new();
        let outcome = run(&request(&root, Some(bundled_config())), &sink).unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Failed {
                message: "Error uploading sourcemaps to Sentry: invalid org slug".to_string()
            }
        );

        // Only the create call may have run.
        let recorded = fs::read_to_string(&record).unwrap();
        assert_eq!(recorded.lines().count(), 1);

        let lines = sink.lines();
        assert_eq!(
            lines[0],
            "Error uploading sourcemaps to Sentry: invalid org slug"
        );
        assert!(lines[1].starts_with("Verify that your Sentry configuration"));
        assert_eq!(staging_leftovers(root.path()), 0);
    }

    #[test]
    fn spawn_failure_is_reported_through_the_sink() {
        // No fake cli installed, so the bundled path does not exist.
        let root = tempfile::tempdir().unwrap();

        let sink = Collected::new();
        let outcome = run(&request(&root, Some(bundled_config())), &sink).unwrap();

        let UploadOutcome::Failed { message } = outcome else {
            panic!("expected a failed outcome");
        };
        assert!(message.starts_with("Error uploading sourcemaps to Sentry: failed to spawn"));
        assert_eq!(staging_leftovers(root.path()), 0);
    }

    #[test]
    fn missing_config_logs_informational_line_first() {
        let root = tempfile::tempdir().unwrap();

        let sink = Collected::new();
        let outcome = run(&request(&root, None), &sink).unwrap();

        assert!(!outcome.is_success());
        let lines = sink.lines();
        assert_eq!(
            lines[0],
            "No config found in maplift.toml, falling back to environment variables..."
        );
    }

    #[test]
    fn translates_captured_stderr_and_strips_error_prefix() {
        let message = translate_failure(Some("error: invalid org slug\n"), "exited with 1");
        assert_eq!(
            message,
            "Error uploading sourcemaps to Sentry: invalid org slug"
        );
    }

    #[test]
    fn translates_description_when_no_stderr_was_captured() {
        let message = translate_failure(None, "spawn ENOENT");
        assert_eq!(message, "Error uploading sourcemaps to Sentry: spawn ENOENT");
    }

    #[test]
    fn translates_to_bare_prefix_when_nothing_is_available() {
        let message = translate_failure(None, "");
        assert_eq!(message, "Error uploading sourcemaps to Sentry");
    }
}
