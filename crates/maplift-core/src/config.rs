use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_SENTRY_URL, ENV_SENTRY_AUTH_TOKEN, ENV_SENTRY_ORG, ENV_SENTRY_PROJECT, ENV_SENTRY_URL,
};

#[derive(Debug, Deserialize)]
pub struct MapliftConfig {
    pub sentry: Option<SentryConfig>,
}

impl MapliftConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let cfg = toml::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse TOML config: {path}"))?;
        Ok(cfg)
    }
}

/// Sentry connection settings. Every field is optional; unset fields fall
/// back to the corresponding environment variable at resolution time.
#[derive(Debug, Clone, Deserialize)]
pub struct SentryConfig {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub auth_token: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub use_global_sentry_cli: bool,
}

/// Builds the complete child environment for the sentry-cli invocations.
///
/// `ambient` is an explicit snapshot of the process environment, taken once
/// by the caller; this function never reads global state itself. Per field
/// the explicit config value wins, then the ambient variable, then (URL
/// only) [`DEFAULT_SENTRY_URL`]. Organization, project, and auth token stay
/// unset when nothing supplies them, leaving sentry-cli's own fallbacks in
/// charge.
pub fn resolve_env(
    config: Option<&SentryConfig>,
    ambient: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut env = ambient.clone();

    let pick = |explicit: Option<&String>, name: &str| -> Option<String> {
        explicit.cloned().or_else(|| ambient.get(name).cloned())
    };

    let organization = pick(config.and_then(|c| c.organization.as_ref()), ENV_SENTRY_ORG);
    let project = pick(config.and_then(|c| c.project.as_ref()), ENV_SENTRY_PROJECT);
    let auth_token = pick(
        config.and_then(|c| c.auth_token.as_ref()),
        ENV_SENTRY_AUTH_TOKEN,
    );
    let url = pick(config.and_then(|c| c.url.as_ref()), ENV_SENTRY_URL)
        .unwrap_or_else(|| DEFAULT_SENTRY_URL.to_string());

    if let Some(value) = organization {
        env.insert(ENV_SENTRY_ORG.to_string(), value);
    }
    if let Some(value) = project {
        env.insert(ENV_SENTRY_PROJECT.to_string(), value);
    }
    if let Some(value) = auth_token {
        env.insert(ENV_SENTRY_AUTH_TOKEN.to_string(), value);
    }
    env.insert(ENV_SENTRY_URL.to_string(), url);

    env
}
