//! Constants used across the Maplift workspace.

/// The filename for Maplift's primary configuration.
pub const CONFIG_FILE: &str = "maplift.toml";

/// Staged artifact names, fixed by the sentry-cli upload conventions.
pub const IOS_BUNDLE_FILE: &str = "main.ios.bundle";
pub const ANDROID_BUNDLE_FILE: &str = "main.android.bundle";
pub const IOS_MAP_FILE: &str = "main.ios.map";
pub const ANDROID_MAP_FILE: &str = "main.android.map";

/// Environment variables read by sentry-cli.
pub const ENV_SENTRY_ORG: &str = "SENTRY_ORG";
pub const ENV_SENTRY_PROJECT: &str = "SENTRY_PROJECT";
pub const ENV_SENTRY_AUTH_TOKEN: &str = "SENTRY_AUTH_TOKEN";
pub const ENV_SENTRY_URL: &str = "SENTRY_URL";

/// Service URL used when neither configuration nor environment supplies one.
pub const DEFAULT_SENTRY_URL: &str = "https://sentry.io/";
