//! The sentry-cli boundary: running the external tool, translating its
//! failures, and the end-to-end sourcemap upload operation.

pub mod tool;
pub mod upload;

pub use tool::{run_tool, sentry_cli_path, ToolError};
pub use upload::{run, UploadOutcome};
