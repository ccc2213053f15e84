//! Command implementations
//!
//! One module per subcommand. Commands share the connect helper below,
//! which loads the config file, resolves the selected environment, and
//! builds the storage client.

pub mod get;
pub mod inventory;
pub mod mb;
pub mod put;
pub mod rb;
pub mod rm;

use std::path::PathBuf;

use slc_core::{Config, Error};
use slc_s3::S3Store;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Global CLI options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    /// Selected environment name
    pub env: Option<String>,
    /// Explicit config file path
    pub config: Option<PathBuf>,
}

/// Load configuration and build the storage client for the selected
/// environment. Errors are reported through the formatter and returned
/// as the exit code the command should end with.
pub(crate) async fn connect(
    globals: &Globals,
    formatter: &Formatter,
) -> Result<(Config, S3Store), ExitCode> {
    let config = match Config::load(globals.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::ConfigError);
        }
    };

    let Some(env_name) = globals.env.as_deref() else {
        formatter.error("No environment selected; pass --env or set SLC_ENV");
        return Err(ExitCode::UsageError);
    };

    let env = match config.environment(env_name) {
        Ok(e) => e,
        Err(e) => {
            formatter.error(&e.to_string());
            return Err(ExitCode::ConfigError);
        }
    };

    let store = match S3Store::connect(env, config.retry).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&format!("Failed to create storage client: {e}"));
            return Err(ExitCode::from(&e));
        }
    };

    Ok((config, store))
}

/// Render an error with the remote detail (error code, request id) the
/// service attached, when available.
pub(crate) fn render_error(error: &Error) -> String {
    let mut text = error.to_string();
    if let Some(code) = error.code() {
        text.push_str(&format!(" [code: {code}]"));
    }
    if let Some(id) = error.request_id() {
        text.push_str(&format!(" [request id: {id}]"));
    }
    text
}
