//! rm command - Delete a single object or object version

use clap::Args;
use serde::Serialize;

use slc_core::lifecycle;

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Delete an object, or one version of it
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Bucket holding the object
    pub bucket: String,

    /// Object key to delete
    pub key: String,

    /// Delete this specific version instead of the current object;
    /// requires a versioning-enabled bucket
    #[arg(long)]
    pub version_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    bucket: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<String>,
    deleted: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (_config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = match &args.version_id {
        Some(version) => {
            lifecycle::delete_object_version(&store, &args.bucket, &args.key, version).await
        }
        None => lifecycle::delete_object(&store, &args.bucket, &args.key)
            .await
            .map(|()| true),
    };

    match result {
        Ok(deleted) => {
            if formatter.is_json() {
                formatter.json(&RmOutput {
                    bucket: args.bucket.clone(),
                    key: args.key.clone(),
                    version_id: args.version_id.clone(),
                    deleted,
                });
            } else if deleted {
                match &args.version_id {
                    Some(v) => formatter.success(&format!(
                        "Deleted version '{v}' of '{}/{}'.",
                        formatter.style_name(&args.bucket),
                        args.key
                    )),
                    None => formatter.success(&format!(
                        "Deleted '{}/{}'.",
                        formatter.style_name(&args.bucket),
                        args.key
                    )),
                }
            } else {
                formatter.warning(&format!(
                    "Bucket '{}' is not versioning-enabled; nothing deleted.",
                    args.bucket
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to delete '{}/{}': {}",
                args.bucket,
                args.key,
                render_error(&e)
            ));
            ExitCode::from(&e)
        }
    }
}
