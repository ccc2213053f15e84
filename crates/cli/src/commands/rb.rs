//! rb command - Delete a bucket recursively
//!
//! Removes every object (or, on a versioning-enabled bucket, every
//! object version and delete marker) before deleting the bucket itself.

use clap::Args;
use serde::Serialize;

use slc_core::lifecycle;

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Delete a bucket with all objects and versions
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Name of the bucket to delete
    pub bucket: String,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    bucket: String,
    removed_entries: u64,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (_config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match lifecycle::delete_bucket(&store, &args.bucket).await {
        Ok(removed) => {
            if formatter.is_json() {
                formatter.json(&RbOutput {
                    bucket: args.bucket.clone(),
                    removed_entries: removed,
                });
            } else {
                let styled = formatter.style_name(&args.bucket);
                formatter.success(&format!(
                    "Bucket '{styled}' deleted ({removed} entries removed)."
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to delete bucket '{}': {}",
                args.bucket,
                render_error(&e)
            ));
            ExitCode::from(&e)
        }
    }
}
