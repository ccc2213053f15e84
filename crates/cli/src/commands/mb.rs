//! mb command - Create a bucket
//!
//! Creation is idempotent: an existing bucket is reported, not treated
//! as an error.

use clap::Args;
use serde::Serialize;

use slc_core::lifecycle;

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a bucket
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Name of the bucket to create
    pub bucket: String,

    /// Enable versioning on the new bucket (in addition to the
    /// `[bucket]` config default)
    #[arg(long)]
    pub versioning: bool,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    bucket: String,
    versioning: bool,
    created: bool,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let versioning = args.versioning || config.bucket.versioning;

    match lifecycle::create_bucket(&store, &args.bucket, versioning).await {
        Ok(created) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    bucket: args.bucket.clone(),
                    versioning,
                    created,
                });
            } else if created {
                let styled = formatter.style_name(&args.bucket);
                formatter.success(&format!("Bucket '{styled}' created."));
            } else {
                formatter.println(&format!("Bucket '{}' already exists.", args.bucket));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to create bucket '{}': {}",
                args.bucket,
                render_error(&e)
            ));
            ExitCode::from(&e)
        }
    }
}
