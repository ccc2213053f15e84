//! inventory command - Export a bucket's object/version inventory
//!
//! Writes one `key;version_id` line per entry to a file, default
//! `Export_<bucket>.csv` in the working directory.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use slc_core::export;

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Export all objects and versions of a bucket to a file
#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Bucket to inventory
    pub bucket: String,

    /// Output file (default: Export_<bucket>.csv)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct InventoryOutput {
    bucket: String,
    file: String,
    entries: u64,
}

/// Execute the inventory command
pub async fn execute(
    args: InventoryArgs,
    globals: &Globals,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (_config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("Export_{}.csv", args.bucket)));

    match export::export_inventory(&store, &args.bucket, &output).await {
        Ok(entries) => {
            if formatter.is_json() {
                formatter.json(&InventoryOutput {
                    bucket: args.bucket.clone(),
                    file: output.display().to_string(),
                    entries,
                });
            } else {
                formatter.success(&format!(
                    "Exported {} entries from '{}' to '{}'.",
                    formatter.style_size(&entries.to_string()),
                    formatter.style_name(&args.bucket),
                    output.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to export inventory of '{}' to '{}': {} (partial file left in place)",
                args.bucket,
                output.display(),
                render_error(&e)
            ));
            ExitCode::from(&e)
        }
    }
}
