//! get command - Download an object, optionally a specific version
//!
//! Parameters omitted on the command line fall back to the `[download]`
//! section of the config file. Without a destination, a plain get
//! fetches and discards the body (a reachability check); a versioned get
//! defaults its destination to the object key.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use slc_core::{Config, Error, transfer};

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download an object
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Bucket to download from (defaults to `[download]` bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object key (defaults to `[download]` object)
    #[arg(long)]
    pub key: Option<String>,

    /// Version id to fetch instead of the current version
    /// (defaults to `[download]` version_id)
    #[arg(long)]
    pub version_id: Option<String>,

    /// Destination file (defaults to `[download]` file)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    bucket: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    size_bytes: u64,
}

struct GetRequest {
    bucket: String,
    key: String,
    version_id: Option<String>,
    output: Option<PathBuf>,
}

fn resolve(args: &GetArgs, config: &Config) -> Result<GetRequest, Error> {
    let download = config.download.as_ref();

    let bucket = args
        .bucket
        .clone()
        .or_else(|| download.map(|d| d.bucket.clone()))
        .ok_or_else(|| {
            Error::Config("no download bucket; pass --bucket or set [download] bucket".to_string())
        })?;
    let key = args
        .key
        .clone()
        .or_else(|| download.map(|d| d.object.clone()))
        .ok_or_else(|| {
            Error::Config("no object key; pass --key or set [download] object".to_string())
        })?;
    let version_id = args
        .version_id
        .clone()
        .or_else(|| download.and_then(|d| d.version_id.clone()));
    let output = args
        .output
        .clone()
        .or_else(|| download.and_then(|d| d.file.clone()));

    Ok(GetRequest {
        bucket,
        key,
        version_id,
        output,
    })
}

/// Execute the get command
pub async fn execute(args: GetArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = match resolve(&args, &config) {
        Ok(r) => r,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::ConfigError;
        }
    };
    let GetRequest {
        bucket,
        key,
        version_id,
        output,
    } = request;

    let result = match &version_id {
        Some(version) => {
            // A versioned download is always stored; the object key is
            // the destination when none is given.
            let dest = output.clone().unwrap_or_else(|| PathBuf::from(&key));
            transfer::get_object_version(&store, &bucket, &key, version, &dest)
                .await
                .map(|size| (size, Some(dest)))
        }
        None => transfer::get_object(&store, &bucket, &key, output.as_deref())
            .await
            .map(|size| (size, output.clone())),
    };

    match result {
        Ok((size_bytes, dest)) => {
            if formatter.is_json() {
                formatter.json(&GetOutput {
                    bucket,
                    key,
                    version_id,
                    file: dest.map(|d| d.display().to_string()),
                    size_bytes,
                });
            } else {
                let size = humansize::format_size(size_bytes, humansize::BINARY);
                match dest {
                    Some(d) => formatter.success(&format!(
                        "Downloaded '{}/{}' to '{}' ({}).",
                        formatter.style_name(&bucket),
                        key,
                        d.display(),
                        formatter.style_size(&size)
                    )),
                    None => formatter.success(&format!(
                        "Fetched '{}/{}' ({}), nothing stored.",
                        formatter.style_name(&bucket),
                        key,
                        formatter.style_size(&size)
                    )),
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            let what = match &version_id {
                Some(v) => format!("version '{v}' of '{bucket}/{key}'"),
                None => format!("'{bucket}/{key}'"),
            };
            formatter.error(&format!("Failed to download {what}: {}", render_error(&e)));
            ExitCode::from(&e)
        }
    }
}
