//! put command - Upload a local file as an object
//!
//! Parameters omitted on the command line fall back to the `[upload]`
//! section of the config file.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use slc_core::{Config, Error, transfer};

use crate::commands::{Globals, connect, render_error};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a local file to a bucket
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Bucket to upload into (defaults to `[upload]` bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object key (defaults to `[upload]` object)
    #[arg(long)]
    pub key: Option<String>,

    /// Local file to upload (defaults to `[upload]` file)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    bucket: String,
    key: String,
    etag: String,
    size_bytes: u64,
}

fn resolve(args: &PutArgs, config: &Config) -> Result<(String, String, PathBuf), Error> {
    let upload = config.upload.as_ref();

    let bucket = args
        .bucket
        .clone()
        .or_else(|| upload.map(|u| u.bucket.clone()))
        .ok_or_else(|| {
            Error::Config("no upload bucket; pass --bucket or set [upload] bucket".to_string())
        })?;
    let key = args
        .key
        .clone()
        .or_else(|| upload.map(|u| u.object.clone()))
        .ok_or_else(|| {
            Error::Config("no object key; pass --key or set [upload] object".to_string())
        })?;
    let file = args
        .file
        .clone()
        .or_else(|| upload.map(|u| u.file.clone()))
        .ok_or_else(|| {
            Error::Config("no source file; pass --file or set [upload] file".to_string())
        })?;

    Ok((bucket, key, file))
}

/// Execute the put command
pub async fn execute(args: PutArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (config, store) = match connect(globals, &formatter).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let (bucket, key, file) = match resolve(&args, &config) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::ConfigError;
        }
    };

    match transfer::put_object(&store, &bucket, &key, &file).await {
        Ok(receipt) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    bucket,
                    key,
                    etag: receipt.etag,
                    size_bytes: receipt.size_bytes,
                });
            } else {
                let size = humansize::format_size(receipt.size_bytes, humansize::BINARY);
                formatter.success(&format!(
                    "Uploaded '{}' to '{}/{}' ({}, etag {}).",
                    file.display(),
                    formatter.style_name(&bucket),
                    key,
                    formatter.style_size(&size),
                    receipt.etag
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to upload '{}' to '{bucket}/{key}': {}",
                file.display(),
                render_error(&e)
            ));
            ExitCode::from(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_upload() -> Config {
        Config {
            upload: Some(slc_core::config::UploadDefaults {
                bucket: "demo".to_string(),
                object: "report.pdf".to_string(),
                file: PathBuf::from("/tmp/report.pdf"),
            }),
            ..Config::default()
        }
    }

    #[test]
    fn test_resolve_prefers_flags_over_config() {
        let args = PutArgs {
            bucket: Some("other".to_string()),
            key: None,
            file: None,
        };
        let (bucket, key, file) = resolve(&args, &config_with_upload()).unwrap();
        assert_eq!(bucket, "other");
        assert_eq!(key, "report.pdf");
        assert_eq!(file, PathBuf::from("/tmp/report.pdf"));
    }

    #[test]
    fn test_resolve_without_config_section() {
        let args = PutArgs {
            bucket: Some("demo".to_string()),
            key: Some("k".to_string()),
            file: None,
        };
        let err = resolve(&args, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("--file"));
    }
}
