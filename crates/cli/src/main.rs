//! slc - storage lifecycle client for S3-compatible object storage
//!
//! Creates and deletes buckets (versioning-aware), uploads and downloads
//! objects (optionally by version), and exports bucket inventories.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod exit_code;
mod output;

use commands::Globals;
use output::OutputConfig;

#[derive(Parser, Debug)]
#[command(name = "slc", version, about = "Storage lifecycle client for S3-compatible object storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Named environment from the config file
    #[arg(long, global = true, env = "SLC_ENV")]
    env: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit strict JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a bucket (no-op if it already exists)
    Mb(commands::mb::MbArgs),

    /// Delete a bucket with all objects and versions
    Rb(commands::rb::RbArgs),

    /// Upload a local file as an object
    Put(commands::put::PutArgs),

    /// Download an object, optionally a specific version
    Get(commands::get::GetArgs),

    /// Delete a single object or object version
    Rm(commands::rm::RmArgs),

    /// Export a bucket's object/version inventory to a file
    Inventory(commands::inventory::InventoryArgs),
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slc=info,slc_core=info,slc_s3=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing();
    tracing::debug!(command = ?cli.command, "dispatching command");

    let output_config = OutputConfig {
        json: cli.json,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };
    let globals = Globals {
        env: cli.env,
        config: cli.config,
    };

    let code = match cli.command {
        Commands::Mb(args) => commands::mb::execute(args, &globals, output_config).await,
        Commands::Rb(args) => commands::rb::execute(args, &globals, output_config).await,
        Commands::Put(args) => commands::put::execute(args, &globals, output_config).await,
        Commands::Get(args) => commands::get::execute(args, &globals, output_config).await,
        Commands::Rm(args) => commands::rm::execute(args, &globals, output_config).await,
        Commands::Inventory(args) => {
            commands::inventory::execute(args, &globals, output_config).await
        }
    };

    std::process::exit(code as i32);
}
