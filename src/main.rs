//! dynicon - headless host for runtime launcher-icon switching
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dynicon_app::config::init_config_dir;
use tracing::{error, info};

/// dynicon - switch launcher icons by toggling component enablement
#[derive(Parser, Debug)]
#[command(name = "dynicon")]
#[command(about = "Headless host for runtime launcher-icon switching", long_about = None)]
struct Args {
    /// Path to the host project (defaults to the current directory)
    #[arg(long, value_name = "PATH", global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Speak the plugin method channel as JSON lines on stdin/stdout
    Serve,

    /// Print the component table and the pending selection
    Status,

    /// Write a default .dynicon/config.toml and a sample manifest
    Init {
        /// Package namespace for the sample manifest
        #[arg(long, default_value = "com.example.app")]
        package: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Logs go to a file; stdout carries the host protocol
    dynicon_core::logging::init()?;

    let project_path = args
        .project
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    info!("Project path: {}", project_path.display());

    let result = match args.command {
        Command::Serve => dynamic_icon::run_host(&project_path).await,
        Command::Status => dynamic_icon::run_status(&project_path),
        Command::Init { package } => init_config_dir(&project_path, &package).map(|()| {
            eprintln!("Initialized dynicon in {}", project_path.display());
        }),
    };

    if let Err(ref e) = result {
        error!("Command failed: {:?}", e);
    }

    Ok(result?)
}
