//! Handwave CLI: hand gestures from a webcam, served over WebSocket.
//!
//! Usage:
//!   handwave [serve] [OPTIONS]    Serve gesture events (default)
//!   handwave replay <FILE>        Interpret a landmark recording offline
//!   handwave check                Show configuration and capabilities

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use handwave_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "handwave",
    about = "Control a client app with hand gestures seen by your webcam",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve gesture events to WebSocket clients
    Serve(ServeArgs),

    /// Run the interpreter over a landmark recording and print events
    Replay {
        /// Path to a landmark stream (JSONL)
        path: PathBuf,

        /// Print only the summary, not every event
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show configuration and system capabilities
    Check {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write_config: bool,
    },
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Host to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(long)]
    port: Option<u16>,

    /// Zero-based camera index
    #[arg(long)]
    camera: Option<i32>,

    /// Run without the preview window
    #[arg(long)]
    no_preview: bool,

    /// Replay a landmark recording instead of using the camera
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Landmark process for live capture, e.g. "python3 hands.py"
    #[arg(long, value_name = "COMMAND")]
    detector: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    handwave_common::logging::init_logging_with_verbosity(&config.logging, cli.verbose);

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => commands::serve::run(config, args).await,
        Commands::Replay { path, quiet } => commands::replay::run(&config, &path, quiet),
        Commands::Check { write_config } => {
            commands::check::run(&config, cli.config.as_deref(), write_config)
        }
    }
}
