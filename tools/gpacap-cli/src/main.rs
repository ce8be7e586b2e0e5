//! gpacap CLI: inspect the capture install and drive stream captures.
//!
//! Usage:
//!   gpacap check                 Report install location, modules, and monitor
//!   gpacap console [--api API]   Interactive capture console
//!   gpacap config [OPTIONS]      Show or update persisted settings

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gpacap_capture_engine::GraphicsApi;

mod commands;

#[derive(Parser)]
#[command(
    name = "gpacap",
    about = "Stream capture bootstrapper for Intel GPA",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the capture library install and companion monitor
    Check,

    /// Load the capture library and read console commands from stdin
    Console {
        /// Graphics API the host renderer reports
        #[arg(long, default_value = "d3d12")]
        api: GraphicsApi,
    },

    /// Show or update persisted settings
    Config {
        /// Capture library install directory
        #[arg(long)]
        library_path: Option<PathBuf>,

        /// Launch the monitor after a capture stops
        #[arg(long)]
        run_monitor_after_capture: Option<bool>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = gpacap_common::config::AppConfig::load().logging;
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    gpacap_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check => commands::check::run(),
        Commands::Console { api } => commands::console::run(api),
        Commands::Config {
            library_path,
            run_monitor_after_capture,
        } => commands::config::run(library_path, run_monitor_after_capture),
    }
}
