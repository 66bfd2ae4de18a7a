//! CLI interface for labgate

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labgate")]
#[command(version = "1.0.0")]
#[command(about = "Session authentication and lab progress gateway", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new labgate.toml configuration file
    Init,

    /// Run the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Path to the configuration file (defaults to upward search)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
