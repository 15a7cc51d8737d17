//! refgen CLI - Markdown API reference to static HTML generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "refgen")]
#[command(about = "Generate static HTML pages from Markdown API reference docs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to refgen.toml config file
    #[arg(short, long, default_value = "refgen.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and a sample document
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Convert every Markdown document into an HTML page
    Build {
        /// Markdown source directory (defaults to config or "docs/api-reference")
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to config or "docs/html/api-reference")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview generated pages
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the parent of the output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build { input, output } => {
            commands::build::run(&cli.config, input, output)?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
