//! docstage CLI - stages scenario docs and builds them with MkDocs.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod pipeline;

use config::AppConfig;
use pipeline::RunOptions;

#[derive(Parser)]
#[command(name = "docstage")]
#[command(about = "Stage scenario documentation and build it with MkDocs")]
#[command(version)]
pub struct Cli {
    /// Scenario tags to publish (all scenarios when omitted); unknown words
    /// are ignored
    #[arg(allow_hyphen_values = true)]
    tags: Vec<String>,

    /// Path to docstage.toml config file (defaults to <root>/docstage.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Working root holding mkdocs.yml and the staging directory
    /// (defaults to the executable's directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Do not wait for Enter before cleaning up
    #[arg(long)]
    no_pause: bool,

    /// Leave the staging directory in place after the build
    #[arg(long)]
    keep_staging: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let root = match cli.root {
        Some(root) => root,
        None => config::executable_dir()?,
    };
    let file_config = config::load_config(cli.config.as_deref(), &root)?;
    let app = AppConfig::resolve(file_config, root)?;

    let options = RunOptions {
        selectors: cli.tags,
        pause: !cli.no_pause,
        keep_staging: cli.keep_staging,
    };

    pipeline::run(&app, &options).await
}
