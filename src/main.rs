//! CLI entry point for frozen-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frozen_blog::{commands, Blog};

#[derive(Parser)]
#[command(name = "frozen-blog")]
#[command(version)]
#[command(about = "Inspect the pages and posts of a static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List site information
    List {
        /// Type of content to list (post, page, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Load every collection once and report failures
    Check,

    /// Print every route of a frozen build with its output file
    Routes,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "frozen_blog=debug,info"
    } else {
        "frozen_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir, false)?;
            commands::list::run(&blog, &r#type)?;
        }

        Commands::Check => {
            let blog = Blog::new(&base_dir, false)?;
            commands::check::run(&blog)?;
        }

        Commands::Routes => {
            let blog = Blog::new(&base_dir, true)?;
            tracing::info!("Planning freeze into {:?}", blog.destination());
            commands::routes::run(&blog)?;
        }

        Commands::Version => {
            println!("frozen-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
