//! CLI entry point for blog-archive

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_archive::Blog;

#[derive(Parser)]
#[command(name = "blog-archive")]
#[command(version)]
#[command(about = "Build a Markdown blog with a year-grouped archive", long_about = None)]
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
    /// Build the site into the public directory
    #[command(alias = "b")]
    Build,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Publication date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove the public directory
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, tag, category, archive)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blog_archive=debug,info"
    } else {
        "blog_archive=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading the current directory")?,
    };

    match cli.command {
        Commands::Build => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Building {:?}", base_dir);
            let stats = blog.build()?;
            println!(
                "Built {} posts across {} years into {:?}",
                stats.posts, stats.years, blog.public_dir
            );
        }

        Commands::New { title, date } => {
            let blog = Blog::new(&base_dir)?;
            let path = blog.new_post(&title, date)?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir)?;
            blog_archive::commands::list::run(&blog, &r#type)?;
        }

        Commands::Version => {
            println!("blog-archive version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
