//! CLI entry point for notion-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notion-blog")]
#[command(version)]
#[command(about = "Render a static blog from a Notion database", long_about = None)]
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
    /// Initialize a new blog directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Fetch published posts and generate static files
    #[command(alias = "g")]
    Generate,

    /// List published posts
    List,

    /// Generate, then serve the site locally
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Delete the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "notion_blog=debug,notion=debug,info"
    } else {
        "notion_blog=info,notion=info,warn"
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
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            notion_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::Generate => {
            let blog = notion_blog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            blog.generate().await?;
            println!("Generated successfully!");
        }

        Commands::List => {
            let blog = notion_blog::Blog::new(&base_dir)?;
            notion_blog::commands::list::run(&blog).await?;
        }

        Commands::Server { port, ip, open } => {
            let blog = notion_blog::Blog::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            blog.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            notion_blog::server::start(&blog, &ip, port, open).await?;
        }

        Commands::Clean => {
            let blog = notion_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("notion-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
