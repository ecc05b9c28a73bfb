//! CLI entry point for collective-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "collective-blog")]
#[command(version)]
#[command(about = "A static blog generator backed by a headless CMS", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Fetch posts and generate static files
    #[command(alias = "g")]
    Generate {
        /// Fail instead of building an empty site when the backend is unreachable
        #[arg(long)]
        strict: bool,
    },

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve the existing output without regenerating
        #[arg(long)]
        no_generate: bool,
    },

    /// List published posts
    List {
        /// Print posts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a published post by slug
    Show {
        /// Slug of the post
        slug: String,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "collective_blog=debug,info"
    } else {
        "collective_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
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
            tracing::info!("Initializing site in {:?}", target_dir);
            collective_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized empty site in {:?}", target_dir);
        }

        Commands::Generate { strict } => {
            let blog = collective_blog::Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            collective_blog::commands::generate::run(&blog, strict).await?;
            println!("Generated successfully!");
        }

        Commands::Server {
            port,
            ip,
            open,
            no_generate,
        } => {
            let blog = collective_blog::Blog::new(&base_dir)?;

            if !no_generate {
                tracing::info!("Generating static files...");
                blog.generate().await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            collective_blog::server::start(&blog, &ip, port, open).await?;
        }

        Commands::List { json } => {
            let blog = collective_blog::Blog::new(&base_dir)?;
            collective_blog::commands::list::run(&blog, json).await?;
        }

        Commands::Show { slug, json } => {
            let blog = collective_blog::Blog::new(&base_dir)?;
            collective_blog::commands::show::run(&blog, &slug, json).await?;
        }

        Commands::Clean => {
            let blog = collective_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("collective-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
