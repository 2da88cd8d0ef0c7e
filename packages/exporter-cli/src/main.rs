//! WordPress to Contentful migration CLI.
//!
//! One binary drives the whole migration: `export` dumps a WordPress
//! site to local JSON, `prepare` compiles the dumps into Contentful
//! payloads, `space` manages the destination spaces and `import`
//! pushes the payloads into them. Commands share the `--host`,
//! `--lang`, `--site`, `--dir` and `--settings` flags so a full run is
//! the same flag set repeated across subcommands.

mod cmd;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use migration::{Site, DEFAULT_CHUNK_SIZE};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "wordpress-exporter")]
#[command(about = "Migrate WordPress content into Contentful spaces")]
struct Cli {
    /// WordPress host to export from
    #[arg(long, global = true, default_value = "https://www.freeletics.com")]
    host: String,

    /// Locale to migrate
    #[arg(
        long,
        global = true,
        default_value = "en",
        value_parser = ["en", "fr", "de", "it", "es", "pt"],
    )]
    lang: String,

    /// Site to migrate
    #[arg(long, global = true, default_value = "blog")]
    site: Site,

    /// Root directory for dump and export data
    #[arg(long, global = true, default_value = "./data")]
    dir: PathBuf,

    /// Settings file with space codes, exclusions and remap tables
    #[arg(long, global = true, default_value = "./settings.json")]
    settings: PathBuf,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump categories, tags and posts from WordPress
    Export,

    /// Compile dumps into Contentful payloads
    #[command(subcommand)]
    Prepare(PrepareCommands),

    /// Push compiled payloads into the configured space
    #[command(subcommand)]
    Import(ImportCommands),

    /// Manage Contentful spaces
    #[command(subcommand)]
    Space(SpaceCommands),
}

#[derive(Subcommand)]
enum PrepareCommands {
    /// Collect post image URLs into export/assets.json
    Assets,

    /// Compile entries and the URL rewrite table
    Entries,
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Import compiled assets, then export their destination URLs
    Assets {
        /// Records per submission
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Import compiled entries
    Entries {
        /// Records per submission
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
}

#[derive(Subcommand)]
enum SpaceCommands {
    /// Create the space for the lang and site, with content types
    Create,

    /// Delete the space for the lang and site
    Delete,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let Cli {
        host,
        lang,
        site,
        dir,
        settings,
        verbose,
        quiet,
        command,
    } = Cli::parse();
    init_tracing(verbose, quiet);

    let ctx = cmd::Context {
        host,
        lang,
        site,
        dir,
        settings,
    };

    let outcome = match command {
        Commands::Export => cmd::export::run(&ctx).await,
        Commands::Prepare(PrepareCommands::Assets) => cmd::prepare::assets(&ctx),
        Commands::Prepare(PrepareCommands::Entries) => cmd::prepare::entries(&ctx),
        Commands::Import(ImportCommands::Assets { chunk_size }) => {
            cmd::import::assets(&ctx, chunk_size).await
        }
        Commands::Import(ImportCommands::Entries { chunk_size }) => {
            cmd::import::entries(&ctx, chunk_size).await
        }
        Commands::Space(SpaceCommands::Create) => cmd::space::create(&ctx).await,
        Commands::Space(SpaceCommands::Delete) => cmd::space::delete(&ctx).await,
    };

    if let Err(err) = outcome {
        error!("{err:#}");
        process::exit(1);
    }
}
