//! Bookcase CLI - Command-line interface for the personal book catalog

mod commands;

use anyhow::Result;
use bookcase_core::{CatalogConfig, LookupConfig, SortOrder};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate a rating argument (0 to 5)
fn parse_rating(s: &str) -> Result<u8, String> {
    let n: u8 = s.parse().map_err(|_| format!("'{}' is not a valid rating", s))?;
    if n > bookcase_core::types::MAX_RATING {
        Err(format!(
            "rating must be between 0 and {}",
            bookcase_core::types::MAX_RATING
        ))
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "bookcase")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Catalog directory (defaults to BOOKCASE_DATA_DIR or the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which view of the catalog indices refer to
#[derive(Args)]
struct ViewArgs {
    /// Only show books whose title or author contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort order (title, author)
    #[arg(long, default_value = "title")]
    sort: SortOrder,
}

#[derive(Subcommand)]
enum Commands {
    /// List the books in the catalog
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a book to the catalog
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// Author
        #[arg(short, long, default_value = "")]
        author: String,

        /// Rating (0-5)
        #[arg(short, long, default_value = "0", value_parser = parse_rating)]
        rating: u8,

        /// ISBN
        #[arg(long, default_value = "")]
        isbn: String,

        /// Notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Update the book at an index of the listed view
    Update {
        /// Index as shown by `list` with the same --search and --sort
        index: usize,

        #[command(flatten)]
        view: ViewArgs,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New author
        #[arg(long)]
        author: Option<String>,

        /// New rating (0-5)
        #[arg(long, value_parser = parse_rating)]
        rating: Option<u8>,

        /// New ISBN
        #[arg(long)]
        isbn: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,

        /// New cover image file
        #[arg(long, conflicts_with = "clear_cover")]
        cover: Option<PathBuf>,

        /// Remove the cover image
        #[arg(long)]
        clear_cover: bool,
    },

    /// Remove the book at an index of the listed view
    Remove {
        /// Index as shown by `list` with the same --search and --sort
        index: usize,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Look up a book by ISBN or barcode
    Lookup {
        /// ISBN or other identifier
        identifier: String,

        /// Save the book to the catalog
        #[arg(long)]
        save: bool,

        /// Rating to give the saved book (0-5)
        #[arg(short, long, default_value = "0", value_parser = parse_rating)]
        rating: u8,

        /// Accept results that have no cover link
        #[arg(long)]
        allow_missing_cover: bool,

        /// Volumes search endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Timeout per request, in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset the catalog to the sample books
    Reset {
        /// Confirm discarding the saved catalog
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookcase_cli=debug,bookcase_core=debug"
    } else {
        "bookcase_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| CatalogConfig::from_env().data_dir);
    tracing::debug!("Using catalog in {}", data_dir.display());

    match cli.command {
        Commands::List { view, json } => commands::list(&data_dir, &view.search, view.sort, json),

        Commands::Add {
            title,
            author,
            rating,
            isbn,
            notes,
            cover,
        } => commands::add(
            &data_dir,
            commands::NewBook {
                title,
                author,
                rating,
                isbn,
                notes,
                cover,
            },
        ),

        Commands::Update {
            index,
            view,
            title,
            author,
            rating,
            isbn,
            notes,
            cover,
            clear_cover,
        } => commands::update(
            &data_dir,
            &view.search,
            view.sort,
            index,
            commands::BookEdits {
                title,
                author,
                rating,
                isbn,
                notes,
                cover,
                clear_cover,
            },
        ),

        Commands::Remove { index, view } => {
            commands::remove(&data_dir, &view.search, view.sort, index)
        }

        Commands::Lookup {
            identifier,
            save,
            rating,
            allow_missing_cover,
            endpoint,
            timeout,
            json,
        } => {
            let mut config = LookupConfig::from_env();
            if let Some(endpoint) = endpoint {
                config = config.with_endpoint(endpoint);
            }
            if let Some(secs) = timeout {
                config = config.with_timeout(Duration::from_secs(secs.max(1)));
            }
            if allow_missing_cover {
                config = config.with_require_cover_link(false);
            }

            commands::lookup(
                &data_dir,
                commands::LookupRequest {
                    identifier,
                    save,
                    rating,
                    json,
                    config,
                },
            )
            .await
        }

        Commands::Reset { yes } => commands::reset(&data_dir, yes),
    }
}
