mod commands;
mod render;

use clap::{Parser, Subcommand};
use showcase_core::config::Config;
use showcase_core::sort::{FavouriteSortField, SortOption};

/// Browse Last.fm charts, search the catalog and keep a list of favourite tracks.
#[derive(Parser)]
#[command(name = "showcase", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List chart albums, or one artist's top albums.
    Albums {
        /// Show this artist's albums instead of the tag chart.
        #[arg(long)]
        artist: Option<String>,

        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// name-asc, name-desc, popularity-asc or popularity-desc.
        #[arg(long, default_value = "name-asc")]
        sort: SortOption,

        /// Print each album's cover URL.
        #[arg(long)]
        covers: bool,
    },

    /// Show one album with its track list.
    Album { artist: String, album: String },

    /// Search tracks and albums.
    Search {
        query: String,

        /// Extra result pages to reveal beyond the first.
        #[arg(long, default_value_t = 0)]
        reveal: usize,
    },

    /// Add, remove or toggle a favourite track.
    Favourite {
        #[command(subcommand)]
        action: FavouriteAction,
    },

    /// List favourite tracks.
    Favourites {
        /// Only show entries whose track, artist or album contains this text.
        #[arg(long)]
        filter: Option<String>,

        /// added, track or artist. Insertion order when omitted.
        #[arg(long)]
        sort: Option<FavouriteSortField>,

        /// Reverse the sort.
        #[arg(long)]
        desc: bool,
    },
}

#[derive(Subcommand)]
enum FavouriteAction {
    Add {
        #[arg(long)]
        track: String,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: Option<String>,
        /// Length in seconds.
        #[arg(long)]
        duration: Option<String>,
    },
    Remove {
        #[arg(long)]
        track: String,
        #[arg(long)]
        artist: String,
    },
    /// Toggle a track of an album, picked by its position in the track list.
    Toggle {
        artist: String,
        album: String,
        rank: String,
    },
    /// Toggle a track from search results, picked by its number in `search`.
    ToggleSearch { query: String, index: usize },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = showcase_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(showcase_core::platform::log_file())?;

    // RUST_LOG wins; keep HTTP client internals quiet otherwise.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    tracing::info!("showcase starting…");

    let config = Config::load()?;

    match cli.command {
        Command::Albums {
            artist,
            pages,
            sort,
            covers,
        } => commands::albums(&config, artist.as_deref(), pages, sort, covers).await,
        Command::Album { artist, album } => commands::album(&config, &artist, &album).await,
        Command::Search { query, reveal } => commands::search(&config, &query, reveal).await,
        Command::Favourite { action } => match action {
            FavouriteAction::Add {
                track,
                artist,
                album,
                duration,
            } => commands::favourite_add(&config, &track, &artist, album, duration),
            FavouriteAction::Remove { track, artist } => {
                commands::favourite_remove(&config, &track, &artist)
            }
            FavouriteAction::Toggle {
                artist,
                album,
                rank,
            } => commands::favourite_toggle(&config, &artist, &album, &rank).await,
            FavouriteAction::ToggleSearch { query, index } => {
                commands::favourite_toggle_search(&config, &query, index).await
            }
        },
        Command::Favourites { filter, sort, desc } => {
            commands::favourites(&config, filter.as_deref(), sort, desc)
        }
    }
}
