use anyhow::Context;
use showcase_core::catalog::Catalog;
use showcase_core::config::Config;
use showcase_core::favourites::{FavouritesStore, JsonFileStorage};
use showcase_core::format::now_millis;
use showcase_core::lastfm::LastfmClient;
use showcase_core::listing::AlbumListing;
use showcase_core::model::{Favourite, Track};
use showcase_core::search::SearchListing;
use showcase_core::sort::{FavouriteSortField, SortOption, SortOrder};
use tracing::debug;

use crate::render;

fn open_store(config: &Config) -> FavouritesStore<JsonFileStorage> {
    let storage = JsonFileStorage::new(config.paths.favourites_file.clone());
    debug!("[favourites] Using {}", storage.path().display());
    FavouritesStore::new(storage)
}

fn report_toggle(now_favourite: bool, track: &str, artist: &str) {
    if now_favourite {
        println!("Added {} by {} to favourites", track, artist);
    } else {
        println!("Removed {} by {} from favourites", track, artist);
    }
}

// ── Catalog commands ──────────────────────────────────────────────────────────

pub async fn albums(
    config: &Config,
    artist: Option<&str>,
    pages: u32,
    sort: SortOption,
    covers: bool,
) -> anyhow::Result<()> {
    let client = LastfmClient::new(&config.api)?;
    let mut listing = AlbumListing::new(config.paging.album_page_size);
    listing.set_sort(sort);

    match artist {
        Some(name) => {
            if !listing.search_artist(&client, name).await {
                anyhow::bail!("Artist name is empty");
            }
        }
        None => listing.load_top_charts(&client).await,
    }

    // each extra page is one scroll to the bottom of the grid
    for _ in 1..pages.max(1) {
        if !listing.load_more(&client).await {
            break;
        }
    }

    print!("{}", render::album_listing(&listing, covers));
    Ok(())
}

pub async fn album(config: &Config, artist: &str, album: &str) -> anyhow::Result<()> {
    let client = LastfmClient::new(&config.api)?;
    let detail = client.album_info(artist, album).await?;
    let store = open_store(config);
    print!("{}", render::album_detail(&detail, &store));
    Ok(())
}

pub async fn search(config: &Config, query: &str, reveal: usize) -> anyhow::Result<()> {
    let client = LastfmClient::new(&config.api)?;
    let mut search = SearchListing::new(config.paging.search_limit, config.paging.search_page_size);
    if !search.submit(&client, query).await {
        anyhow::bail!("Search query is empty");
    }
    for _ in 0..reveal {
        let tracks = search.reveal_more_tracks();
        let albums = search.reveal_more_albums();
        if !tracks && !albums {
            break;
        }
    }
    let store = open_store(config);
    print!("{}", render::search_results(&search, &store));
    Ok(())
}

// ── Favourites ────────────────────────────────────────────────────────────────

pub fn favourite_add(
    config: &Config,
    track: &str,
    artist: &str,
    album: Option<String>,
    duration: Option<String>,
) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let favourite = Favourite::new(
        track,
        artist,
        album.unwrap_or_else(|| "Unknown Album".to_string()),
        duration.unwrap_or_else(|| "0".to_string()),
        now_millis(),
    );
    if store.add(favourite) {
        println!("Added {} by {} to favourites", track, artist);
    } else {
        println!("{} by {} is already a favourite", track, artist);
    }
    Ok(())
}

pub fn favourite_remove(config: &Config, track: &str, artist: &str) -> anyhow::Result<()> {
    let mut store = open_store(config);
    if store.remove(track, artist) {
        println!("Removed {} by {} from favourites", track, artist);
    } else {
        println!("{} by {} is not a favourite", track, artist);
    }
    Ok(())
}

pub async fn favourite_toggle(
    config: &Config,
    artist: &str,
    album: &str,
    rank: &str,
) -> anyhow::Result<()> {
    let client = LastfmClient::new(&config.api)?;
    let detail = client.album_info(artist, album).await?;
    let track: &Track = detail
        .tracks
        .iter()
        .enumerate()
        .find(|(i, t)| t.rank_label(*i) == rank)
        .map(|(_, t)| t)
        .with_context(|| format!("No track {} on {} by {}", rank, detail.name, detail.artist_name()))?;

    let mut store = open_store(config);
    let favourite =
        Favourite::from_album_track(track, &detail.name, detail.artist_name(), now_millis());
    let (name, by) = (favourite.track_name.clone(), favourite.artist_name.clone());
    report_toggle(store.toggle(favourite), &name, &by);
    Ok(())
}

/// `index` counts from 1 over the track results, as `search` numbers them.
pub async fn favourite_toggle_search(
    config: &Config,
    query: &str,
    index: usize,
) -> anyhow::Result<()> {
    let client = LastfmClient::new(&config.api)?;
    let mut search = SearchListing::new(config.paging.search_limit, config.paging.search_page_size);
    if !search.submit(&client, query).await {
        anyhow::bail!("Search query is empty");
    }
    if let Some(error) = search.error() {
        anyhow::bail!("{}", error);
    }
    let track = index
        .checked_sub(1)
        .and_then(|i| search.tracks().get(i))
        .with_context(|| {
            format!(
                "No track {} in {} result(s) for {:?}",
                index,
                search.tracks().len(),
                query
            )
        })?;

    let mut store = open_store(config);
    let favourite = Favourite::from_search_track(track, now_millis());
    let (name, by) = (favourite.track_name.clone(), favourite.artist_name.clone());
    report_toggle(store.toggle(favourite), &name, &by);
    Ok(())
}

pub fn favourites(
    config: &Config,
    filter: Option<&str>,
    sort: Option<FavouriteSortField>,
    desc: bool,
) -> anyhow::Result<()> {
    let store = open_store(config);
    let matching: Vec<Favourite> = store
        .filter(filter.unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    let order = if desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let shown: Vec<&Favourite> = match sort {
        Some(field) => field.apply(&matching, order),
        None if desc => matching.iter().rev().collect(),
        None => matching.iter().collect(),
    };

    print!("{}", render::favourites(&shown, store.len()));
    Ok(())
}
