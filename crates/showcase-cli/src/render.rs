//! Plain-text rendering for the terminal. Columns are padded by display
//! width so wide characters in names keep the table aligned.

use std::fmt::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use showcase_core::favourites::{FavouritesStorage, FavouritesStore};
use showcase_core::format::{format_added_at, format_count, format_duration};
use showcase_core::listing::{AlbumListing, AlbumSource};
use showcase_core::model::{AlbumDetail, Favourite};
use showcase_core::search::SearchListing;

const NAME_WIDTH: usize = 40;
const ARTIST_WIDTH: usize = 28;

/// Cut `s` to at most `width` columns, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate then right-pad with spaces to exactly `width` columns.
pub fn pad(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

/// `covers` adds each album's card-sized cover URL under its row.
pub fn album_listing(listing: &AlbumListing, covers: bool) -> String {
    let mut out = String::new();
    let title = match listing.source() {
        AlbumSource::TopCharts => "Top albums".to_string(),
        AlbumSource::Artist(name) => format!("Albums by {}", name),
    };
    let _ = writeln!(out, "{} · {}", title, listing.sort().display_name());

    let albums = listing.sorted();
    if albums.is_empty() && listing.error().is_none() {
        let _ = writeln!(out, "No albums found.");
    }
    for (i, album) in albums.iter().enumerate() {
        let plays = album
            .playcount
            .as_deref()
            .map(format_count)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>3}. {} {} {:>12}",
            i + 1,
            pad(&album.name, NAME_WIDTH),
            pad(album.artist_name(), ARTIST_WIDTH),
            plays
        );
        if covers {
            if let Some(cover) = album.cover_url() {
                let _ = writeln!(out, "     {}", cover);
            }
        }
    }

    if let Some(error) = listing.error() {
        let _ = writeln!(out, "Error: {}", error);
    } else if listing.has_more() {
        let _ = writeln!(out, "(page {}; more available)", listing.page());
    }
    out
}

pub fn album_detail<S: FavouritesStorage>(
    detail: &AlbumDetail,
    store: &FavouritesStore<S>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} by {}", detail.name, detail.artist_name());
    if let Some(listeners) = detail.listeners.as_deref() {
        let _ = writeln!(out, "Listeners: {}", format_count(listeners));
    }
    if let Some(plays) = detail.playcount.as_deref() {
        let _ = writeln!(out, "Plays:     {}", format_count(plays));
    }
    if let Some(cover) = detail.cover_url() {
        let _ = writeln!(out, "Cover:     {}", cover);
    }
    if let Some(summary) = detail.summary_text() {
        let _ = writeln!(out, "\n{}", summary);
    }

    let _ = writeln!(out);
    if detail.tracks.is_empty() {
        let _ = writeln!(out, "No tracks listed.");
    }
    for (i, track) in detail.tracks.iter().enumerate() {
        let artist = track.artist_name().unwrap_or(detail.artist_name());
        let marker = if store.is_favourite(&track.name, artist) {
            "★"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{} {:>3}. {} {:>6}",
            marker,
            track.rank_label(i),
            pad(&track.name, NAME_WIDTH),
            format_duration(&track.duration)
        );
    }
    out
}

/// Tracks are numbered by their position in the full result list, the
/// number `favourite toggle-search` takes.
pub fn search_results<S: FavouritesStorage>(
    search: &SearchListing,
    store: &FavouritesStore<S>,
) -> String {
    let mut out = String::new();
    if let Some(error) = search.error() {
        let _ = writeln!(out, "Error: {}", error);
        return out;
    }

    let _ = writeln!(
        out,
        "Tracks ({} of {})",
        search.displayed_tracks().len(),
        search.tracks().len()
    );
    if search.tracks().is_empty() {
        let _ = writeln!(out, "  No tracks found.");
    }
    for (i, track) in search.displayed_tracks().iter().enumerate() {
        let artist = track.artist_name().unwrap_or("");
        let marker = if store.is_favourite(&track.name, artist) {
            "★"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{} {:>2}. {} {}",
            marker,
            i + 1,
            pad(&track.name, NAME_WIDTH),
            artist
        );
    }

    let _ = writeln!(
        out,
        "\nAlbums ({} of {})",
        search.displayed_albums().len(),
        search.albums().len()
    );
    if search.albums().is_empty() {
        let _ = writeln!(out, "  No albums found.");
    }
    for album in search.displayed_albums() {
        let _ = writeln!(
            out,
            "  {} {}",
            pad(&album.name, NAME_WIDTH),
            album.artist_name()
        );
    }
    out
}

pub fn favourites(shown: &[&Favourite], total: usize) -> String {
    let mut out = String::new();
    if total == 0 {
        let _ = writeln!(out, "No favourites yet.");
        return out;
    }
    let _ = writeln!(out, "Favourites ({} of {})", shown.len(), total);
    for favourite in shown {
        let _ = writeln!(
            out,
            "{} {} {} {:>6}  {}",
            pad(&favourite.track_name, NAME_WIDTH),
            pad(&favourite.artist_name, ARTIST_WIDTH),
            pad(&favourite.album_name, NAME_WIDTH),
            format_duration(&favourite.duration),
            format_added_at(favourite.added_at)
        );
    }
    out
}
