//! Free-text search over tracks and albums.
//!
//! One submit fires both searches at once and keeps up to `limit` results of
//! each. The results are revealed a page at a time as the user scrolls to
//! the end of either list; revealing never fetches. As with the album
//! listing, the controller is sans-IO: `begin` hands out a `SearchRequest`
//! and `complete` merges the outcome, dropping anything from a superseded
//! submit.

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::model::{Album, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
    pub limit: u32,
}

/// Both result lists of one submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
}

impl SearchRequest {
    /// Runs the track and album searches concurrently. The first failure
    /// fails the whole request.
    pub async fn fetch<C: Catalog>(&self, catalog: &C) -> Result<SearchResults, CatalogError> {
        let (tracks, albums) = tokio::try_join!(
            catalog.search_tracks(&self.query, self.limit),
            catalog.search_albums(&self.query, self.limit),
        )?;
        Ok(SearchResults { tracks, albums })
    }
}

pub struct SearchListing {
    query: String,
    tracks: Vec<Track>,
    albums: Vec<Album>,
    shown_tracks: usize,
    shown_albums: usize,
    limit: u32,
    page_size: usize,
    searched: bool,
    phase: SearchPhase,
    error: Option<String>,
    generation: u64,
}

impl SearchListing {
    pub fn new(limit: u32, page_size: usize) -> Self {
        Self {
            query: String::new(),
            tracks: Vec::new(),
            albums: Vec::new(),
            shown_tracks: 0,
            shown_albums: 0,
            limit,
            page_size: page_size.max(1),
            searched: false,
            phase: SearchPhase::Idle,
            error: None,
            generation: 0,
        }
    }

    /// Start a new search. Blank queries are ignored.
    pub fn begin(&mut self, query: &str) -> Option<SearchRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.generation += 1;
        self.query = query.to_string();
        self.tracks.clear();
        self.albums.clear();
        self.shown_tracks = 0;
        self.shown_albums = 0;
        self.searched = true;
        self.error = None;
        self.phase = SearchPhase::Loading;
        info!(
            "[search] Searching for {:?} (generation {})",
            self.query, self.generation
        );
        Some(SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
            limit: self.limit,
        })
    }

    /// Merge a finished search. Returns `false` when the request was
    /// superseded or already merged.
    pub fn complete(
        &mut self,
        request: &SearchRequest,
        result: Result<SearchResults, CatalogError>,
    ) -> bool {
        if request.generation != self.generation || self.phase != SearchPhase::Loading {
            debug!(
                "[search] Dropping results for {:?} (generation {}, current {})",
                request.query, request.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(SearchResults {
                mut tracks,
                mut albums,
            }) => {
                let cap = self.limit as usize;
                tracks.truncate(cap);
                albums.truncate(cap);
                debug!(
                    "[search] {} track(s), {} album(s) for {:?}",
                    tracks.len(),
                    albums.len(),
                    request.query
                );
                self.shown_tracks = self.page_size.min(tracks.len());
                self.shown_albums = self.page_size.min(albums.len());
                self.tracks = tracks;
                self.albums = albums;
                self.phase = SearchPhase::Loaded;
            }
            Err(e) => {
                warn!("[search] {:?} failed: {}", request.query, e);
                self.tracks.clear();
                self.albums.clear();
                self.shown_tracks = 0;
                self.shown_albums = 0;
                self.error = Some(e.to_string());
                self.phase = SearchPhase::Error;
            }
        }
        true
    }

    /// Grow the visible track list by one page. Returns whether anything
    /// new became visible.
    pub fn reveal_more_tracks(&mut self) -> bool {
        if self.phase == SearchPhase::Loading {
            return false;
        }
        reveal(&mut self.shown_tracks, self.tracks.len(), self.page_size)
    }

    pub fn reveal_more_albums(&mut self) -> bool {
        if self.phase == SearchPhase::Loading {
            return false;
        }
        reveal(&mut self.shown_albums, self.albums.len(), self.page_size)
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn displayed_tracks(&self) -> &[Track] {
        &self.tracks[..self.shown_tracks]
    }

    pub fn displayed_albums(&self) -> &[Album] {
        &self.albums[..self.shown_albums]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn has_more_tracks(&self) -> bool {
        self.shown_tracks < self.tracks.len()
    }

    pub fn has_more_albums(&self) -> bool {
        self.shown_albums < self.albums.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether anything was ever submitted; distinguishes "no results" from
    /// "nothing searched yet".
    pub fn searched(&self) -> bool {
        self.searched
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin, fetch and merge in one go. Returns `false` for a blank query.
    pub async fn submit<C: Catalog>(&mut self, catalog: &C, query: &str) -> bool {
        let Some(request) = self.begin(query) else {
            return false;
        };
        let result = request.fetch(catalog).await;
        self.complete(&request, result);
        true
    }
}

fn reveal(shown: &mut usize, total: usize, page: usize) -> bool {
    if *shown >= total {
        return false;
    }
    *shown = (*shown + page).min(total);
    true
}

// ── tests ─────────────────────────────────────────────────────────────────────
