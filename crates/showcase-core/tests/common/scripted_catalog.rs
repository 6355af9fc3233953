#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use showcase_core::catalog::{Catalog, CatalogError};
use showcase_core::model::{Album, AlbumDetail, ArtistRef, Track};

/// `None` is the tag chart, `Some(name)` an artist.
pub type PageKey = (Option<String>, u32);

/// In-memory catalog serving pre-scripted album pages. Unscripted pages come
/// back empty, as the real service does past the last page.
#[derive(Default)]
pub struct ScriptedCatalog {
    pages: HashMap<PageKey, Vec<Album>>,
    failing: HashSet<PageKey>,
    calls: RefCell<Vec<(PageKey, u32)>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart_page(mut self, page: u32, albums: Vec<Album>) -> Self {
        self.pages.insert((None, page), albums);
        self
    }

    pub fn artist_page(mut self, artist: &str, page: u32, albums: Vec<Album>) -> Self {
        self.pages.insert((Some(artist.to_string()), page), albums);
        self
    }

    pub fn failing_artist_page(mut self, artist: &str, page: u32) -> Self {
        self.failing.insert((Some(artist.to_string()), page));
        self
    }

    /// Stop failing a page scripted with `failing_artist_page`.
    pub fn recovered_artist_page(mut self, artist: &str, page: u32) -> Self {
        self.failing.remove(&(Some(artist.to_string()), page));
        self
    }

    pub fn failing_chart_page(mut self, page: u32) -> Self {
        self.failing.insert((None, page));
        self
    }

    /// Every album page requested so far, with the limit it was asked with.
    pub fn calls(&self) -> Vec<(PageKey, u32)> {
        self.calls.borrow().clone()
    }

    fn serve(&self, key: PageKey, limit: u32, failure: CatalogError) -> Result<Vec<Album>, CatalogError> {
        self.calls.borrow_mut().push((key.clone(), limit));
        if self.failing.contains(&key) {
            return Err(failure);
        }
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }
}

impl Catalog for ScriptedCatalog {
    async fn top_albums(&self, page: u32, limit: u32) -> Result<Vec<Album>, CatalogError> {
        self.serve((None, page), limit, CatalogError::TopAlbums)
    }

    async fn artist_albums(
        &self,
        artist: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Album>, CatalogError> {
        self.serve((Some(artist.to_string()), page), limit, CatalogError::ArtistAlbums)
    }

    async fn album_info(&self, _artist: &str, _album: &str) -> Result<AlbumDetail, CatalogError> {
        Err(CatalogError::AlbumInfo)
    }

    async fn search_tracks(&self, _query: &str, _limit: u32) -> Result<Vec<Track>, CatalogError> {
        Ok(Vec::new())
    }

    async fn search_albums(&self, _query: &str, _limit: u32) -> Result<Vec<Album>, CatalogError> {
        Ok(Vec::new())
    }
}

pub fn album(artist: &str, name: &str, playcount: u64) -> Album {
    Album {
        name: name.to_string(),
        artist: ArtistRef::Name(artist.to_string()),
        image: Vec::new(),
        playcount: Some(playcount.to_string()),
        url: None,
        mbid: None,
    }
}

/// `count` albums named `"<prefix> <n>"`, starting at `first`.
pub fn albums(artist: &str, prefix: &str, first: usize, count: usize) -> Vec<Album> {
    (first..first + count)
        .map(|n| album(artist, &format!("{} {}", prefix, n), (n * 100) as u64))
        .collect()
}
