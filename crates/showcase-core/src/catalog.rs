//! The read-only remote catalog, as seen by the listing controllers.
//!
//! `lastfm::LastfmClient` is the production implementation; tests plug in
//! scripted fakes.

use thiserror::Error;

use crate::model::{Album, AlbumDetail, Track};

/// One generic failure per operation. Transport errors, bad statuses and
/// malformed bodies all collapse here; the detail only goes to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Failed to fetch top albums")]
    TopAlbums,
    #[error("Failed to fetch artist albums")]
    ArtistAlbums,
    #[error("Failed to fetch album information")]
    AlbumInfo,
    #[error("Failed to search tracks")]
    SearchTracks,
    #[error("Failed to search albums")]
    SearchAlbums,
}

#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Chart albums for the configured tag.
    async fn top_albums(&self, page: u32, limit: u32) -> Result<Vec<Album>, CatalogError>;

    async fn artist_albums(
        &self,
        artist: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Album>, CatalogError>;

    async fn album_info(&self, artist: &str, album: &str) -> Result<AlbumDetail, CatalogError>;

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError>;

    async fn search_albums(&self, query: &str, limit: u32) -> Result<Vec<Album>, CatalogError>;
}
