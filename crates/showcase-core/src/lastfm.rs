//! Last.fm API client
//!
//! Every call is a single GET against the `2.0` endpoint with `api_key` and
//! `format=json`. The same logical list sits under a different key per
//! endpoint, so each one has a normalization function with a fixed fallback
//! order that ends in an empty list:
//!
//! | endpoint              | fallback order                         |
//! |-----------------------|----------------------------------------|
//! | `tag.gettopalbums`    | `albums.album` → `album` → `[]`        |
//! | `artist.gettopalbums` | `topalbums.album` → `[]`               |
//! | `track.search`        | `results.trackmatches.track` → `[]`    |
//! | `album.search`        | `results.albummatches.album` → `[]`    |
//! | `album.getinfo`       | `album`, required                      |
//!
//! No retries and no caching. Failures are logged with their detail and
//! surfaced as a bare [`CatalogError`].

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::config::{ApiConfig, API_KEY_ENV};
use crate::model::{list_from_value, Album, AlbumDetail, Track};

const METHOD_TAG_TOP_ALBUMS: &str = "tag.gettopalbums";
const METHOD_ARTIST_TOP_ALBUMS: &str = "artist.gettopalbums";
const METHOD_ALBUM_INFO: &str = "album.getinfo";
const METHOD_TRACK_SEARCH: &str = "track.search";
const METHOD_ALBUM_SEARCH: &str = "album.search";

pub struct LastfmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chart_tag: String,
}

impl LastfmClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!(
                "No Last.fm API key configured; set {} or api.api_key in config.toml",
                API_KEY_ENV
            );
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            chart_tag: config.chart_tag.clone(),
        })
    }

    async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .context("Failed to reach Last.fm")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Last.fm response")?;

        parse_body(status, &body)
    }

    /// Run one call, logging the real failure and handing back `failure`.
    async fn fetch(
        &self,
        method: &str,
        params: &[(&str, String)],
        failure: CatalogError,
    ) -> Result<Value, CatalogError> {
        debug!("[lastfm] {} {:?}", method, params);
        self.call(method, params).await.map_err(|e| {
            warn!("[lastfm] {} failed: {:#}", method, e);
            failure
        })
    }
}

impl Catalog for LastfmClient {
    async fn top_albums(&self, page: u32, limit: u32) -> Result<Vec<Album>, CatalogError> {
        let params = [
            ("tag", self.chart_tag.clone()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        let json = self
            .fetch(METHOD_TAG_TOP_ALBUMS, &params, CatalogError::TopAlbums)
            .await?;
        Ok(top_albums_from(&json))
    }

    async fn artist_albums(
        &self,
        artist: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Album>, CatalogError> {
        let params = [
            ("artist", artist.to_string()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ];
        let json = self
            .fetch(METHOD_ARTIST_TOP_ALBUMS, &params, CatalogError::ArtistAlbums)
            .await?;
        Ok(artist_albums_from(&json))
    }

    async fn album_info(&self, artist: &str, album: &str) -> Result<AlbumDetail, CatalogError> {
        let params = [("artist", artist.to_string()), ("album", album.to_string())];
        let json = self
            .fetch(METHOD_ALBUM_INFO, &params, CatalogError::AlbumInfo)
            .await?;
        album_detail_from(&json).ok_or_else(|| {
            warn!("[lastfm] {}: no usable album in response", METHOD_ALBUM_INFO);
            CatalogError::AlbumInfo
        })
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let params = [("track", query.to_string()), ("limit", limit.to_string())];
        let json = self
            .fetch(METHOD_TRACK_SEARCH, &params, CatalogError::SearchTracks)
            .await?;
        Ok(search_tracks_from(&json))
    }

    async fn search_albums(&self, query: &str, limit: u32) -> Result<Vec<Album>, CatalogError> {
        let params = [("album", query.to_string()), ("limit", limit.to_string())];
        let json = self
            .fetch(METHOD_ALBUM_SEARCH, &params, CatalogError::SearchAlbums)
            .await?;
        Ok(search_albums_from(&json))
    }
}

/// Check the status and Last.fm's in-band error envelope
/// (`{"error": 6, "message": "..."}`), then hand back the parsed body.
fn parse_body(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        anyhow::bail!("Last.fm returned status {}: {}", status, body.trim());
    }

    let json: Value = serde_json::from_str(body).context("Failed to parse Last.fm JSON")?;

    if let Some(code) = json.get("error") {
        let message = json
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        anyhow::bail!("Last.fm error {}: {}", code, message);
    }

    Ok(json)
}

// ── Response normalization ────────────────────────────────────────────────────

/// First candidate pointer that holds a non-null value wins; no candidate
/// means an empty list.
fn list_at<T: serde::de::DeserializeOwned>(json: &Value, candidates: &[&str]) -> Vec<T> {
    candidates
        .iter()
        .find_map(|pointer| json.pointer(pointer).filter(|v| !v.is_null()))
        .map(|value| list_from_value(value))
        .unwrap_or_default()
}

pub fn top_albums_from(json: &Value) -> Vec<Album> {
    list_at(json, &["/albums/album", "/album"])
}

pub fn artist_albums_from(json: &Value) -> Vec<Album> {
    list_at(json, &["/topalbums/album"])
}

pub fn search_tracks_from(json: &Value) -> Vec<Track> {
    list_at(json, &["/results/trackmatches/track"])
}

pub fn search_albums_from(json: &Value) -> Vec<Album> {
    list_at(json, &["/results/albummatches/album"])
}

pub fn album_detail_from(json: &Value) -> Option<AlbumDetail> {
    let album = json.get("album")?;
    match serde_json::from_value(album.clone()) {
        Ok(detail) => Some(detail),
        Err(e) => {
            debug!("[lastfm] album.getinfo payload did not parse: {}", e);
            None
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_albums_nested_envelope() {
        let json = json!({
            "albums": {
                "album": [
                    { "name": "Test Album 1", "artist": { "name": "Test Artist 1" }, "image": [] },
                    { "name": "Test Album 2", "artist": { "name": "Test Artist 2" }, "image": [] }
                ],
                "@attr": { "tag": "rock", "page": "1", "perPage": "8" }
            }
        });
        let albums = top_albums_from(&json);
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].name, "Test Album 1");
        assert_eq!(albums[1].artist_name(), "Test Artist 2");
    }

    #[test]
    fn test_top_albums_flat_fallback() {
        let json = json!({ "album": [{ "name": "Flat", "artist": "Someone" }] });
        assert_eq!(top_albums_from(&json)[0].name, "Flat");
    }

    #[test]
    fn test_top_albums_absent_is_empty() {
        assert!(top_albums_from(&json!({})).is_empty());
        assert!(top_albums_from(&json!({ "albums": { "album": null } })).is_empty());
        assert!(top_albums_from(&json!({ "albums": "unexpected" })).is_empty());
    }

    #[test]
    fn test_artist_albums() {
        let json = json!({
            "topalbums": {
                "album": [
                    { "name": "Parachutes", "artist": { "name": "Coldplay" }, "playcount": 5000 }
                ]
            }
        });
        let albums = artist_albums_from(&json);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].artist_name(), "Coldplay");
        assert_eq!(albums[0].playcount.as_deref(), Some("5000"));

        // the tag chart's flat fallback does not apply to this endpoint
        assert!(artist_albums_from(&json!({ "album": [{ "name": "x", "artist": "y" }] })).is_empty());
    }

    #[test]
    fn test_search_results() {
        let json = json!({
            "results": {
                "trackmatches": {
                    "track": [
                        { "name": "Test Track", "artist": "Test Artist", "listeners": "10", "url": "https://example.com" }
                    ]
                },
                "albummatches": {
                    "album": { "name": "Test Album", "artist": "Test Artist", "image": [] }
                }
            }
        });
        let tracks = search_tracks_from(&json);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artist_name(), Some("Test Artist"));

        // a lone object is a one-element list
        let albums = search_albums_from(&json);
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "Test Album");
    }

    #[test]
    fn test_album_detail() {
        let json = json!({
            "album": {
                "name": "Parachutes",
                "artist": "Coldplay",
                "playcount": "100",
                "tracks": { "track": [
                    { "name": "Don't Panic", "duration": 137, "@attr": { "rank": 1 } },
                    { "name": "Shiver", "duration": 304, "@attr": { "rank": 2 } }
                ]}
            }
        });
        let detail = album_detail_from(&json).unwrap();
        assert_eq!(detail.artist_name(), "Coldplay");
        assert_eq!(detail.tracks.len(), 2);
        assert_eq!(detail.tracks[1].rank_label(1), "2");

        assert!(album_detail_from(&json!({})).is_none());
        assert!(album_detail_from(&json!({ "album": { "artist": "no name" } })).is_none());
    }

    #[test]
    fn test_parse_body_error_envelope() {
        let err = parse_body(
            StatusCode::OK,
            r#"{"error": 6, "message": "Album not found"}"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Album not found"));
    }

    #[test]
    fn test_parse_body_bad_status_and_bad_json() {
        assert!(parse_body(StatusCode::INTERNAL_SERVER_ERROR, "{}").is_err());
        assert!(parse_body(StatusCode::OK, "<html>").is_err());
        assert!(parse_body(StatusCode::OK, r#"{"albums": {}}"#).is_ok());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = ApiConfig::default();
        assert!(LastfmClient::new(&config).is_err());

        let config = ApiConfig {
            api_key: "key".into(),
            ..ApiConfig::default()
        };
        assert!(LastfmClient::new(&config).is_ok());
    }
}
