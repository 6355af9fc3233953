//! Catalog entities as served by Last.fm, plus the locally owned `Favourite`.
//!
//! Last.fm is loose with its JSON: counters arrive as strings on one endpoint
//! and numbers on another, the artist is sometimes a bare name and sometimes
//! an object, and a one-element list may collapse into a single object. The
//! deserializers here absorb that variance so the rest of the crate sees one
//! shape.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

// ── Remote entities ───────────────────────────────────────────────────────────

/// Artist reference: either a bare name or an object with a name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArtistRef {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        mbid: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl ArtistRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed { name, .. } => name,
        }
    }
}

/// One cover-art variant, tagged by a size label (`small` … `extralarge`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    #[serde(rename = "#text", default)]
    pub url: String,
    #[serde(default)]
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    pub name: String,
    pub artist: ArtistRef,
    #[serde(default, deserialize_with = "image_list")]
    pub image: Vec<Image>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mbid: Option<String>,
}

impl Album {
    pub fn artist_name(&self) -> &str {
        self.artist.name()
    }

    /// Card-sized cover: `large`, then `medium`, then whatever comes last.
    pub fn cover_url(&self) -> Option<&str> {
        pick_image(&self.image, &["large", "medium"])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackAlbum {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "image_list")]
    pub image: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackAttr {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub name: String,
    /// Seconds, as text. Empty when the service did not say.
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub album: Option<TrackAlbum>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<TrackAttr>,
}

impl Track {
    pub fn artist_name(&self) -> Option<&str> {
        self.artist.as_ref().map(ArtistRef::name).filter(|n| !n.is_empty())
    }

    pub fn album_title(&self) -> Option<&str> {
        self.album
            .as_ref()
            .map(|a| a.title.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Position label for an album track listing. The service's rank wins
    /// over the index, which only counts from 1 as a fallback.
    pub fn rank_label(&self, index: usize) -> String {
        self.attr
            .as_ref()
            .and_then(|a| a.rank.as_deref())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Wiki {
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlbumDetail {
    pub name: String,
    pub artist: ArtistRef,
    #[serde(default, deserialize_with = "image_list")]
    pub image: Vec<Image>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub playcount: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub listeners: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mbid: Option<String>,
    /// Flattened from the `tracks.track` envelope.
    #[serde(default, deserialize_with = "track_envelope")]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub wiki: Option<Wiki>,
}

impl AlbumDetail {
    pub fn artist_name(&self) -> &str {
        self.artist.name()
    }

    /// Hero-sized cover: `extralarge`, then the last variant.
    pub fn cover_url(&self) -> Option<&str> {
        pick_image(&self.image, &["extralarge"])
    }

    /// Wiki summary with the trailing "Read more on Last.fm" style anchors removed.
    pub fn summary_text(&self) -> Option<String> {
        let summary = self.wiki.as_ref()?.summary.as_deref()?;
        let cleaned = anchor_pattern().replace_all(summary, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }
}

fn anchor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<a[^>]*>.*?</a>").expect("anchor pattern is valid"))
}

fn pick_image<'a>(images: &'a [Image], preferred: &[&str]) -> Option<&'a str> {
    preferred
        .iter()
        .find_map(|size| {
            images
                .iter()
                .find(|img| img.size == *size && !img.url.is_empty())
        })
        .or_else(|| images.last().filter(|img| !img.url.is_empty()))
        .map(|img| img.url.as_str())
}

// ── Favourite ─────────────────────────────────────────────────────────────────

/// A user-saved track, keyed by (`track_name`, `artist_name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    /// Seconds as text; may be empty or non-numeric.
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub duration: String,
    /// Milliseconds since the Unix epoch.
    pub added_at: i64,
}

impl Favourite {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        album_name: impl Into<String>,
        duration: impl Into<String>,
        added_at: i64,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            album_name: album_name.into(),
            duration: duration.into(),
            added_at,
        }
    }

    /// A track picked from an album listing. The track's own artist wins
    /// over the album artist.
    pub fn from_album_track(track: &Track, album_name: &str, album_artist: &str, added_at: i64) -> Self {
        Self::new(
            track.name.clone(),
            track.artist_name().unwrap_or(album_artist),
            album_name,
            track.duration.clone(),
            added_at,
        )
    }

    /// A track picked from search results, which carry less context.
    pub fn from_search_track(track: &Track, added_at: i64) -> Self {
        let duration = if track.duration.is_empty() {
            "0".to_string()
        } else {
            track.duration.clone()
        };
        Self::new(
            track.name.clone(),
            track.artist_name().unwrap_or(""),
            track.album_title().unwrap_or("Unknown Album"),
            duration,
            added_at,
        )
    }

    pub fn matches(&self, track_name: &str, artist_name: &str) -> bool {
        self.track_name == track_name && self.artist_name == artist_name
    }
}

// ── Lenient deserialization ───────────────────────────────────────────────────

fn scalar_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn lenient_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

fn image_list<'de, D>(deserializer: D) -> Result<Vec<Image>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(list_from_value(&value))
}

fn track_envelope<'de, D>(deserializer: D) -> Result<Vec<Track>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .get("track")
        .map(|tracks| list_from_value(tracks))
        .unwrap_or_default())
}

/// Turn a JSON list into typed items. A lone object counts as a one-element
/// list; anything else is an empty list. Entries that do not deserialize are
/// dropped.
pub(crate) fn list_from_value<T: DeserializeOwned>(value: &serde_json::Value) -> Vec<T> {
    let items: &[serde_json::Value] = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(_) => std::slice::from_ref(value),
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("[model] Skipping malformed entry: {}", e);
                None
            }
        })
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────
