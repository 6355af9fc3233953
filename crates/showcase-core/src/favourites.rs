//! Favourites store.
//!
//! `FavouritesStore` owns the collection and talks to durable storage through
//! the `FavouritesStorage` port: one read when the store is built, one full
//! write after every mutation that changes something. Duplicate adds and
//! removes of unknown keys are no-ops, never errors.
//!
//! The on-disk shape is a versioned persisted-state envelope:
//!
//! ```text
//! {"state":{"favourites":[{"trackName":…,"artistName":…,…}]},"version":0}
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::model::{list_from_value, Favourite};
use crate::sort::{FavouriteSortField, SortOrder};

// ── Storage port ──────────────────────────────────────────────────────────────

pub trait FavouritesStorage {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> anyhow::Result<Option<Vec<Favourite>>>;
    fn save(&self, favourites: &[Favourite]) -> anyhow::Result<()>;
}

const STORAGE_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default, deserialize_with = "favourite_list")]
    favourites: Vec<Favourite>,
}

/// One unreadable record is dropped on its own instead of failing the file.
fn favourite_list<'de, D>(deserializer: D) -> Result<Vec<Favourite>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(list_from_value(&value))
}

/// JSON file under the fixed namespace key (see `platform::favourites_file`).
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl FavouritesStorage for JsonFileStorage {
    fn load(&self) -> anyhow::Result<Option<Vec<Favourite>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let envelope: PersistedEnvelope = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(envelope.state.favourites))
    }

    fn save(&self, favourites: &[Favourite]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = PersistedEnvelope {
            state: PersistedState {
                favourites: favourites.to_vec(),
            },
            version: STORAGE_VERSION,
        };
        let json = serde_json::to_string(&envelope)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory storage. Clones share the same slot, so a test can keep one
/// handle and watch what the store writes.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<Vec<Favourite>>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(favourites: Vec<Favourite>) -> Self {
        let storage = Self::default();
        *storage.slot.borrow_mut() = Some(favourites);
        storage
    }

    pub fn contents(&self) -> Option<Vec<Favourite>> {
        self.slot.borrow().clone()
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl FavouritesStorage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Option<Vec<Favourite>>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, favourites: &[Favourite]) -> anyhow::Result<()> {
        *self.slot.borrow_mut() = Some(favourites.to_vec());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct FavouritesStore<S: FavouritesStorage> {
    favourites: Vec<Favourite>,
    storage: S,
}

impl<S: FavouritesStorage> FavouritesStore<S> {
    /// Hydrate from `storage`. Missing or unreadable data gives an empty store.
    pub fn new(storage: S) -> Self {
        let favourites = match storage.load() {
            Ok(Some(stored)) => dedup_by_key(stored),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("[favourites] Could not load stored favourites, starting empty: {:#}", e);
                Vec::new()
            }
        };
        info!("[favourites] Loaded {} favourite(s)", favourites.len());
        Self { favourites, storage }
    }

    /// Insert unless (track, artist) is already stored. An existing entry is
    /// left exactly as it was. Returns whether anything was inserted.
    pub fn add(&mut self, favourite: Favourite) -> bool {
        if self.is_favourite(&favourite.track_name, &favourite.artist_name) {
            debug!(
                "[favourites] Already stored: {} / {}",
                favourite.track_name, favourite.artist_name
            );
            return false;
        }
        info!(
            "[favourites] Added {} / {}",
            favourite.track_name, favourite.artist_name
        );
        self.favourites.push(favourite);
        self.persist();
        true
    }

    /// Drop every entry matching (track, artist). Returns whether any went.
    pub fn remove(&mut self, track_name: &str, artist_name: &str) -> bool {
        let before = self.favourites.len();
        self.favourites.retain(|f| !f.matches(track_name, artist_name));
        if self.favourites.len() == before {
            return false;
        }
        info!("[favourites] Removed {} / {}", track_name, artist_name);
        self.persist();
        true
    }

    /// Flip membership of `favourite`'s key. Returns the new membership.
    pub fn toggle(&mut self, favourite: Favourite) -> bool {
        if self.is_favourite(&favourite.track_name, &favourite.artist_name) {
            self.remove(&favourite.track_name, &favourite.artist_name);
            false
        } else {
            self.add(favourite);
            true
        }
    }

    pub fn is_favourite(&self, track_name: &str, artist_name: &str) -> bool {
        self.favourites
            .iter()
            .any(|f| f.matches(track_name, artist_name))
    }

    /// Insertion order.
    pub fn list(&self) -> &[Favourite] {
        &self.favourites
    }

    pub fn len(&self) -> usize {
        self.favourites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favourites.is_empty()
    }

    /// Case-insensitive substring match on track, artist or album name.
    /// A blank query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Favourite> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.favourites.iter().collect();
        }
        self.favourites
            .iter()
            .filter(|f| {
                f.track_name.to_lowercase().contains(&query)
                    || f.artist_name.to_lowercase().contains(&query)
                    || f.album_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Re-sorted view; the stored insertion order is untouched.
    pub fn sorted(&self, field: FavouriteSortField, order: SortOrder) -> Vec<&Favourite> {
        field.apply(&self.favourites, order)
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.favourites) {
            warn!("[favourites] Failed to persist favourites: {:#}", e);
        }
    }
}

/// Keep the first entry for each (track, artist) key.
fn dedup_by_key(favourites: Vec<Favourite>) -> Vec<Favourite> {
    let mut seen = HashSet::new();
    favourites
        .into_iter()
        .filter(|f| seen.insert((f.track_name.clone(), f.artist_name.clone())))
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────
