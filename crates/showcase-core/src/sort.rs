//! Sorting options for album listings and the favourites view.
//!
//! Sorting is always a view: the functions here borrow the accumulated list
//! and hand back a reordered list of references, leaving the source alone.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::format::parse_leading_int;
use crate::model::{Album, Favourite};

/// Sort order direction
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

// ── Album listings ────────────────────────────────────────────────────────────

/// Sort applied to an album listing on render.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SortOption {
    #[default]
    NameAsc,
    NameDesc,
    /// By play count; missing or non-numeric counts sort as zero.
    PopularityAsc,
    PopularityDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::PopularityAsc,
        SortOption::PopularityDesc,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::PopularityAsc => "popularity-asc",
            SortOption::PopularityDesc => "popularity-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::PopularityAsc => "Least played",
            SortOption::PopularityDesc => "Most played",
        }
    }

    pub fn order(&self) -> SortOrder {
        match self {
            SortOption::NameAsc | SortOption::PopularityAsc => SortOrder::Ascending,
            SortOption::NameDesc | SortOption::PopularityDesc => SortOrder::Descending,
        }
    }

    /// Reorder `albums` without touching it. The sort is stable, so equal
    /// keys keep their fetch order.
    pub fn apply<'a>(&self, albums: &'a [Album]) -> Vec<&'a Album> {
        let mut sorted: Vec<&Album> = albums.iter().collect();
        let order = self.order();
        match self {
            SortOption::NameAsc | SortOption::NameDesc => {
                sorted.sort_by(|a, b| order.apply(compare_names(&a.name, &b.name)));
            }
            SortOption::PopularityAsc | SortOption::PopularityDesc => {
                sorted.sort_by(|a, b| order.apply(play_count(a).cmp(&play_count(b))));
            }
        }
        sorted
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.key() == s)
            .ok_or_else(|| {
                let keys: Vec<&str> = SortOption::ALL.iter().map(|o| o.key()).collect();
                format!("unknown sort option '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

fn play_count(album: &Album) -> i64 {
    album
        .playcount
        .as_deref()
        .and_then(parse_leading_int)
        .unwrap_or(0)
}

/// Case-insensitive first so "abba" sits next to "ABBA"; raw bytes break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ── Favourites ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FavouriteSortField {
    #[default]
    AddedAt,
    Track,
    Artist,
}

impl FavouriteSortField {
    pub fn display_name(&self) -> &'static str {
        match self {
            FavouriteSortField::AddedAt => "Date Added",
            FavouriteSortField::Track => "Track",
            FavouriteSortField::Artist => "Artist",
        }
    }

    pub fn apply<'a>(&self, favourites: &'a [Favourite], order: SortOrder) -> Vec<&'a Favourite> {
        let mut sorted: Vec<&Favourite> = favourites.iter().collect();
        sorted.sort_by(|a, b| {
            let ordering = match self {
                FavouriteSortField::AddedAt => a.added_at.cmp(&b.added_at),
                FavouriteSortField::Track => compare_names(&a.track_name, &b.track_name),
                FavouriteSortField::Artist => compare_names(&a.artist_name, &b.artist_name)
                    .then_with(|| compare_names(&a.track_name, &b.track_name)),
            };
            order.apply(ordering)
        });
        sorted
    }
}

impl FromStr for FavouriteSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(FavouriteSortField::AddedAt),
            "track" => Ok(FavouriteSortField::Track),
            "artist" => Ok(FavouriteSortField::Artist),
            other => Err(format!(
                "unknown sort field '{}' (expected one of: added, track, artist)",
                other
            )),
        }
    }
}
