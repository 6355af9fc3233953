//! Album overview listing: paged fetch-and-accumulate with scroll-driven
//! incremental loading.
//!
//! # States
//! ```text
//!  Idle ──reset──▶ Loading (page 1) ──ok──▶ Loaded ──request_more──▶ LoadingMore (page n+1)
//!                        │                    ▲                            │
//!                        │                    └────────────ok──────────────┘
//!                        └──────err──────▶ Error ◀──────────err────────────┘
//!  Error ──reset──▶ Loading (page 1)
//!  Error ──request_more──▶ LoadingMore (page n+1)   when page n is loaded
//! ```
//!
//! A reset (first load, new artist search, clearing the search) empties the
//! list and starts again from page 1. Incremental pages are appended as-is,
//! duplicates included. `has_more` is true only while pages come back full.
//!
//! The controller never performs IO itself. `begin_*` and `request_more`
//! hand out a `PageRequest` ticket; whoever runs the fetch feeds the result
//! back through `complete`. Every reset bumps the generation, and a ticket
//! from an older generation is dropped on arrival, so a slow page 2 from a
//! previous search cannot land in a fresh list. The async helpers at the
//! bottom wire the two halves together for callers that just want to await.

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::model::Album;
use crate::sort::SortOption;

/// Where the listing's albums come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumSource {
    /// The tag chart shown when nothing is searched.
    TopCharts,
    /// Top albums of one artist.
    Artist(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Idle,
    /// Fetching page 1 after a reset.
    Loading,
    Loaded,
    LoadingMore { page: u32 },
    Error,
}

/// One page fetch handed out by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub source: AlbumSource,
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn is_reset(&self) -> bool {
        self.page == 1
    }

    pub async fn fetch<C: Catalog>(&self, catalog: &C) -> Result<Vec<Album>, CatalogError> {
        match &self.source {
            AlbumSource::TopCharts => catalog.top_albums(self.page, self.limit).await,
            AlbumSource::Artist(artist) => {
                catalog.artist_albums(artist, self.page, self.limit).await
            }
        }
    }
}

pub struct AlbumListing {
    source: AlbumSource,
    albums: Vec<Album>,
    /// Last page successfully merged.
    page: u32,
    page_size: u32,
    has_more: bool,
    phase: ListingPhase,
    error: Option<String>,
    sort: SortOption,
    generation: u64,
}

impl AlbumListing {
    pub fn new(page_size: u32) -> Self {
        Self {
            source: AlbumSource::TopCharts,
            albums: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
            phase: ListingPhase::Idle,
            error: None,
            sort: SortOption::default(),
            generation: 0,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    pub fn begin_top_charts(&mut self) -> PageRequest {
        self.reset(AlbumSource::TopCharts)
    }

    /// Blank names are ignored and leave the listing as it is.
    pub fn begin_artist_search(&mut self, artist: &str) -> Option<PageRequest> {
        let artist = artist.trim();
        if artist.is_empty() {
            return None;
        }
        Some(self.reset(AlbumSource::Artist(artist.to_string())))
    }

    /// Leave artist search and go back to the chart.
    pub fn begin_clear_search(&mut self) -> PageRequest {
        self.reset(AlbumSource::TopCharts)
    }

    fn reset(&mut self, source: AlbumSource) -> PageRequest {
        self.generation += 1;
        self.source = source;
        self.albums.clear();
        self.page = 1;
        self.has_more = true;
        self.error = None;
        self.phase = ListingPhase::Loading;
        info!(
            "[listing] Reset to {:?} (generation {})",
            self.source, self.generation
        );
        self.ticket(1)
    }

    /// Scroll-sentinel trigger. Hands out the next page when nothing is in
    /// flight and the last page came back full; otherwise `None`. After a
    /// failed extra page the same page is asked for again. A failed first
    /// page has nothing to extend, so only a reset recovers from it.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        let settled = match self.phase {
            ListingPhase::Loaded => true,
            ListingPhase::Error => !self.albums.is_empty(),
            _ => false,
        };
        if !settled || !self.has_more {
            debug!(
                "[listing] request_more ignored (phase {:?}, has_more {})",
                self.phase, self.has_more
            );
            return None;
        }
        let page = self.page + 1;
        self.phase = ListingPhase::LoadingMore { page };
        self.error = None;
        Some(self.ticket(page))
    }

    fn ticket(&self, page: u32) -> PageRequest {
        PageRequest {
            generation: self.generation,
            source: self.source.clone(),
            page,
            limit: self.page_size,
        }
    }

    /// Merge a finished fetch. Returns `false` when the ticket is stale or
    /// not the one in flight, in which case nothing changes.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Album>, CatalogError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                "[listing] Dropping stale page {} (generation {} < {})",
                request.page, request.generation, self.generation
            );
            return false;
        }
        let in_flight = match self.phase {
            ListingPhase::Loading => request.page == 1,
            ListingPhase::LoadingMore { page } => request.page == page,
            _ => false,
        };
        if !in_flight {
            debug!(
                "[listing] Dropping page {} that is not in flight (phase {:?})",
                request.page, self.phase
            );
            return false;
        }

        match result {
            Ok(items) => {
                self.has_more = items.len() == request.limit as usize;
                debug!(
                    "[listing] Page {} brought {} album(s), has_more {}",
                    request.page,
                    items.len(),
                    self.has_more
                );
                if request.is_reset() {
                    self.albums = items;
                } else {
                    self.albums.extend(items);
                }
                self.page = request.page;
                self.error = None;
                self.phase = ListingPhase::Loaded;
            }
            Err(e) => {
                warn!("[listing] Page {} failed: {}", request.page, e);
                // a failed reset leaves nothing; a failed extra page keeps what we had
                if request.is_reset() {
                    self.albums.clear();
                }
                self.error = Some(e.to_string());
                self.phase = ListingPhase::Error;
            }
        }
        true
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    /// Accumulated albums in fetch order.
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    /// Accumulated albums in the current sort order.
    pub fn sorted(&self) -> Vec<&Album> {
        self.sort.apply(&self.albums)
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    pub fn source(&self) -> &AlbumSource {
        &self.source
    }

    pub fn is_artist_search(&self) -> bool {
        matches!(self.source, AlbumSource::Artist(_))
    }

    pub fn phase(&self) -> ListingPhase {
        self.phase
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Async helpers ─────────────────────────────────────────────────────────

    /// Fetch `request` and merge it. Returns what `complete` returns.
    pub async fn run<C: Catalog>(&mut self, catalog: &C, request: PageRequest) -> bool {
        let result = request.fetch(catalog).await;
        self.complete(&request, result)
    }

    pub async fn load_top_charts<C: Catalog>(&mut self, catalog: &C) {
        let request = self.begin_top_charts();
        self.run(catalog, request).await;
    }

    /// Returns `false` when the name was blank and nothing was fetched.
    pub async fn search_artist<C: Catalog>(&mut self, catalog: &C, artist: &str) -> bool {
        match self.begin_artist_search(artist) {
            Some(request) => {
                self.run(catalog, request).await;
                true
            }
            None => false,
        }
    }

    pub async fn clear_search<C: Catalog>(&mut self, catalog: &C) {
        let request = self.begin_clear_search();
        self.run(catalog, request).await;
    }

    /// Returns `false` when the trigger was ignored.
    pub async fn load_more<C: Catalog>(&mut self, catalog: &C) -> bool {
        match self.request_more() {
            Some(request) => {
                self.run(catalog, request).await;
                true
            }
            None => false,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtistRef;

    fn albums(prefix: &str, n: usize) -> Vec<Album> {
        (0..n)
            .map(|i| Album {
                name: format!("{} {}", prefix, i),
                artist: ArtistRef::Name(prefix.to_string()),
                image: Vec::new(),
                playcount: Some((i * 10).to_string()),
                url: None,
                mbid: None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let listing = AlbumListing::new(8);
        assert_eq!(listing.phase(), ListingPhase::Idle);
        assert!(listing.albums().is_empty());
        assert!(listing.has_more());
        assert_eq!(listing.generation(), 0);
    }

    #[test]
    fn test_request_more_ignored_before_first_load() {
        let mut listing = AlbumListing::new(8);
        assert!(listing.request_more().is_none());
        assert_eq!(listing.phase(), ListingPhase::Idle);
    }

    #[test]
    fn test_full_page_keeps_has_more() {
        let mut listing = AlbumListing::new(8);
        let req = listing.begin_top_charts();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 8);
        assert_eq!(listing.phase(), ListingPhase::Loading);

        assert!(listing.complete(&req, Ok(albums("chart", 8))));
        assert_eq!(listing.phase(), ListingPhase::Loaded);
        assert!(listing.has_more());
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_short_page_ends_listing() {
        let mut listing = AlbumListing::new(8);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 8)));

        let more = listing.request_more().unwrap();
        assert_eq!(more.page, 2);
        assert_eq!(listing.phase(), ListingPhase::LoadingMore { page: 2 });
        listing.complete(&more, Ok(albums("more", 3)));

        assert_eq!(listing.albums().len(), 11);
        assert_eq!(listing.albums()[8].name, "more 0");
        assert!(!listing.has_more());
        assert_eq!(listing.page(), 2);
        assert!(listing.request_more().is_none());
    }

    #[test]
    fn test_empty_page_is_end_not_error() {
        let mut listing = AlbumListing::new(8);
        let req = listing.begin_artist_search("Nobody").unwrap();
        listing.complete(&req, Ok(Vec::new()));
        assert_eq!(listing.phase(), ListingPhase::Loaded);
        assert!(listing.error().is_none());
        assert!(!listing.has_more());
    }

    #[test]
    fn test_request_more_ignored_while_in_flight() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        assert!(listing.request_more().is_none());
        listing.complete(&req, Ok(albums("a", 2)));

        let more = listing.request_more().unwrap();
        // sentinel fires again before page 2 lands
        assert!(listing.request_more().is_none());
        listing.complete(&more, Ok(albums("b", 2)));
        assert_eq!(listing.request_more().unwrap().page, 3);
    }

    #[test]
    fn test_incremental_pages_are_not_deduplicated() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("same", 2)));
        let more = listing.request_more().unwrap();
        listing.complete(&more, Ok(albums("same", 2)));
        assert_eq!(listing.albums().len(), 4);
        assert_eq!(listing.albums()[0], listing.albums()[2]);
    }

    #[test]
    fn test_reset_replaces_list() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 2)));
        let more = listing.request_more().unwrap();
        listing.complete(&more, Ok(albums("chart-2", 2)));

        let search = listing.begin_artist_search("  Coldplay ").unwrap();
        assert_eq!(search.source, AlbumSource::Artist("Coldplay".into()));
        assert!(listing.albums().is_empty());
        assert_eq!(listing.page(), 1);
        assert!(listing.has_more());

        listing.complete(&search, Ok(albums("Coldplay", 1)));
        assert_eq!(listing.albums().len(), 1);
        assert_eq!(listing.albums()[0].name, "Coldplay 0");
        assert_eq!(listing.page(), 1);
        assert!(listing.is_artist_search());
    }

    #[test]
    fn test_blank_artist_search_is_ignored() {
        let mut listing = AlbumListing::new(8);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 8)));
        assert!(listing.begin_artist_search("   ").is_none());
        assert_eq!(listing.albums().len(), 8);
        assert_eq!(listing.source(), &AlbumSource::TopCharts);
    }

    #[test]
    fn test_stale_page_after_reset_is_dropped() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 2)));
        let stale_more = listing.request_more().unwrap();

        // user searches while page 2 of the chart is still out
        let search = listing.begin_artist_search("Coldplay").unwrap();
        listing.complete(&search, Ok(albums("Coldplay", 2)));

        assert!(!listing.complete(&stale_more, Ok(albums("chart-2", 2))));
        assert_eq!(listing.albums().len(), 2);
        assert!(listing.albums().iter().all(|a| a.name.starts_with("Coldplay")));
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_stale_first_page_is_dropped_while_new_one_loads() {
        let mut listing = AlbumListing::new(2);
        let first = listing.begin_artist_search("Muse").unwrap();
        let second = listing.begin_artist_search("Blur").unwrap();
        assert!(!listing.complete(&first, Ok(albums("Muse", 2))));
        assert_eq!(listing.phase(), ListingPhase::Loading);
        assert!(listing.complete(&second, Ok(albums("Blur", 1))));
        assert_eq!(listing.albums()[0].name, "Blur 0");
    }

    #[test]
    fn test_duplicate_completion_is_dropped() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        assert!(listing.complete(&req, Ok(albums("a", 2))));
        assert!(!listing.complete(&req, Ok(albums("b", 2))));
        assert_eq!(listing.albums()[0].name, "a 0");
    }

    #[test]
    fn test_failed_reset_clears_list() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 2)));

        let search = listing.begin_artist_search("Coldplay").unwrap();
        listing.complete(&search, Err(CatalogError::ArtistAlbums));
        assert_eq!(listing.phase(), ListingPhase::Error);
        assert!(listing.albums().is_empty());
        assert_eq!(listing.error(), Some("Failed to fetch artist albums"));
        assert!(listing.request_more().is_none());
    }

    #[test]
    fn test_failed_more_keeps_list() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 2)));
        let more = listing.request_more().unwrap();
        listing.complete(&more, Err(CatalogError::TopAlbums));

        assert_eq!(listing.phase(), ListingPhase::Error);
        assert_eq!(listing.albums().len(), 2);
        assert_eq!(listing.page(), 1);
        assert_eq!(listing.error(), Some("Failed to fetch top albums"));

        // scrolling again retries the page that failed
        let retry = listing.request_more().unwrap();
        assert_eq!(retry.page, 2);
        assert_eq!(listing.phase(), ListingPhase::LoadingMore { page: 2 });
        assert!(listing.error().is_none());
        listing.complete(&retry, Ok(albums("chart-2", 1)));
        assert_eq!(listing.albums().len(), 3);
        assert_eq!(listing.page(), 2);
        assert!(!listing.has_more());
    }

    #[test]
    fn test_error_recovers_on_resubmit() {
        let mut listing = AlbumListing::new(2);
        let req = listing.begin_top_charts();
        listing.complete(&req, Err(CatalogError::TopAlbums));

        let retry = listing.begin_clear_search();
        assert_eq!(listing.phase(), ListingPhase::Loading);
        assert!(listing.error().is_none());
        listing.complete(&retry, Ok(albums("chart", 2)));
        assert_eq!(listing.phase(), ListingPhase::Loaded);
    }

    #[test]
    fn test_sort_is_a_view() {
        let mut listing = AlbumListing::new(3);
        let req = listing.begin_top_charts();
        listing.complete(&req, Ok(albums("chart", 3)));
        let generation = listing.generation();

        listing.set_sort(SortOption::PopularityDesc);
        let sorted: Vec<&str> = listing.sorted().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(sorted, ["chart 2", "chart 1", "chart 0"]);
        assert_eq!(listing.albums()[0].name, "chart 0");
        assert_eq!(listing.phase(), ListingPhase::Loaded);
        assert_eq!(listing.generation(), generation);
    }
}
