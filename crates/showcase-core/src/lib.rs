//! Core of the showcase music discovery client.
//!
//! Everything that is not presentation lives here: the Last.fm catalog
//! client, the persisted favourites store, and the two listing controllers
//! that page results in as the user scrolls.

pub mod catalog;
pub mod config;
pub mod favourites;
pub mod format;
pub mod lastfm;
pub mod listing;
pub mod model;
pub mod platform;
pub mod search;
pub mod sort;
