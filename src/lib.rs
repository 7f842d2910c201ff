//! Doggo Discovery - search, favorite and match shelter dogs
//!
//! A thin client over the remote dog catalog service. The catalog owns the
//! data and the matching algorithm; this crate owns the search/filter/page
//! state, the favorite set and the match workflow around it.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod ui;

// Re-export commonly used types
pub use crate::core::{FavoriteSet, MatchPhase, MatchWorkflow, PageState, SearchController, SearchState, PAGE_SIZE};
pub use models::{Dog, FilterUpdate, SearchFilters, SortOrder};
pub use services::{CatalogApi, CatalogClient, CatalogError, RequestLog, SessionStatus};
