// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Dog, Location, SearchFilters, FilterUpdate, SortOrder, SortField, SortDirection, ParseSortError};
pub use requests::{LoginRequest, DogSearchQuery, LocationSearchQuery};
pub use responses::{SearchResponse, MatchResponse, LocationSearchResponse, ApiErrorBody};
