// Core state machines
pub mod favorites;
pub mod matching;
pub mod pagination;
pub mod search;

pub use favorites::FavoriteSet;
pub use matching::{generate_match, MatchPhase, MatchWorkflow};
pub use pagination::{PageState, PAGE_SIZE};
pub use search::{fetch_page, FetchOutcome, SearchController, SearchResults, SearchState, SearchTicket};
