// Terminal front end
pub mod guard;
pub mod intents;
pub mod page;
pub mod views;

pub use guard::{resolve, Access, LOGIN_ROUTE, SEARCH_ROUTE};
pub use intents::{Intent, IntentParseError};
pub use page::{Flow, Notice, SearchPage};
