use std::str::FromStr;
use thiserror::Error;

use crate::models::{FilterUpdate, ParseSortError, SortOrder};

/// A user action on the search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Filter(FilterUpdate),
    ClearFilters,
    Sort(SortOrder),
    Page(u32),
    NextPage,
    PrevPage,
    Refresh,
    ToggleFavorite(String),
    ClearFavorites,
    Match,
    CloseMatch,
    Breeds,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: String, reason: String },

    #[error(transparent)]
    Sort(#[from] ParseSortError),
}

pub const HELP: &str = "\
commands:
  filter [breeds=A,B] [min=N] [max=N]   change filters (min= / max= unset a bound)
  clear                                  clear all filters
  sort breed:asc|breed:desc              change sort order
  page N | next | prev                   move between pages
  refresh                                reload the current page
  fav ID                                 toggle a favorite
  clear-favs                             remove all favorites
  match | close                          generate a match / close it
  breeds                                 list known breeds
  logout | quit";

impl FromStr for Intent {
    type Err = IntentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "" => Err(IntentParseError::Empty),
            "filter" => parse_filter(rest).map(Intent::Filter),
            "clear" => Ok(Intent::ClearFilters),
            "sort" => Ok(Intent::Sort(rest.parse()?)),
            "page" => {
                if rest.is_empty() {
                    return Err(IntentParseError::MissingArgument("page"));
                }
                rest.parse::<u32>()
                    .map(Intent::Page)
                    .map_err(|e| IntentParseError::InvalidArgument {
                        arg: rest.to_string(),
                        reason: e.to_string(),
                    })
            }
            "next" => Ok(Intent::NextPage),
            "prev" => Ok(Intent::PrevPage),
            "refresh" => Ok(Intent::Refresh),
            "fav" => {
                if rest.is_empty() {
                    Err(IntentParseError::MissingArgument("fav"))
                } else {
                    Ok(Intent::ToggleFavorite(rest.to_string()))
                }
            }
            "clear-favs" => Ok(Intent::ClearFavorites),
            "match" => Ok(Intent::Match),
            "close" => Ok(Intent::CloseMatch),
            "breeds" => Ok(Intent::Breeds),
            "logout" => Ok(Intent::Logout),
            "help" | "?" => Ok(Intent::Help),
            "quit" | "exit" => Ok(Intent::Quit),
            other => Err(IntentParseError::Unknown(other.to_string())),
        }
    }
}

/// Parse `key=value` arguments. Values may contain spaces ("Golden Retriever");
/// a word without a known `key=` prefix continues the previous value.
fn parse_filter(args: &str) -> Result<FilterUpdate, IntentParseError> {
    let mut pairs: Vec<(FilterKey, String)> = Vec::new();

    for word in args.split_whitespace() {
        let known = word
            .split_once('=')
            .and_then(|(key, value)| FilterKey::parse(key).map(|key| (key, value)));

        match known {
            Some((key, value)) => pairs.push((key, value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => {
                    return Err(IntentParseError::InvalidArgument {
                        arg: word.to_string(),
                        reason: "expected breeds=, min= or max=".to_string(),
                    })
                }
            },
        }
    }

    if pairs.is_empty() {
        return Err(IntentParseError::MissingArgument("filter"));
    }

    let mut update = FilterUpdate::new();
    for (key, value) in pairs {
        match key {
            FilterKey::Breeds => {
                update = update.breeds(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|b| !b.is_empty()),
                );
            }
            FilterKey::Min => update = update.age_min(parse_age(&value)?),
            FilterKey::Max => update = update.age_max(parse_age(&value)?),
        }
    }

    Ok(update)
}

#[derive(Debug, Clone, Copy)]
enum FilterKey {
    Breeds,
    Min,
    Max,
}

impl FilterKey {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "breeds" => Some(FilterKey::Breeds),
            "min" => Some(FilterKey::Min),
            "max" => Some(FilterKey::Max),
            _ => None,
        }
    }
}

fn parse_age(value: &str) -> Result<Option<u32>, IntentParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|e| IntentParseError::InvalidArgument {
            arg: value.to_string(),
            reason: e.to_string(),
        })
}
