use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A shelter dog as returned by the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub zip_code: String,
    pub img: String,
}

/// A US location keyed by zip code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub county: String,
}

/// Active search criteria
///
/// Breeds keep the order the caller supplied them in. An empty breed list
/// means "any breed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub breeds: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
}

impl SearchFilters {
    /// True when any criterion narrows the search
    pub fn is_active(&self) -> bool {
        !self.breeds.is_empty() || self.age_min.is_some() || self.age_max.is_some()
    }

    /// Apply a partial update; fields the update leaves untouched keep their value
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(breeds) = update.breeds {
            self.breeds = breeds;
        }
        if let Some(age_min) = update.age_min {
            self.age_min = age_min;
        }
        if let Some(age_max) = update.age_max {
            self.age_max = age_max;
        }
    }
}

/// Partial change to [`SearchFilters`]
///
/// `None` keeps the current value. For the age bounds, `Some(None)` unsets the
/// bound and `Some(Some(n))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub breeds: Option<Vec<String>>,
    pub age_min: Option<Option<u32>>,
    pub age_max: Option<Option<u32>>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breeds<I, S>(mut self, breeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.breeds = Some(breeds.into_iter().map(Into::into).collect());
        self
    }

    pub fn age_min(mut self, age_min: Option<u32>) -> Self {
        self.age_min = Some(age_min);
        self
    }

    pub fn age_max(mut self, age_max: Option<u32>) -> Self {
        self.age_max = Some(age_max);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_none() && self.age_min.is_none() && self.age_max.is_none()
    }
}

/// The only field the catalog service sorts on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Breed,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Breed => "breed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort order sent as `field:dir`, `breed:asc` by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub const BREED_ASC: SortOrder = SortOrder {
        field: SortField::Breed,
        direction: SortDirection::Asc,
    };

    pub const BREED_DESC: SortOrder = SortOrder {
        field: SortField::Breed,
        direction: SortDirection::Desc,
    };

    /// Human readable label used by the filter panel
    pub fn label(&self) -> &'static str {
        match (self.field, self.direction) {
            (SortField::Breed, SortDirection::Asc) => "Breed (A-Z)",
            (SortField::Breed, SortDirection::Desc) => "Breed (Z-A)",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort order '{0}', expected breed:asc or breed:desc")]
pub struct ParseSortError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "breed:asc" => Ok(SortOrder::BREED_ASC),
            "breed:desc" => Ok(SortOrder::BREED_DESC),
            other => Err(ParseSortError(other.to_string())),
        }
    }
}
