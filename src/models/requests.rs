use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{SearchFilters, SortOrder};

/// Credentials for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Query for `GET /dogs/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogSearchQuery {
    pub filters: SearchFilters,
    pub sort: SortOrder,
    pub offset: u64,
    pub limit: u32,
}

impl DogSearchQuery {
    /// Ordered key/value pairs, with `breeds` repeated once per breed
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(self.filters.breeds.len() + 5);

        for breed in &self.filters.breeds {
            pairs.push(("breeds", breed.clone()));
        }
        if let Some(age_min) = self.filters.age_min {
            pairs.push(("ageMin", age_min.to_string()));
        }
        if let Some(age_max) = self.filters.age_max {
            pairs.push(("ageMax", age_max.to_string()));
        }
        pairs.push(("sort", self.sort.to_string()));
        pairs.push(("size", self.limit.to_string()));
        pairs.push(("from", self.offset.to_string()));

        pairs
    }

    /// Percent-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Body for `POST /locations/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
}
