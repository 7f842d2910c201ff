// In-memory catalog used by the workflow and page tests

#![allow(dead_code)]

use doggo_discovery::models::{
    Dog, DogSearchQuery, Location, LocationSearchQuery, LocationSearchResponse, SearchResponse,
    SortDirection,
};
use doggo_discovery::services::{restore_order, CatalogApi, CatalogError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn dog(id: &str, breed: &str, age: u32) -> Dog {
    Dog {
        id: id.to_string(),
        name: format!("Dog {}", id),
        breed: breed.to_string(),
        age,
        zip_code: "78701".to_string(),
        img: format!("https://img.test/{}.jpg", id),
    }
}

/// Canned failure for the next calls to one endpoint
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unauthorized,
    Server,
}

impl Failure {
    fn to_error(self) -> CatalogError {
        match self {
            Failure::Unauthorized => CatalogError::Unauthorized {
                status: 401,
                message: "Unauthorized".to_string(),
            },
            Failure::Server => CatalogError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            },
        }
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub dogs: Vec<Dog>,
    pub breeds: Vec<String>,
    pub match_id: Option<String>,
    /// Delay applied to searches whose first breed filter is the key
    pub search_delays: HashMap<String, Duration>,
    pub search_failure: Mutex<Option<Failure>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeCatalog {
    pub fn with_dogs(dogs: Vec<Dog>) -> Self {
        let mut breeds: Vec<String> = dogs.iter().map(|d| d.breed.clone()).collect();
        breeds.sort();
        breeds.dedup();
        Self {
            dogs,
            breeds,
            ..Default::default()
        }
    }

    pub fn delay(mut self, breed: &str, delay: Duration) -> Self {
        self.search_delays.insert(breed.to_string(), delay);
        self
    }

    pub fn matching(mut self, id: &str) -> Self {
        self.match_id = Some(id.to_string());
        self
    }

    pub fn fail_searches(&self, failure: Option<Failure>) {
        *self.search_failure.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CatalogApi for FakeCatalog {
    async fn login(&self, _name: &str, _email: &str) -> Result<(), CatalogError> {
        self.record("login");
        Ok(())
    }

    async fn logout(&self) -> Result<(), CatalogError> {
        self.record("logout");
        Ok(())
    }

    async fn list_breeds(&self) -> Result<Vec<String>, CatalogError> {
        self.record("breeds");
        Ok(self.breeds.clone())
    }

    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<SearchResponse, CatalogError> {
        self.record("search");

        if let Some(delay) = query
            .filters
            .breeds
            .first()
            .and_then(|b| self.search_delays.get(b))
        {
            tokio::time::sleep(*delay).await;
        }

        if let Some(failure) = *self.search_failure.lock().unwrap() {
            return Err(failure.to_error());
        }

        let filters = &query.filters;
        let mut hits: Vec<&Dog> = self
            .dogs
            .iter()
            .filter(|d| filters.breeds.is_empty() || filters.breeds.contains(&d.breed))
            .filter(|d| filters.age_min.map_or(true, |min| d.age >= min))
            .filter(|d| filters.age_max.map_or(true, |max| d.age <= max))
            .collect();

        hits.sort_by(|a, b| a.breed.cmp(&b.breed).then_with(|| a.id.cmp(&b.id)));
        if query.sort.direction == SortDirection::Desc {
            hits.reverse();
        }

        let total = hits.len() as u64;
        let result_ids = hits
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|d| d.id.clone())
            .collect();

        Ok(SearchResponse {
            result_ids,
            total,
            next: None,
            prev: None,
        })
    }

    async fn get_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.record("dogs");

        // Hand records back in reverse to exercise order restoration
        let mut found: Vec<Dog> = self
            .dogs
            .iter()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect();
        found.reverse();
        Ok(restore_order(ids, found))
    }

    async fn get_match(&self, ids: &[String]) -> Result<String, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::Precondition("empty".to_string()));
        }
        self.record("match");
        Ok(self.match_id.clone().unwrap_or_else(|| ids[0].clone()))
    }

    async fn get_locations(&self, zip_codes: &[String]) -> Result<Vec<Location>, CatalogError> {
        self.record("locations");
        Ok(zip_codes
            .iter()
            .map(|zip| Location {
                zip_code: zip.clone(),
                latitude: 30.27,
                longitude: -97.74,
                city: "Austin".to_string(),
                state: "TX".to_string(),
                county: "Travis".to_string(),
            })
            .collect())
    }

    async fn search_locations(
        &self,
        _query: &LocationSearchQuery,
    ) -> Result<LocationSearchResponse, CatalogError> {
        self.record("location_search");
        Ok(LocationSearchResponse {
            results: Vec::new(),
            total: 0,
        })
    }
}
