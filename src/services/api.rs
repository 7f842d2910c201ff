use std::collections::HashMap;

use crate::models::{Dog, DogSearchQuery, Location, LocationSearchQuery, LocationSearchResponse, SearchResponse};
use crate::services::catalog::CatalogError;

/// Operations the search and match workflows need from the catalog service.
///
/// [`crate::services::CatalogClient`] implements this over HTTP; tests use
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Establish a session. The credential lives in the transport's cookie store.
    async fn login(&self, name: &str, email: &str) -> Result<(), CatalogError>;

    async fn logout(&self) -> Result<(), CatalogError>;

    /// All breed names, in service order
    async fn list_breeds(&self) -> Result<Vec<String>, CatalogError>;

    /// Ranked dog ids for one page plus the total number of matches
    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<SearchResponse, CatalogError>;

    /// Full records for `ids`, in the same order as `ids`.
    ///
    /// An empty slice yields an empty result without a request.
    async fn get_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, CatalogError>;

    /// One dog id chosen by the service from `ids`.
    ///
    /// Fails with [`CatalogError::Precondition`] on an empty slice.
    async fn get_match(&self, ids: &[String]) -> Result<String, CatalogError>;

    async fn get_locations(&self, zip_codes: &[String]) -> Result<Vec<Location>, CatalogError>;

    async fn search_locations(
        &self,
        query: &LocationSearchQuery,
    ) -> Result<LocationSearchResponse, CatalogError>;
}

/// Reorder `dogs` to follow `ids`.
///
/// Ids with no matching record are skipped and duplicate records are ignored.
pub fn restore_order(ids: &[String], dogs: Vec<Dog>) -> Vec<Dog> {
    let mut by_id: HashMap<String, Dog> = HashMap::with_capacity(dogs.len());
    for dog in dogs {
        by_id.entry(dog.id.clone()).or_insert(dog);
    }

    let mut ordered = Vec::with_capacity(ids.len());
    for id in ids {
        match by_id.remove(id) {
            Some(dog) => ordered.push(dog),
            None => tracing::warn!("Catalog returned no record for dog {}", id),
        }
    }

    ordered
}
