use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::pagination::{PageState, PAGE_SIZE};
use crate::models::{Dog, DogSearchQuery, FilterUpdate, SearchFilters, SortOrder};
use crate::services::{CatalogApi, CatalogError};

/// A search request tagged with the generation it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: DogSearchQuery,
}

/// One materialized page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub dogs: Vec<Dog>,
    pub total: u64,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Results replaced the displayed page
    Applied,
    /// A newer request was issued meanwhile; the response was dropped
    Stale,
}

/// Search, filter and pagination state.
///
/// Every mutating operation returns a [`SearchTicket`] that must be fetched
/// and handed back to [`SearchState::apply`]. Only the ticket from the most
/// recent operation is applied; older ones are discarded whatever order they
/// complete in.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    filters: SearchFilters,
    sort: SortOrder,
    page: PageState,
    dogs: Vec<Dog>,
    generation: u64,
    loading: bool,
    last_error: Option<String>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    /// Dogs on the displayed page, in search ranking order
    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Request derived from the current filters, sort and page
    pub fn query(&self) -> DogSearchQuery {
        DogSearchQuery {
            filters: self.filters.clone(),
            sort: self.sort,
            offset: self.page.offset(),
            limit: PAGE_SIZE,
        }
    }

    pub fn set_filters(&mut self, update: FilterUpdate) -> SearchTicket {
        self.filters.apply(update);
        self.page.reset();
        self.issue()
    }

    /// Drop every filter but keep the sort order
    pub fn clear_filters(&mut self) -> SearchTicket {
        self.filters = SearchFilters::default();
        self.page.reset();
        self.issue()
    }

    pub fn set_sort(&mut self, order: SortOrder) -> SearchTicket {
        self.sort = order;
        self.page.reset();
        self.issue()
    }

    /// Pages beyond the last known total are still requested
    pub fn set_page(&mut self, n: u32) -> SearchTicket {
        self.page.set_current(n);
        self.issue()
    }

    pub fn refresh(&mut self) -> SearchTicket {
        self.issue()
    }

    fn issue(&mut self) -> SearchTicket {
        self.generation += 1;
        self.loading = true;

        let query = self.query();
        tracing::debug!(
            "Issuing search generation {} (from={}, size={})",
            self.generation,
            query.offset,
            query.limit
        );

        SearchTicket {
            generation: self.generation,
            query,
        }
    }

    /// Apply the result of the fetch for `generation`.
    ///
    /// Failures leave the displayed page and total untouched and are returned
    /// to the caller. Results for superseded generations are dropped,
    /// including failures.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<SearchResults, CatalogError>,
    ) -> Result<FetchOutcome, CatalogError> {
        if generation != self.generation {
            tracing::warn!(
                "Discarding stale search response (generation {}, current {})",
                generation,
                self.generation
            );
            return Ok(FetchOutcome::Stale);
        }

        self.loading = false;

        match result {
            Ok(results) => {
                self.page.set_total(results.total);
                self.dogs = results.dogs;
                self.last_error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                tracing::error!("Search generation {} failed: {}", generation, e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Run one search: ranked ids first, then the records for those ids
pub async fn fetch_page<C: CatalogApi>(
    api: &C,
    query: &DogSearchQuery,
) -> Result<SearchResults, CatalogError> {
    let response = api.search_dogs(query).await?;
    let dogs = api.get_dogs(&response.result_ids).await?;

    Ok(SearchResults {
        dogs,
        total: response.total,
    })
}

/// Drives a [`SearchState`] against the catalog service.
///
/// Methods take `&self`, so several fetches may be in flight at once; the
/// state lock is never held across a network call.
pub struct SearchController<C> {
    api: Arc<C>,
    state: Mutex<SearchState>,
}

impl<C: CatalogApi> SearchController<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self {
            api,
            state: Mutex::new(SearchState::new()),
        }
    }

    /// Copy of the current state for rendering
    pub async fn state(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    pub async fn set_filters(&self, update: FilterUpdate) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.state.lock().await.set_filters(update);
        self.run(ticket).await
    }

    pub async fn clear_filters(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.state.lock().await.clear_filters();
        self.run(ticket).await
    }

    pub async fn set_sort(&self, order: SortOrder) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.state.lock().await.set_sort(order);
        self.run(ticket).await
    }

    pub async fn set_page(&self, n: u32) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.state.lock().await.set_page(n);
        self.run(ticket).await
    }

    pub async fn refresh(&self) -> Result<FetchOutcome, CatalogError> {
        let ticket = self.state.lock().await.refresh();
        self.run(ticket).await
    }

    async fn run(&self, ticket: SearchTicket) -> Result<FetchOutcome, CatalogError> {
        let result = fetch_page(self.api.as_ref(), &ticket.query).await;
        let outcome = self.state.lock().await.apply(ticket.generation, result)?;

        if outcome == FetchOutcome::Applied {
            tracing::info!("Loaded page {} (generation {})", ticket.query.offset / u64::from(PAGE_SIZE) + 1, ticket.generation);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.to_string(),
            name: id.to_uppercase(),
            breed: "Labrador".to_string(),
            age: 3,
            zip_code: "10001".to_string(),
            img: String::new(),
        }
    }

    fn results(ids: &[&str], total: u64) -> SearchResults {
        SearchResults {
            dogs: ids.iter().map(|id| dog(id)).collect(),
            total,
        }
    }

    #[test]
    fn test_labrador_scenario_derivation() {
        let mut state = SearchState::new();
        let ticket = state.set_filters(
            FilterUpdate::new()
                .breeds(["Labrador"])
                .age_min(Some(2))
                .age_max(Some(5)),
        );

        assert_eq!(ticket.query.sort, SortOrder::BREED_ASC);
        assert_eq!(ticket.query.offset, 0);
        assert_eq!(ticket.query.limit, 15);
        assert_eq!(ticket.query.filters.breeds, vec!["Labrador"]);

        let outcome = state.apply(ticket.generation, Ok(results(&["a"], 42))).unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(state.page().total_pages(), 3);
    }

    #[test]
    fn test_every_filter_change_resets_page() {
        let mut state = SearchState::new();
        state.set_page(4);
        state.set_filters(FilterUpdate::new().age_min(Some(1)));
        assert_eq!(state.page().current(), 1);

        state.set_page(2);
        state.set_sort(SortOrder::BREED_DESC);
        assert_eq!(state.page().current(), 1);

        state.set_page(3);
        state.clear_filters();
        assert_eq!(state.page().current(), 1);
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let mut state = SearchState::new();
        state.set_sort(SortOrder::BREED_DESC);
        state.set_filters(FilterUpdate::new().breeds(["Poodle"]).age_min(Some(1)));

        let ticket = state.clear_filters();

        assert_eq!(state.filters(), &SearchFilters::default());
        assert_eq!(ticket.query.sort, SortOrder::BREED_DESC);
    }

    #[test]
    fn test_set_page_out_of_range_still_issues() {
        let mut state = SearchState::new();
        let first = state.refresh();
        state.apply(first.generation, Ok(results(&["a"], 20))).unwrap();

        let ticket = state.set_page(9);
        assert_eq!(ticket.query.offset, 120);
        assert!(!state.page().has_next());
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut state = SearchState::new();
        let a = state.set_filters(FilterUpdate::new().breeds(["Akita"]));
        let b = state.set_filters(FilterUpdate::new().breeds(["Boxer"]));

        // B completes first, then A
        assert_eq!(state.apply(b.generation, Ok(results(&["b1"], 1))).unwrap(), FetchOutcome::Applied);
        assert_eq!(state.apply(a.generation, Ok(results(&["a1", "a2"], 2))).unwrap(), FetchOutcome::Stale);

        assert_eq!(state.dogs()[0].id, "b1");
        assert_eq!(state.page().total(), 1);
    }

    #[test]
    fn test_stale_failure_is_not_surfaced() {
        let mut state = SearchState::new();
        let a = state.refresh();
        let b = state.refresh();

        let stale = state.apply(a.generation, Err(CatalogError::Api { status: 500, message: "boom".into() }));
        assert_eq!(stale.unwrap(), FetchOutcome::Stale);
        assert!(state.is_loading());

        state.apply(b.generation, Ok(results(&[], 0))).unwrap();
        assert!(!state.is_loading());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_failure_keeps_last_good_page() {
        let mut state = SearchState::new();
        let first = state.refresh();
        state.apply(first.generation, Ok(results(&["a", "b"], 30))).unwrap();

        let next = state.set_page(2);
        let err = state
            .apply(next.generation, Err(CatalogError::Api { status: 503, message: "Service Unavailable".into() }))
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(state.dogs().len(), 2);
        assert_eq!(state.page().total(), 30);
        assert_eq!(state.last_error(), Some("API returned error (503): Service Unavailable"));
    }
}
