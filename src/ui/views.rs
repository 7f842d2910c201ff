use std::collections::HashMap;
use std::fmt::Write;

use crate::core::{FavoriteSet, MatchPhase, PageState, SearchState};
use crate::models::{Dog, Location, SearchFilters, SortOrder};

/// Pagination controls derived from the last known total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl From<&PageState> for PaginationView {
    fn from(page: &PageState) -> Self {
        Self {
            label: format!("Page {} of {}", page.current(), page.total_pages()),
            prev_enabled: page.has_prev(),
            next_enabled: page.has_next(),
        }
    }
}

/// "Find Match" button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchButtonView {
    pub label: String,
    pub enabled: bool,
}

impl From<&FavoriteSet> for MatchButtonView {
    fn from(favorites: &FavoriteSet) -> Self {
        let label = if favorites.is_empty() {
            "Find Match".to_string()
        } else {
            format!("Find Match ({})", favorites.len())
        };

        Self {
            label,
            enabled: !favorites.is_empty(),
        }
    }
}

pub fn dog_card(dog: &Dog, is_favorite: bool, location: Option<&Location>) -> String {
    let heart = if is_favorite { "♥" } else { "♡" };
    let place = match location {
        Some(loc) => format!("{} ({}, {})", dog.zip_code, loc.city, loc.state),
        None => dog.zip_code.clone(),
    };
    let years = if dog.age == 1 { "yr" } else { "yrs" };

    format!(
        "{} {} [{}]\n    {} · {} {} · {}",
        heart, dog.name, dog.id, dog.breed, dog.age, years, place
    )
}

pub fn filters_panel(filters: &SearchFilters, sort: SortOrder) -> String {
    let breeds = if filters.breeds.is_empty() {
        "any".to_string()
    } else {
        filters.breeds.join(", ")
    };
    let bound = |b: Option<u32>| b.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    let clear = if filters.is_active() { "clear: available" } else { "clear: no active filters" };

    format!(
        "Sort: {} | Breeds: {} | Age: {}..{} | {}",
        sort.label(),
        breeds,
        bound(filters.age_min),
        bound(filters.age_max),
        clear
    )
}

pub fn pagination(page: &PageState) -> String {
    let view = PaginationView::from(page);
    format!(
        "{} {} {}",
        if view.prev_enabled { "[prev]" } else { "(prev)" },
        view.label,
        if view.next_enabled { "[next]" } else { "(next)" },
    )
}

/// Modal body, only while a match is being presented
pub fn match_modal(phase: &MatchPhase) -> Option<String> {
    phase.presented().map(|dog| {
        format!(
            "*** It's a Match! ***\n{} the {}, {} years old, {}\n{}\n(type 'close' to dismiss)",
            dog.name, dog.breed, dog.age, dog.zip_code, dog.img
        )
    })
}

/// Everything on the search page, top to bottom
pub fn search_page(
    state: &SearchState,
    favorites: &FavoriteSet,
    locations: &HashMap<String, Location>,
    phase: &MatchPhase,
) -> String {
    let mut out = String::new();
    let button = MatchButtonView::from(favorites);

    let _ = writeln!(out, "== Find Your Perfect Companion ==");
    let _ = writeln!(
        out,
        "{}{}",
        button.label,
        if button.enabled { "" } else { " (favorite a dog to enable)" }
    );
    let _ = writeln!(out, "{}", filters_panel(state.filters(), state.sort()));

    // Dogs and total still reflect the last successful fetch
    if let Some(err) = state.last_error() {
        let _ = writeln!(out, "! Search failed ({}); showing previous results. Type `refresh` to retry.", err);
    }

    if state.is_loading() {
        let _ = writeln!(out, "Loading dogs...");
    } else if state.dogs().is_empty() {
        let _ = writeln!(out, "No dogs match these filters.");
    }

    for dog in state.dogs() {
        let card = dog_card(dog, favorites.contains(&dog.id), locations.get(&dog.zip_code));
        let _ = writeln!(out, "{}", card);
    }

    let _ = write!(out, "{}", pagination(state.page()));

    if let Some(modal) = match_modal(phase) {
        let _ = write!(out, "\n\n{}", modal);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog() -> Dog {
        Dog {
            id: "d1".to_string(),
            name: "Rex".to_string(),
            breed: "Labrador".to_string(),
            age: 3,
            zip_code: "78701".to_string(),
            img: "https://img/d1.jpg".to_string(),
        }
    }

    #[test]
    fn test_pagination_controls_disabled_at_edges() {
        let mut page = PageState::default();
        page.set_total(42);

        let first = PaginationView::from(&page);
        assert_eq!(first.label, "Page 1 of 3");
        assert!(!first.prev_enabled);
        assert!(first.next_enabled);

        page.set_current(3);
        let last = PaginationView::from(&page);
        assert!(last.prev_enabled);
        assert!(!last.next_enabled);
    }

    #[test]
    fn test_match_button_needs_favorites() {
        let mut favorites = FavoriteSet::new();
        assert!(!MatchButtonView::from(&favorites).enabled);

        favorites.toggle("d1");
        let button = MatchButtonView::from(&favorites);
        assert!(button.enabled);
        assert_eq!(button.label, "Find Match (1)");
    }

    #[test]
    fn test_dog_card_with_location() {
        let location = Location {
            zip_code: "78701".to_string(),
            latitude: 30.27,
            longitude: -97.74,
            city: "Austin".to_string(),
            state: "TX".to_string(),
            county: "Travis".to_string(),
        };

        let card = dog_card(&dog(), true, Some(&location));
        assert!(card.starts_with("♥ Rex [d1]"));
        assert!(card.contains("Austin, TX"));
    }

    #[test]
    fn test_match_modal_only_when_presenting() {
        assert!(match_modal(&MatchPhase::Idle).is_none());
        assert!(match_modal(&MatchPhase::Resolving).is_none());
        let body = match_modal(&MatchPhase::Presenting(dog())).unwrap();
        assert!(body.contains("Rex the Labrador"));
    }

    #[test]
    fn test_filters_panel() {
        let filters = SearchFilters {
            breeds: vec!["Poodle".to_string()],
            age_min: Some(1),
            age_max: None,
        };
        let panel = filters_panel(&filters, SortOrder::BREED_DESC);
        assert_eq!(panel, "Sort: Breed (Z-A) | Breeds: Poodle | Age: 1..- | clear: available");
    }

    #[test]
    fn test_search_page_flags_failed_fetch() {
        use crate::core::search::SearchResults;
        use crate::models::FilterUpdate;
        use crate::services::CatalogError;

        let mut state = SearchState::new();
        let first = state.refresh();
        state
            .apply(first.generation, Ok(SearchResults { dogs: vec![dog()], total: 40 }))
            .unwrap();

        let failed = state.set_filters(FilterUpdate::new().breeds(["Akita"]));
        let _ = state.apply(
            failed.generation,
            Err(CatalogError::Api { status: 503, message: "Service Unavailable".to_string() }),
        );

        let page = search_page(&state, &FavoriteSet::new(), &HashMap::new(), &MatchPhase::Idle);
        assert!(page.contains("Breeds: Akita"));
        assert!(page.contains("showing previous results"));
        assert!(page.contains("Rex [d1]"));

        let retry = state.refresh();
        state
            .apply(retry.generation, Ok(SearchResults { dogs: vec![], total: 0 }))
            .unwrap();
        let page = search_page(&state, &FavoriteSet::new(), &HashMap::new(), &MatchPhase::Idle);
        assert!(!page.contains("showing previous results"));
    }
}
