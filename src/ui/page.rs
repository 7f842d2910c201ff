use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{FavoriteSet, MatchWorkflow, SearchController};
use crate::models::Location;
use crate::services::{CatalogApi, CatalogError};
use crate::ui::intents::{Intent, HELP};
use crate::ui::views;

/// Non-blocking message shown above the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// What the caller should do after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The service rejected the session; go back to login
    SessionExpired,
    LoggedOut,
    Quit,
}

/// The search page: filters, results, favorites and the match modal.
///
/// Errors never abort the page; they become notices and the last good
/// results stay on screen.
pub struct SearchPage<C> {
    api: Arc<C>,
    search: SearchController<C>,
    matches: MatchWorkflow<C>,
    favorites: FavoriteSet,
    breeds: Vec<String>,
    locations: HashMap<String, Location>,
    notices: Vec<Notice>,
}

impl<C: CatalogApi> SearchPage<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self {
            search: SearchController::new(api.clone()),
            matches: MatchWorkflow::new(api.clone()),
            api,
            favorites: FavoriteSet::new(),
            breeds: Vec::new(),
            locations: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn search(&self) -> &SearchController<C> {
        &self.search
    }

    pub fn match_workflow(&self) -> &MatchWorkflow<C> {
        &self.matches
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Initial load: breed list and the first page
    pub async fn load(&mut self) -> Flow {
        match self.api.list_breeds().await {
            Ok(breeds) => self.breeds = breeds,
            Err(e) => {
                let flow = self.surface("Failed to load breeds", e);
                if flow != Flow::Continue {
                    return flow;
                }
            }
        }

        let result = self.search.refresh().await;
        self.after_fetch(result).await
    }

    pub async fn handle(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::Filter(update) => {
                let result = self.search.set_filters(update).await;
                self.after_fetch(result).await
            }
            Intent::ClearFilters => {
                let result = self.search.clear_filters().await;
                self.after_fetch(result).await
            }
            Intent::Sort(order) => {
                let result = self.search.set_sort(order).await;
                self.after_fetch(result).await
            }
            Intent::Page(n) => {
                let result = self.search.set_page(n).await;
                self.after_fetch(result).await
            }
            Intent::NextPage => {
                let page = *self.search.state().await.page();
                if !page.has_next() {
                    self.info("Already on the last page");
                    return Flow::Continue;
                }
                let result = self.search.set_page(page.current() + 1).await;
                self.after_fetch(result).await
            }
            Intent::PrevPage => {
                let page = *self.search.state().await.page();
                if !page.has_prev() {
                    self.info("Already on the first page");
                    return Flow::Continue;
                }
                let result = self.search.set_page(page.current() - 1).await;
                self.after_fetch(result).await
            }
            Intent::Refresh => {
                let result = self.search.refresh().await;
                self.after_fetch(result).await
            }
            Intent::ToggleFavorite(id) => {
                let added = self.favorites.toggle(&id);
                self.info(if added {
                    format!("Added {} to favorites", id)
                } else {
                    format!("Removed {} from favorites", id)
                });
                Flow::Continue
            }
            Intent::ClearFavorites => {
                self.favorites.clear();
                self.info("Favorites cleared");
                Flow::Continue
            }
            Intent::Match => {
                let ids = self.favorites.ids();
                match self.matches.generate(&ids).await {
                    Ok(dog) => {
                        tracing::info!("Matched with {} ({})", dog.name, dog.id);
                        Flow::Continue
                    }
                    Err(e) => self.surface("Failed to generate match", e),
                }
            }
            Intent::CloseMatch => {
                self.matches.close().await;
                Flow::Continue
            }
            Intent::Breeds => {
                let listing = if self.breeds.is_empty() {
                    "No breeds loaded".to_string()
                } else {
                    self.breeds.join(", ")
                };
                self.info(listing);
                Flow::Continue
            }
            Intent::Logout => match self.api.logout().await {
                Ok(()) => Flow::LoggedOut,
                Err(e) => self.surface("Failed to logout", e),
            },
            Intent::Help => {
                self.info(HELP);
                Flow::Continue
            }
            Intent::Quit => Flow::Quit,
        }
    }

    /// Render the full page, notices not included
    pub async fn render(&self) -> String {
        let state = self.search.state().await;
        let phase = self.matches.phase().await;
        views::search_page(&state, &self.favorites, &self.locations, &phase)
    }

    async fn after_fetch(
        &mut self,
        result: Result<crate::core::FetchOutcome, CatalogError>,
    ) -> Flow {
        match result {
            Ok(_) => {
                self.load_locations().await;
                Flow::Continue
            }
            Err(e) => self.surface("Failed to search dogs", e),
        }
    }

    /// Look up city/state for zip codes on the current page. Best effort.
    async fn load_locations(&mut self) {
        let state = self.search.state().await;
        let mut missing: Vec<String> = state
            .dogs()
            .iter()
            .map(|dog| dog.zip_code.clone())
            .filter(|zip| !self.locations.contains_key(zip))
            .collect();
        missing.sort();
        missing.dedup();

        if missing.is_empty() {
            return;
        }

        match self.api.get_locations(&missing).await {
            Ok(found) => {
                for location in found {
                    self.locations.insert(location.zip_code.clone(), location);
                }
            }
            Err(e) => tracing::warn!("Failed to load locations for {} zip codes: {}", missing.len(), e),
        }
    }

    fn surface(&mut self, context: &str, error: CatalogError) -> Flow {
        self.notices.push(Notice::Error(format!("{}: {}", context, error)));

        if error.is_auth() {
            Flow::SessionExpired
        } else {
            Flow::Continue
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notices.push(Notice::Info(message.into()));
    }
}
