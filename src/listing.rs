//! Listing view: location → aggregation → pagination → cards.

use serde::Serialize;
use std::fmt;
use tracing::{error, info};

use crate::aggregate::{aggregate, AggregateError};
use crate::client::RecipeClient;
use crate::location::{commit_page, commit_search, recipe_location, ListingState, Location};
use crate::pagination::{Pager, PAGE_SIZE};
use crate::recipe::Recipe;
use crate::view::{Generation, Ticket};

/// Shown when a name search fails.
pub const SEARCH_FAILED: &str = "Failed to load recipes for your search.";
/// Shown when the alphabet fan-out cannot be joined.
pub const CATALOGUE_FAILED: &str = "Failed to load all recipes. Please try again later.";
/// Shown when the full catalogue comes back empty.
pub const CATALOGUE_EMPTY: &str = "No recipes loaded. Try again or start a search!";

/// Summary of one recipe on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeCard {
    /// Record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
    /// External video URL.
    pub video: Option<String>,
    /// Detail location opened by selecting the card.
    pub location: String,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            thumbnail: recipe.thumbnail.clone(),
            video: recipe.video.clone(),
            location: recipe_location(&recipe.name).to_string(),
        }
    }
}

/// What the listing shows. Exactly one state at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListingView {
    /// Nothing requested yet.
    Idle,
    /// A fetch cycle is in flight.
    Loading,
    /// The cycle failed.
    Failed {
        /// User-facing message.
        message: String,
    },
    /// The cycle succeeded with zero records.
    Empty {
        /// User-facing message.
        message: String,
    },
    /// One page of results.
    Results {
        /// Search term the results belong to.
        term: String,
        /// Total records across all pages.
        total_records: usize,
        /// Cards on the current page.
        cards: Vec<RecipeCard>,
        /// Clamped page position.
        pager: Pager,
    },
}

impl fmt::Display for ListingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Loading => writeln!(f, "Loading recipes..."),
            Self::Failed { message } | Self::Empty { message } => writeln!(f, "{message}"),
            Self::Results {
                term,
                total_records,
                cards,
                pager,
            } => {
                if term.is_empty() {
                    writeln!(f, "All recipes ({total_records})")?;
                } else {
                    writeln!(f, "Results for \"{term}\" ({total_records})")?;
                }
                for (index, card) in cards.iter().enumerate() {
                    write!(f, "{:>3}. {}", index + 1, card.name)?;
                    if !card.category.is_empty() {
                        write!(f, " [{}]", card.category)?;
                    }
                    writeln!(f)?;
                    if let Some(video) = &card.video {
                        writeln!(f, "     video: {video}")?;
                    }
                }
                writeln!(f, "Page {} of {}", pager.page(), pager.total_pages())
            }
        }
    }
}

/// Listing view state for one mounted page.
pub struct ListingPage {
    client: RecipeClient,
    generation: Generation,
    location: Location,
    state: ListingState,
    records: Vec<Recipe>,
    view: ListingView,
}

impl ListingPage {
    /// Mounts an idle listing.
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            generation: Generation::default(),
            location: Location::listing(),
            state: ListingState::default(),
            records: Vec::new(),
            view: ListingView::Idle,
        }
    }

    /// Current view.
    pub fn view(&self) -> &ListingView {
        &self.view
    }

    /// State parsed from the most recently read location.
    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Records backing the current view.
    pub fn records(&self) -> &[Recipe] {
        &self.records
    }

    /// Clamped pager when results are shown.
    pub fn pager(&self) -> Option<Pager> {
        match &self.view {
            ListingView::Results { pager, .. } => Some(*pager),
            _ => None,
        }
    }

    /// Read path: re-derives state from `location` and reloads the record set.
    pub async fn load(&mut self, location: &Location) -> &ListingView {
        self.load_with_progress(location, |_| {}).await
    }

    /// Like [`ListingPage::load`], handing the `Loading` view to `progress`
    /// before the fetch is awaited.
    pub async fn load_with_progress<F>(
        &mut self,
        location: &Location,
        progress: F,
    ) -> &ListingView
    where
        F: FnOnce(&ListingView),
    {
        let (ticket, term) = self.begin(location);
        progress(&self.view);
        let result = aggregate(&self.client, &term).await;
        self.finish(ticket, result);
        &self.view
    }

    /// Starts a cycle: clears previous results and errors, enters `Loading`.
    ///
    /// Returns the cycle's ticket and the search term to aggregate.
    pub fn begin(&mut self, location: &Location) -> (Ticket, String) {
        let ticket = self.generation.issue();
        self.location = location.clone();
        self.state = ListingState::from_location(location);
        self.records.clear();
        self.view = ListingView::Loading;
        (ticket, self.state.term.clone())
    }

    /// Completes the cycle for `ticket`. Stale tickets are dropped and `false` returned.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<Recipe>, AggregateError>) -> bool {
        if !self.generation.is_current(ticket) {
            info!(location = %self.location, "discarding stale listing result");
            return false;
        }

        self.view = match result {
            Ok(records) => {
                self.records = records;
                self.present()
            }
            Err(err) => {
                error!(location = %self.location, error = %err, "listing load failed");
                let message = match err {
                    AggregateError::Search(_) => SEARCH_FAILED,
                    AggregateError::Orchestration(_) => CATALOGUE_FAILED,
                };
                ListingView::Failed {
                    message: message.to_string(),
                }
            }
        };
        true
    }

    /// Unmounts the view; in-flight cycles complete as no-ops.
    pub fn leave(&mut self) {
        self.generation.close();
        self.records.clear();
        self.view = ListingView::Idle;
    }

    /// Location of a search submit from the current location.
    pub fn search_location(&self, term: &str) -> Location {
        commit_search(&self.location, term)
    }

    /// Location of a "next" click, `None` on the last page.
    pub fn next_location(&self) -> Option<Location> {
        let page = self.pager()?.next()?;
        Some(commit_page(&self.location, page))
    }

    /// Location of a "previous" click, `None` on the first page.
    pub fn previous_location(&self) -> Option<Location> {
        let page = self.pager()?.previous()?;
        Some(commit_page(&self.location, page))
    }

    /// Location of a jump to `page`, clamped to the pages currently shown.
    pub fn page_location(&self, page: usize) -> Location {
        let page = match self.pager() {
            Some(pager) => pager.clamp(page),
            None => page.max(1),
        };
        commit_page(&self.location, page)
    }

    /// Detail location for the 1-based card `position` on the current page.
    pub fn card_location(&self, position: usize) -> Option<Location> {
        let ListingView::Results { cards, .. } = &self.view else {
            return None;
        };
        let card = cards.get(position.checked_sub(1)?)?;
        Location::parse(&card.location).ok()
    }

    fn present(&self) -> ListingView {
        if self.records.is_empty() {
            let message = if self.state.term.is_empty() {
                CATALOGUE_EMPTY.to_string()
            } else {
                format!("No recipes found for {}.", self.state.term)
            };
            return ListingView::Empty { message };
        }

        let pager = Pager::new(self.state.page, self.records.len(), PAGE_SIZE);
        let cards = pager
            .slice(&self.records, PAGE_SIZE)
            .iter()
            .map(RecipeCard::from)
            .collect();
        ListingView::Results {
            term: self.state.term.clone(),
            total_records: self.records.len(),
            cards,
            pager,
        }
    }
}
