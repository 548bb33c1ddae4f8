//! Detail view: one recipe looked up by display name.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info};

use crate::client::{FetchError, RecipeClient, RecipeQuery};
use crate::ingredients::ingredient_lines;
use crate::location::{DetailState, Location};
use crate::recipe::Recipe;
use crate::view::{Generation, Ticket};

/// Shown when the location carries no `name`.
pub const MISSING_NAME: &str = "Recipe name not found in URL.";
/// Shown when the lookup request fails.
pub const DETAIL_FAILED: &str = "Failed to load recipe details. Please try again later.";

/// Failures while resolving a detail location.
#[derive(Debug, Error)]
pub enum DetailError {
    /// The location had no usable `name` parameter.
    #[error("recipe name missing from location")]
    MissingName,
    /// The name search returned no meals.
    #[error("no recipe named \"{0}\"")]
    NotFound(String),
    /// The name search itself failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl DetailError {
    /// User-facing message for the error.
    pub fn message(&self) -> String {
        match self {
            Self::MissingName => MISSING_NAME.to_string(),
            Self::NotFound(name) => format!("Recipe named \"{name}\" was not found."),
            Self::Fetch(_) => DETAIL_FAILED.to_string(),
        }
    }
}

/// Display-ready recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDetail {
    /// Record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Cuisine/area label.
    pub area: Option<String>,
    /// Tag list.
    pub tags: Vec<String>,
    /// Thumbnail URL.
    pub thumbnail: Option<String>,
    /// Formatted ingredient lines.
    pub ingredients: Vec<String>,
    /// Preparation text.
    pub instructions: String,
    /// External video URL.
    pub video: Option<String>,
    /// Original source URL.
    pub source: Option<String>,
}

impl From<Recipe> for RecipeDetail {
    fn from(recipe: Recipe) -> Self {
        let ingredients = ingredient_lines(&recipe);
        Self {
            id: recipe.id,
            name: recipe.name,
            category: recipe.category,
            area: recipe.area,
            tags: recipe.tags,
            thumbnail: recipe.thumbnail,
            ingredients,
            instructions: recipe.instructions,
            video: recipe.video,
            source: recipe.source,
        }
    }
}

/// Fetches the first name-search match for `state`.
///
/// Ambiguous names are not disambiguated; the first meal returned wins.
pub async fn fetch_detail(
    client: &RecipeClient,
    state: &DetailState,
) -> Result<RecipeDetail, DetailError> {
    let name = state.name.as_deref().ok_or(DetailError::MissingName)?;
    let meals = client.search(&RecipeQuery::Name(name.to_string())).await?;
    let recipe = meals
        .into_iter()
        .next()
        .ok_or_else(|| DetailError::NotFound(name.to_string()))?;
    info!(lookup = name, id = %recipe.id, "recipe detail loaded");
    Ok(RecipeDetail::from(recipe))
}

/// What the detail page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    /// Nothing requested yet.
    Idle,
    /// Lookup in flight.
    Loading,
    /// Lookup failed or found nothing.
    Failed {
        /// User-facing message.
        message: String,
    },
    /// Recipe found.
    Ready {
        /// The formatted recipe.
        recipe: RecipeDetail,
    },
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Loading => writeln!(f, "Loading recipe details..."),
            Self::Failed { message } => writeln!(f, "{message}"),
            Self::Ready { recipe } => {
                writeln!(f, "{}", recipe.name)?;
                write!(f, "Category: {}", recipe.category)?;
                if let Some(area) = &recipe.area {
                    write!(f, " | Area: {area}")?;
                }
                writeln!(f)?;
                if !recipe.tags.is_empty() {
                    writeln!(f, "Tags: {}", recipe.tags.join(", "))?;
                }
                if let Some(thumbnail) = &recipe.thumbnail {
                    writeln!(f, "Image: {thumbnail}")?;
                }
                writeln!(f, "\nIngredients:")?;
                for line in &recipe.ingredients {
                    writeln!(f, "  - {line}")?;
                }
                writeln!(f, "\nInstructions:\n{}", recipe.instructions.trim_end())?;
                if let Some(video) = &recipe.video {
                    writeln!(f, "\nVideo: {video}")?;
                }
                if let Some(source) = &recipe.source {
                    writeln!(f, "Source: {source}")?;
                }
                Ok(())
            }
        }
    }
}

/// Detail view state for one mounted page.
pub struct DetailPage {
    client: RecipeClient,
    generation: Generation,
    view: DetailView,
}

impl DetailPage {
    /// Mounts an idle detail page.
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            generation: Generation::default(),
            view: DetailView::Idle,
        }
    }

    /// Current view.
    pub fn view(&self) -> &DetailView {
        &self.view
    }

    /// Read path for a detail location.
    pub async fn load(&mut self, location: &Location) -> &DetailView {
        self.load_with_progress(location, |_| {}).await
    }

    /// Like [`DetailPage::load`], handing the `Loading` view to `progress`
    /// before the lookup is awaited.
    pub async fn load_with_progress<F>(
        &mut self,
        location: &Location,
        progress: F,
    ) -> &DetailView
    where
        F: FnOnce(&DetailView),
    {
        let state = DetailState::from_location(location);
        let ticket = self.begin();
        progress(&self.view);
        let result = fetch_detail(&self.client, &state).await;
        self.finish(ticket, result);
        &self.view
    }

    /// Starts a cycle, clearing any previous recipe or error.
    pub fn begin(&mut self) -> Ticket {
        self.view = DetailView::Loading;
        self.generation.issue()
    }

    /// Completes the cycle for `ticket`; stale tickets return `false`.
    pub fn finish(&mut self, ticket: Ticket, result: Result<RecipeDetail, DetailError>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok(recipe) => DetailView::Ready { recipe },
            Err(err) => {
                if matches!(err, DetailError::Fetch(_)) {
                    error!(error = %err, "recipe detail load failed");
                }
                DetailView::Failed {
                    message: err.message(),
                }
            }
        };
        true
    }

    /// Unmounts the page.
    pub fn leave(&mut self) {
        self.generation.close();
        self.view = DetailView::Idle;
    }
}
