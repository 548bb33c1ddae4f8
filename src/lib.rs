#![warn(missing_docs)]
//! Core library entry points for the mealscout recipe browser.

pub mod aggregate;
pub mod client;
pub mod controls;
pub mod detail;
pub mod ingredients;
pub mod listing;
pub mod location;
pub mod pagination;
pub mod recipe;
pub mod runtime;
pub mod shell;
pub mod transport;
mod view;

pub use aggregate::{aggregate, AggregateError, RecipeSet};
pub use client::{FetchError, RecipeClient, RecipeQuery};
pub use controls::{Cli, ClientControls};
pub use detail::{fetch_detail, DetailError, DetailPage, DetailView, RecipeDetail};
pub use ingredients::ingredient_lines;
pub use listing::{ListingPage, ListingView, RecipeCard};
pub use location::{
    commit_page, commit_search, recipe_location, DetailState, ListingState, Location, Navigator,
    Route,
};
pub use pagination::{paginate, Pager, PAGE_SIZE};
pub use recipe::{IngredientSlot, Recipe, INGREDIENT_SLOTS};
pub use runtime::run;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use view::{Generation, Ticket};
