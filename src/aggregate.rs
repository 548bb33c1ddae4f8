//! Full-catalogue aggregation: one first-letter query per letter, merged by identifier.

use futures_util::future::join_all;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{FetchError, RecipeClient, RecipeQuery};
use crate::recipe::Recipe;

/// Letters fanned out when no search term is given.
pub const LETTERS: std::ops::RangeInclusive<char> = 'a'..='z';

/// Errors surfaced by [`aggregate`].
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A targeted name search failed.
    #[error("recipe search failed: {0}")]
    Search(#[from] FetchError),
    /// The letter fan-out could not be joined.
    #[error("letter fan-out failed: {0}")]
    Orchestration(String),
}

/// Identifier-keyed record set.
///
/// Records keep the position of their identifier's first insertion; a repeated
/// identifier overwrites the stored record in place.
#[derive(Debug, Default)]
pub struct RecipeSet {
    positions: HashMap<String, usize>,
    records: Vec<Recipe>,
}

impl RecipeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `recipe`, replacing any record with the same identifier.
    pub fn insert(&mut self, recipe: Recipe) {
        match self.positions.get(&recipe.id) {
            Some(&slot) => self.records[slot] = recipe,
            None => {
                self.positions.insert(recipe.id.clone(), self.records.len());
                self.records.push(recipe);
            }
        }
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the set, returning records in first-seen order.
    pub fn into_vec(self) -> Vec<Recipe> {
        self.records
    }
}

impl Extend<Recipe> for RecipeSet {
    fn extend<I: IntoIterator<Item = Recipe>>(&mut self, iter: I) {
        for recipe in iter {
            self.insert(recipe);
        }
    }
}

/// Resolves the record list for a listing search term.
///
/// A non-empty term is a single name search returned as-is. An empty term fans
/// out over [`LETTERS`]; individual letter failures count as empty results.
pub async fn aggregate(client: &RecipeClient, term: &str) -> Result<Vec<Recipe>, AggregateError> {
    if !term.is_empty() {
        let meals = client.search(&RecipeQuery::Name(term.to_string())).await?;
        info!(term, count = meals.len(), "name search loaded");
        return Ok(meals);
    }

    aggregate_letters(client).await
}

async fn aggregate_letters(client: &RecipeClient) -> Result<Vec<Recipe>, AggregateError> {
    let handles: Vec<_> = LETTERS
        .map(|letter| {
            let client = client.clone();
            tokio::spawn(async move { fetch_letter(&client, letter).await })
        })
        .collect();

    let settled = join_all(handles).await;

    let mut merged = RecipeSet::new();
    for outcome in settled {
        let meals = outcome.map_err(|err| AggregateError::Orchestration(err.to_string()))?;
        merged.extend(meals);
    }

    info!(count = merged.len(), "alphabet aggregation loaded");
    Ok(merged.into_vec())
}

async fn fetch_letter(client: &RecipeClient, letter: char) -> Vec<Recipe> {
    match client.search(&RecipeQuery::FirstLetter(letter)).await {
        Ok(meals) => meals,
        Err(err) => {
            warn!(%letter, error = %err, "letter query failed; treating as empty");
            Vec::new()
        }
    }
}
