//! Recipe records as returned by TheMealDB search endpoints.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Number of ingredient/measure pairs a record can carry.
pub const INGREDIENT_SLOTS: usize = 20;

/// One numbered ingredient/measure pair, untrimmed as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    /// `strIngredientN`.
    pub ingredient: Option<String>,
    /// `strMeasureN`.
    pub measure: Option<String>,
}

impl IngredientSlot {
    /// Slot with both fields populated.
    pub fn new(ingredient: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            ingredient: Some(ingredient.into()),
            measure: Some(measure.into()),
        }
    }
}

/// A single meal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRecipe")]
pub struct Recipe {
    /// `idMeal`, the de-duplication key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label (empty when absent).
    pub category: String,
    /// Cuisine/area label.
    pub area: Option<String>,
    /// Preparation text.
    pub instructions: String,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Comma-separated tag list, split and trimmed.
    pub tags: Vec<String>,
    /// External video URL.
    pub video: Option<String>,
    /// Original recipe source URL.
    pub source: Option<String>,
    /// Ingredient slots `1..=20`, stored at indices `0..20`.
    pub ingredients: [IngredientSlot; INGREDIENT_SLOTS],
}

impl Recipe {
    /// Minimal record with only identity fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            area: None,
            instructions: String::new(),
            thumbnail: None,
            tags: Vec::new(),
            video: None,
            source: None,
            ingredients: Default::default(),
        }
    }

    /// Sets the 1-based ingredient slot `index`. Out-of-range indices are ignored.
    pub fn with_ingredient(mut self, index: usize, slot: IngredientSlot) -> Self {
        if let Some(target) = index
            .checked_sub(1)
            .and_then(|i| self.ingredients.get_mut(i))
        {
            *target = slot;
        }
        self
    }
}

/// Envelope shared by `search.php` responses.
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<Value>>,
}

impl MealsEnvelope {
    /// Decodes every meal on its own; entries that are not valid records are
    /// logged and skipped. `null` meals yield an empty list.
    pub(crate) fn into_recipes(self) -> Vec<Recipe> {
        self.meals
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, meal)| match serde_json::from_value::<Recipe>(meal) {
                Ok(recipe) => Some(recipe),
                Err(err) => {
                    warn!(index, error = %err, "skipping malformed meal");
                    None
                }
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawRecipe {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    video: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let mut ingredients: [IngredientSlot; INGREDIENT_SLOTS] = Default::default();
        for (offset, slot) in ingredients.iter_mut().enumerate() {
            let n = offset + 1;
            slot.ingredient = string_field(&raw.rest, &format!("strIngredient{n}"));
            slot.measure = string_field(&raw.rest, &format!("strMeasure{n}"));
        }

        let tags = raw
            .tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            area: non_blank(raw.area),
            instructions: raw.instructions.unwrap_or_default(),
            thumbnail: non_blank(raw.thumbnail),
            tags,
            video: non_blank(raw.video),
            source: non_blank(raw.source),
            ingredients,
        }
    }
}

fn string_field(fields: &HashMap<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRABIATA: &str = r#"{
        "idMeal": "52771",
        "strMeal": "Spicy Arrabiata Penne",
        "strCategory": "Vegetarian",
        "strArea": "Italian",
        "strInstructions": "Bring a large pot of water to a boil.",
        "strMealThumb": "https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg",
        "strTags": "Pasta, Curry",
        "strYoutube": "",
        "strIngredient1": "penne rigate",
        "strIngredient2": "olive oil",
        "strIngredient3": "",
        "strIngredient20": null,
        "strMeasure1": "1 pound",
        "strMeasure2": "1/4 cup",
        "strMeasure3": null,
        "strSource": null
    }"#;

    #[test]
    fn flattens_numbered_fields_into_slots() {
        let recipe: Recipe = serde_json::from_str(ARRABIATA).expect("parse");
        assert_eq!(recipe.id, "52771");
        assert_eq!(recipe.area.as_deref(), Some("Italian"));
        assert_eq!(recipe.tags, vec!["Pasta", "Curry"]);
        assert_eq!(
            recipe.ingredients[0],
            IngredientSlot::new("penne rigate", "1 pound")
        );
        assert_eq!(recipe.ingredients[2].ingredient.as_deref(), Some(""));
        assert_eq!(recipe.ingredients[2].measure, None);
        assert_eq!(recipe.ingredients[19], IngredientSlot::default());
    }

    #[test]
    fn blank_links_become_absent() {
        let recipe: Recipe = serde_json::from_str(ARRABIATA).expect("parse");
        assert!(recipe.video.is_none());
        assert!(recipe.source.is_none());
        assert!(recipe.thumbnail.is_some());
    }

    #[test]
    fn null_meals_envelope_is_empty() {
        let envelope: MealsEnvelope = serde_json::from_str(r#"{"meals":null}"#).expect("parse");
        assert!(envelope.into_recipes().is_empty());
    }

    #[test]
    fn malformed_meal_is_skipped_without_losing_the_rest() {
        let envelope: MealsEnvelope = serde_json::from_str(
            r#"{"meals":[{"idMeal":"1","strMeal":"Kept"},{"idMeal":2},{"strMeal":"No id"},{"idMeal":"3"}]}"#,
        )
        .expect("parse");
        let ids: Vec<_> = envelope
            .into_recipes()
            .into_iter()
            .map(|recipe| recipe.id)
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn non_list_meals_is_a_decode_error() {
        assert!(serde_json::from_str::<MealsEnvelope>(r#"{"meals":5}"#).is_err());
    }

    #[test]
    fn identifier_is_required() {
        let result = serde_json::from_str::<Recipe>(r#"{"strMeal":"Nameless"}"#);
        assert!(result.is_err());
    }
}
