//! Ingredient list assembly for the detail view.

use crate::recipe::{IngredientSlot, Recipe};

/// Display lines for every populated slot, in ascending slot order.
///
/// A slot contributes only when its ingredient is non-blank after trimming. The
/// line is the trimmed measure (empty when absent), a space, and the trimmed
/// ingredient, so a missing measure yields a leading space.
pub fn ingredient_lines(recipe: &Recipe) -> Vec<String> {
    recipe.ingredients.iter().filter_map(slot_line).collect()
}

fn slot_line(slot: &IngredientSlot) -> Option<String> {
    let ingredient = slot.ingredient.as_deref().map(str::trim)?;
    if ingredient.is_empty() {
        return None;
    }
    let measure = slot.measure.as_deref().map(str::trim).unwrap_or_default();
    Some(format!("{measure} {ingredient}"))
}
