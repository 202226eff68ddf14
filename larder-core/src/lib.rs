//! Larder Core - Entity Types
//!
//! Pure data mirrors of the backend resources. The client holds no invariants
//! of its own beyond cache consistency with the last successful fetch, so
//! these types carry no behavior.

use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Recipe identifier assigned by the backend.
pub type RecipeId = i64;

/// Tag identifier.
pub type TagId = i64;

/// Ingredient identifier.
pub type IngredientId = i64;

/// Tag or ingredient category identifier.
pub type CategoryId = i64;

/// Recipe image identifier.
pub type ImageId = i64;

// ============================================================================
// RECIPES
// ============================================================================

/// An image attached to a recipe. `sort_order` drives gallery ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeImage {
    pub id: ImageId,
    pub image_path: String,
    pub sort_order: i32,
}

/// Abbreviated tag as embedded in recipe payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagBrief {
    pub id: TagId,
    pub name: String,
    /// Denormalized category name; empty when the tag has no category.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One ingredient line of a recipe.
///
/// `amount` is a free-form string ("2", "2.5", "适量"); the backend does not
/// constrain it. `calorie` is a per-line override, `ingredient_calorie` the
/// referenced ingredient's own per-unit value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub ingredient_id: IngredientId,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ingredient_name: String,
    #[serde(default)]
    pub ingredient_unit: String,
    #[serde(default)]
    pub calorie: Option<f64>,
    #[serde(default)]
    pub ingredient_calorie: Option<f64>,
}

/// A recipe as served by the backend.
///
/// List responses additionally populate the server-computed `calories`
/// field; detail responses may leave it at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub calories: i64,
    /// Timestamps are passed through as the backend renders them.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub images: Vec<RecipeImage>,
    #[serde(default)]
    pub tags: Vec<TagBrief>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

// ============================================================================
// TAGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Denormalized category name; empty when uncategorized.
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCategory {
    pub id: CategoryId,
    pub name: String,
}

// ============================================================================
// INGREDIENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    /// Calories per unit, when known.
    #[serde(default)]
    pub calorie: Option<f64>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientCategory {
    pub id: CategoryId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_deserializes_with_missing_optional_fields() {
        let recipe: Recipe = serde_json::from_str(r#"{"id": 7, "name": "Tomato Soup"}"#)
            .expect("minimal recipe payload");
        assert_eq!(recipe.id, 7);
        assert_eq!(recipe.name, "Tomato Soup");
        assert_eq!(recipe.calories, 0);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.tags.is_empty());
        assert!(recipe.created_at.is_none());
    }

    #[test]
    fn recipe_ingredient_defaults_calorie_fields() {
        let line: RecipeIngredient =
            serde_json::from_str(r#"{"id": 1, "ingredient_id": 3, "amount": "100"}"#)
                .expect("minimal ingredient line");
        assert_eq!(line.amount, "100");
        assert!(line.calorie.is_none());
        assert!(line.ingredient_calorie.is_none());
        assert_eq!(line.ingredient_unit, "");
    }

    #[test]
    fn tag_brief_skips_absent_color_on_serialize() {
        let tag = TagBrief {
            id: 1,
            name: "dessert".to_string(),
            category: String::new(),
            color: None,
        };
        let json = serde_json::to_string(&tag).expect("serialize tag brief");
        assert!(!json.contains("color"));
    }
}
