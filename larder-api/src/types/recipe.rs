//! Recipe-related API types

use larder_core::{IngredientId, TagId};
use serde::{Deserialize, Serialize};

/// One ingredient line as submitted when creating or updating a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientDraft {
    pub ingredient_id: IngredientId,
    /// Free-form amount string; the backend stores it verbatim.
    #[serde(default)]
    pub amount: String,
}

/// Request to create a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientDraft>,
}

/// Partial update of a recipe. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RecipeIngredientDraft>>,
}
