//! Image management and recipe import/export API types

use larder_core::{ImageId, RecipeId};
use serde::{Deserialize, Serialize};

/// Request to reorder (and implicitly prune) a recipe's images.
///
/// Images absent from `image_ids` are deleted by the backend; the rest are
/// re-numbered by list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderImagesRequest {
    pub image_ids: Vec<ImageId>,
}

/// `{ "ok": true }` acknowledgment from the image reorder endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Request to export a batch of recipes as a single archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBatchRequest {
    pub recipe_ids: Vec<RecipeId>,
}

/// Outcome of a recipe archive import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub recipe_ids: Vec<RecipeId>,
    pub count: usize,
}
