//! Tag-related API types

use larder_core::CategoryId;
use serde::{Deserialize, Serialize};

/// Request to create a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Partial update of a tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Request to create a tag or ingredient category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
}
