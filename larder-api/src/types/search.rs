//! Search-related API types

use larder_core::RecipeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One search hit. Hits are index documents; only the id is load-bearing
/// for the client, which re-joins against its own recipe cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: RecipeId,
    #[serde(default)]
    pub name: String,
}

/// Response from the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub total: u64,
}

/// Synonym groups configured on the search index, e.g. 番茄 -> [西红柿].
pub type SynonymMap = HashMap<String, Vec<String>>;

/// `{ "status": "ok" }` acknowledgment from search administration endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
