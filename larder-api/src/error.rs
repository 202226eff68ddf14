//! Error body contract for the recipe catalog backend.
//!
//! Non-2xx responses optionally carry a JSON body of the shape
//! `{ "detail": "..." }`. Anything else is treated as an unstructured
//! failure and classified by status code alone.

use serde::{Deserialize, Serialize};

/// Structured error body returned by the backend on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub detail: String,
}
