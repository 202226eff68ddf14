//! API Request and Response Types
//!
//! One module per backend resource family. Request types serialize the
//! exact shapes the backend expects; response types mirror what it returns.

// Auth types
mod auth;
pub use auth::*;

// Recipe types
mod recipe;
pub use recipe::*;

// Tag types
mod tag;
pub use tag::*;

// Ingredient types
mod ingredient;
pub use ingredient::*;

// Search types
mod search;
pub use search::*;

// Image and import/export types
mod transfer;
pub use transfer::*;
