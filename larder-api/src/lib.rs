//! Larder API - Wire Types
//!
//! Request payloads and response envelopes exchanged with the recipe
//! catalog backend. These types are consumed by the client facade; the
//! backend remains the validation authority.

pub mod error;
pub mod types;

pub use error::ErrorBody;
