//! Error types for the client.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use crate::session::SessionError;

/// Top-level error for wiring the client together. Layer-specific errors
/// stay in their modules; this only aggregates them at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
}
