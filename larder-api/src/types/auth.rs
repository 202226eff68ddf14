//! Auth-related API types

use serde::{Deserialize, Serialize};

/// Request to obtain an admin session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token returned on successful login. The token is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Request to change the admin password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Generic `{ "detail": ... }` acknowledgment returned by auth operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}
