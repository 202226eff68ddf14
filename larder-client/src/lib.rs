//! Larder client library exports.
//!
//! The client is three layers: the REST facade ([`api_client`]), the
//! reactive stores ([`state`]), and the route table with its auth guard
//! ([`nav`]). Pages drive stores, stores drive the facade, and the facade
//! reports authorization failures back through an observer so navigation
//! stays out of the transport layer.

pub mod api_client;
pub mod config;
pub mod error;
pub mod nav;
pub mod session;
pub mod state;

pub use error::ClientError;

use crate::api_client::RestClient;
use crate::config::ClientConfig;
use crate::nav::Navigator;
use crate::session::Session;
use crate::state::{AuthStore, CatalogStore};
use std::sync::Arc;

/// The wired client: one session shared by the facade, the stores, and the
/// navigation guard, with the navigator registered as the facade's 401
/// observer.
pub struct App {
    pub auth: AuthStore,
    pub catalog: CatalogStore,
    pub navigator: Arc<Navigator>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

impl App {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let session = Session::new(config.token_path.clone());
        let navigator = Arc::new(Navigator::new(session.clone()));
        let api = RestClient::new(config, session.clone(), navigator.clone())?;
        Ok(Self {
            auth: AuthStore::new(api.clone(), session),
            catalog: CatalogStore::new(api),
            navigator,
        })
    }

    /// Wire the client from the config file named by `--config` or
    /// `LARDER_CONFIG`.
    pub fn from_env() -> Result<Self, ClientError> {
        let config = ClientConfig::load()?;
        Self::new(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::nav::Route;

    fn config(dir: &tempfile::TempDir) -> ClientConfig {
        ClientConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 100,
            token_path: dir.path().join("token"),
        }
    }

    #[test]
    fn app_starts_logged_out_at_home() {
        let dir = tempfile::tempdir().expect("temp dir");
        let app = App::new(&config(&dir)).expect("wire app");
        assert!(!app.auth.is_logged_in());
        assert_eq!(app.navigator.current_path(), Route::Home.path());
    }

    #[test]
    fn app_rejects_invalid_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut bad = config(&dir);
        bad.api_base_url.clear();
        let err = App::new(&bad).expect_err("must reject");
        assert!(matches!(
            err,
            ClientError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
