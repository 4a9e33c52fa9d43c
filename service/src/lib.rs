use config::Config;
use domain::{JwtVerifier, TokenVerifier};
use relay::ConnectionRegistry;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state shared by every connection session.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ConnectionRegistry>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(
            app_config.outbox_capacity,
            app_config.write_timeout(),
        ));
        let verifier = Arc::new(JwtVerifier::new(app_config.secret_key()));

        Self::with_parts(app_config, registry, verifier)
    }

    pub fn with_parts(
        app_config: Config,
        registry: Arc<ConnectionRegistry>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config: app_config,
            registry,
            verifier,
        }
    }
}
