//! carousel-manager - a single media carousel with a password-gated admin
//!
//! This crate provides:
//! - An ordered, persisted carousel store with index-addressed mutations
//!   (JSON file or redb backends)
//! - Upload intake with MIME-prefix validation and collision-resistant naming
//! - Public and admin HTML pages rendered with maud
//! - A JSON admin API behind a session cookie

pub mod api;
pub mod auth;
pub mod config;
pub mod intake;
pub mod object_store;
pub mod render;
pub mod storage;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use auth::{AuthError, Credentials, SessionRegistry};
use config::Config;
use storage::CarouselStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub credentials: Credentials,
    pub object_store: Arc<dyn object_store::ObjectStore>,
    pub sessions: SessionRegistry,
    pub store: Arc<CarouselStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<CarouselStore>,
        object_store: Arc<dyn object_store::ObjectStore>,
    ) -> Result<Self, AuthError> {
        let credentials = Credentials::new(&config.admin.username, &config.admin.password)?;
        let sessions =
            SessionRegistry::new(chrono::Duration::seconds(config.admin.session_ttl_seconds));
        Ok(Self {
            config,
            credentials,
            object_store,
            sessions,
            store,
        })
    }
}
