//! Application state shared across handlers.

use std::sync::Arc;

use crate::airtable::AirtableClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the record
/// service client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    airtable: AirtableClient,
}

impl AppState {
    /// Create the application state from loaded configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let airtable = AirtableClient::new(&config.airtable);
        Self {
            inner: Arc::new(AppStateInner { config, airtable }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The record service client.
    #[must_use]
    pub fn airtable(&self) -> &AirtableClient {
        &self.inner.airtable
    }
}
