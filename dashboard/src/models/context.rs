use cashly_client::{CashlyClient, CoordinatorStats};
use getset::Getters;
use log::info;

use super::config::Config;
use crate::error::DashboardError;

#[derive(Getters)]
#[get = "pub"]
pub struct Context {
    client: CashlyClient,
    config: Config,
}

impl Context {
    /// Build the API client and its request coordinator. Call
    /// [`Context::dispose`] once the dashboard shuts down.
    pub fn new(config: Config) -> Result<Self, DashboardError> {
        let client = CashlyClient::new(config.api_base_url(), config.coordinator().clone())?;

        info!(
            "Initialized Cashly client for {} (deduplication: {}, debounce: {}ms)",
            config.api_base_url(),
            config.coordinator().enabled,
            config.coordinator().debounce_delay_ms
        );

        Ok(Self { client, config })
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.client.coordinator_stats()
    }

    pub fn dispose(self) {
        let stats = self.stats();
        info!(
            "Shutting down: {} requests sent, {} shared with waiting widgets",
            stats.executions, stats.coalesced_waiters
        );
        self.client.coordinator().clone().dispose();
    }
}
