//! Dashboard view: vault health under the simulated price feed.
//!
//! The view owns its feed. Entering the view starts the feed; closing or
//! dropping the view stops it.

use rand::Rng;

use vault_core::dashboard::{DashboardState, VaultHealth};
use vault_core::risk::{Position, RiskEngine};
use vault_core::session::WalletAddress;

use crate::price_feed::{PriceFeedConfig, PriceFeedHandle, spawn_price_feed};

#[derive(Debug)]
pub struct DashboardView {
    state: DashboardState,
    feed: PriceFeedHandle,
    address: Option<WalletAddress>,
}

impl DashboardView {
    /// Enter the dashboard with the finished position and start its feed.
    /// Must be called inside a tokio runtime.
    pub fn enter<R>(
        engine: RiskEngine,
        position: Position,
        address: Option<WalletAddress>,
        feed_config: PriceFeedConfig,
        rng: R,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        let state = DashboardState::new(engine, position);
        let feed = spawn_price_feed(position.asset_price(), feed_config, rng);
        tracing::info!(
            "DashboardEntered collateral={} borrow={} price={}",
            position.collateral_amount(),
            position.borrow_amount(),
            position.asset_price()
        );
        Self {
            state,
            feed,
            address,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn health(&self) -> &VaultHealth {
        self.state.health()
    }

    pub fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }

    /// Header label: abbreviated address, or a placeholder.
    pub fn address_label(&self) -> String {
        self.address
            .as_ref()
            .map(WalletAddress::abbreviated)
            .unwrap_or_else(|| "0x12...89".to_string())
    }

    /// Wait for the next price and apply it. `None` once the feed is stopped.
    pub async fn next_tick(&mut self) -> Option<VaultHealth> {
        let price = self.feed.next_price().await?;
        Some(self.state.apply_price(price))
    }

    pub fn feed(&self) -> &PriceFeedHandle {
        &self.feed
    }

    /// Stop the feed and hand back the final state.
    pub fn close(mut self) -> DashboardState {
        self.feed.cancel();
        tracing::info!("DashboardClosed ticks={}", self.state.ticks_applied());
        self.state
    }
}
