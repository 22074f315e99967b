//! Onboarding driver: wizard view, then dashboard view.
//!
//! Owns the wallet gateway, the wizard flow and at most one dashboard view.
//! Every operation is a discrete event; the only suspension point is the
//! wallet connect call.

use rand::Rng;

use vault_core::risk::RiskEngine;
use vault_core::wizard::{TransitionResult, WizardFlow};

use crate::config::OnboardingConfig;
use crate::dashboard_view::DashboardView;
use crate::session_store::SessionStore;
use crate::wallet::{WalletConnector, WalletGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Wizard,
    Dashboard,
}

#[derive(Debug)]
pub struct OnboardingApp<C, S> {
    config: OnboardingConfig,
    gateway: WalletGateway<C, S>,
    flow: WizardFlow,
    dashboard: Option<DashboardView>,
}

impl<C: WalletConnector, S: SessionStore> OnboardingApp<C, S> {
    pub fn new(config: OnboardingConfig, connector: C, store: S) -> Self {
        let engine = RiskEngine::new(config.risk);
        let flow = WizardFlow::new(engine, config.initial_asset_price);
        Self {
            config,
            gateway: WalletGateway::new(connector, store),
            flow,
            dashboard: None,
        }
    }

    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    pub fn gateway(&self) -> &WalletGateway<C, S> {
        &self.gateway
    }

    pub fn flow(&self) -> &WizardFlow {
        &self.flow
    }

    /// Direct access for amount edits and back navigation.
    pub fn flow_mut(&mut self) -> &mut WizardFlow {
        &mut self.flow
    }

    pub fn view(&self) -> ViewKind {
        if self.dashboard.is_some() {
            ViewKind::Dashboard
        } else {
            ViewKind::Wizard
        }
    }

    pub fn dashboard(&self) -> Option<&DashboardView> {
        self.dashboard.as_ref()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardView> {
        self.dashboard.as_mut()
    }

    /// Connect the wallet. Failure is logged by the gateway and reported as
    /// `false`; the wizard stays on Start.
    pub async fn connect_wallet(&self) -> bool {
        self.gateway.connect().await.is_ok()
    }

    /// Forward button of the wizard.
    pub fn advance(&mut self) -> TransitionResult {
        let session = self.gateway.state();
        self.flow.advance(&session)
    }

    /// Leave the finished wizard for the dashboard. Only valid on Finish.
    pub fn open_dashboard<R>(&mut self, rng: R) -> bool
    where
        R: Rng + Send + 'static,
    {
        if self.dashboard.is_some() {
            return false;
        }
        let Some(receipt) = self.flow.receipt() else {
            tracing::debug!("DashboardOpenIgnored step={:?}", self.flow.kind());
            return false;
        };
        let view = DashboardView::enter(
            *self.flow.engine(),
            receipt.position,
            receipt.address.clone(),
            self.config.feed,
            rng,
        );
        self.dashboard = Some(view);
        true
    }

    /// Tear down the dashboard (stopping its feed), clear the session and
    /// return the wizard to Start.
    pub fn logout(&mut self) {
        if let Some(view) = self.dashboard.take() {
            view.close();
        }
        self.gateway.disconnect();
        self.flow.reset();
    }
}
