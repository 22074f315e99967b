//! Wallet collaborator adapter.
//!
//! `WalletConnector` is the external handshake: it may fail or never
//! resolve. `WalletGateway` wraps it with session bookkeeping:
//! - on startup, a saved address restores the session;
//! - while `connect` is pending the state is `Connecting`;
//! - success persists the address, failure is logged and leaves the session
//!   disconnected (no retry);
//! - `disconnect` clears storage and state.
//!
//! State is published through a `watch` channel so the view can observe the
//! loading state while a connect call is still in flight.

use std::future::Future;

use tokio::sync::watch;

use vault_core::session::{ConnectionError, SessionState, WalletAddress};

use crate::session_store::{SESSION_ADDRESS_KEY, SessionStore, saved_address};

/// Path the provider returns to after sign-out.
pub const SIGN_OUT_REDIRECT: &str = "/";

pub trait WalletConnector {
    /// Ask the provider for an address.
    fn connect(&self) -> impl Future<Output = Result<WalletAddress, ConnectionError>> + Send;

    /// Provider-side sign-out. Defaults to nothing.
    fn sign_out(&self, _redirect_path: &str) {}
}

#[derive(Debug)]
pub struct WalletGateway<C, S> {
    connector: C,
    store: S,
    state: watch::Sender<SessionState>,
}

impl<C: WalletConnector, S: SessionStore> WalletGateway<C, S> {
    /// Build the gateway and restore a saved session if there is one.
    pub fn new(connector: C, store: S) -> Self {
        let initial = match saved_address(&store) {
            Some(address) => {
                tracing::info!("SessionRestored address={}", address.abbreviated());
                SessionState::Connected(address)
            }
            None => SessionState::Disconnected,
        };
        let (state, _) = watch::channel(initial);
        Self {
            connector,
            store,
            state,
        }
    }

    /// Snapshot of the session.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the wallet handshake. An existing session is returned as-is; a
    /// call made while another is in flight is rejected without touching the
    /// provider.
    pub async fn connect(&self) -> Result<WalletAddress, ConnectionError> {
        let mut existing = None;
        let started = self.state.send_if_modified(|state| match state {
            SessionState::Connected(address) => {
                existing = Some(address.clone());
                false
            }
            SessionState::Connecting => false,
            SessionState::Disconnected => {
                *state = SessionState::Connecting;
                true
            }
        });
        if let Some(address) = existing {
            return Ok(address);
        }
        if !started {
            tracing::debug!("WalletConnectRejected reason=in_flight");
            return Err(ConnectionError::AlreadyConnecting);
        }
        let mut pending = PendingConnect {
            state: &self.state,
            armed: true,
        };

        let result = self.connector.connect().await;
        pending.armed = false;
        match result {
            Ok(address) => {
                if let Err(e) = self.store.set(SESSION_ADDRESS_KEY, address.as_str()) {
                    tracing::warn!("SessionPersistFailed error={e}");
                }
                tracing::info!("WalletConnected address={}", address.abbreviated());
                self.state
                    .send_replace(SessionState::Connected(address.clone()));
                Ok(address)
            }
            Err(e) => {
                tracing::error!("WalletConnectFailed error={e}");
                self.state.send_replace(SessionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Forget the session: storage, provider and state.
    pub fn disconnect(&self) {
        if let Err(e) = self.store.remove(SESSION_ADDRESS_KEY) {
            tracing::warn!("SessionClearFailed error={e}");
        }
        self.connector.sign_out(SIGN_OUT_REDIRECT);
        self.state.send_replace(SessionState::Disconnected);
        tracing::info!("WalletDisconnected");
    }
}

/// Resets `Connecting` back to `Disconnected` if a connect future is dropped
/// before the provider answers.
struct PendingConnect<'a> {
    state: &'a watch::Sender<SessionState>,
    armed: bool,
}

impl Drop for PendingConnect<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = SessionState::Disconnected;
                true
            } else {
                false
            }
        });
        tracing::debug!("WalletConnectAbandoned");
    }
}
