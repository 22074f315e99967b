//! Wallet session capability.
//!
//! The wallet handshake and its storage live outside the core. The wizard
//! only asks one question of the session: is there a connected address?
//! That question is the `WalletSession` trait, passed into the flow
//! explicitly instead of being looked up from ambient state.

use std::fmt;

/// A connected wallet's address. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

/// Error for an empty (or whitespace-only) address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddress;

impl fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wallet address must not be empty")
    }
}

impl std::error::Error for InvalidAddress {}

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Result<Self, InvalidAddress> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(InvalidAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `SP2J...9EJ7` form: first four and last four characters.
    pub fn abbreviated(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return self.0.clone();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure of the external wallet-connect handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The user dismissed or rejected the wallet prompt.
    UserRejected,
    /// No wallet provider is installed or reachable.
    ProviderUnavailable,
    /// Provider answered but the handshake failed.
    Transport { reason: String },
    /// Another connect call is still waiting on the provider.
    AlreadyConnecting,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::UserRejected => write!(f, "wallet connection rejected by user"),
            ConnectionError::ProviderUnavailable => write!(f, "no wallet provider available"),
            ConnectionError::Transport { reason } => {
                write!(f, "wallet connection failed: {reason}")
            }
            ConnectionError::AlreadyConnecting => write!(f, "wallet connection already in progress"),
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Read-only view of the wallet session.
pub trait WalletSession {
    fn address(&self) -> Option<&WalletAddress>;

    fn is_connected(&self) -> bool {
        self.address().is_some()
    }
}

impl WalletSession for Option<WalletAddress> {
    fn address(&self) -> Option<&WalletAddress> {
        self.as_ref()
    }
}

/// Session lifecycle, including the pending state while connect runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    /// Connect call in flight; the UI shows a loading indicator.
    Connecting,
    Connected(WalletAddress),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Connecting)
    }
}

impl WalletSession for SessionState {
    fn address(&self) -> Option<&WalletAddress> {
        match self {
            SessionState::Connected(address) => Some(address),
            SessionState::Disconnected | SessionState::Connecting => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_address_is_rejected() {
        assert_eq!(WalletAddress::new("  "), Err(InvalidAddress));
    }

    #[test]
    fn abbreviates_long_addresses() {
        let addr = WalletAddress::new("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7").unwrap();
        assert_eq!(addr.abbreviated(), "SP2J...9EJ7");
    }

    #[test]
    fn short_addresses_are_not_abbreviated() {
        let addr = WalletAddress::new("SP123").unwrap();
        assert_eq!(addr.abbreviated(), "SP123");
    }

    #[test]
    fn connecting_has_no_address() {
        let state = SessionState::Connecting;
        assert!(state.is_loading());
        assert!(!state.is_connected());
    }

    #[test]
    fn connected_exposes_address() {
        let addr = WalletAddress::new("SP123").unwrap();
        let state = SessionState::Connected(addr.clone());
        assert_eq!(state.address(), Some(&addr));
        assert!(!state.is_loading());
    }
}
