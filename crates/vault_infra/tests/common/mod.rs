#![allow(dead_code)]

use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::oneshot;
use vault_core::session::{ConnectionError, WalletAddress};
use vault_infra::wallet::WalletConnector;

pub const ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";

pub fn address() -> WalletAddress {
    WalletAddress::new(ADDRESS).expect("test address is non-empty")
}

/// Connector that answers every call with the same result.
#[derive(Debug)]
pub struct FixedConnector {
    result: Result<WalletAddress, ConnectionError>,
    calls: AtomicU64,
    sign_outs: Mutex<Vec<String>>,
}

impl FixedConnector {
    pub fn ok() -> Self {
        Self::with_result(Ok(address()))
    }

    pub fn failing(error: ConnectionError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<WalletAddress, ConnectionError>) -> Self {
        Self {
            result,
            calls: AtomicU64::new(0),
            sign_outs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn sign_outs(&self) -> Vec<String> {
        self.sign_outs.lock().unwrap().clone()
    }
}

impl WalletConnector for FixedConnector {
    async fn connect(&self) -> Result<WalletAddress, ConnectionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }

    fn sign_out(&self, redirect_path: &str) {
        self.sign_outs.lock().unwrap().push(redirect_path.to_string());
    }
}

/// Connector whose single answer is released by the test through a oneshot.
/// If the sender is dropped, the call never resolves.
#[derive(Debug)]
pub struct GatedConnector {
    answer: Mutex<Option<oneshot::Receiver<Result<WalletAddress, ConnectionError>>>>,
}

impl GatedConnector {
    pub fn new() -> (Self, oneshot::Sender<Result<WalletAddress, ConnectionError>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                answer: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

impl WalletConnector for GatedConnector {
    fn connect(&self) -> impl Future<Output = Result<WalletAddress, ConnectionError>> + Send {
        let answer = self.answer.lock().unwrap().take();
        async move {
            match answer {
                Some(rx) => match rx.await {
                    Ok(result) => result,
                    Err(_) => std::future::pending::<Result<WalletAddress, ConnectionError>>().await,
                },
                None => Err(ConnectionError::ProviderUnavailable),
            }
        }
    }
}

pub fn temp_store_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "vault_session_{tag}_{}_{}.json",
        std::process::id(),
        nanos
    ))
}

pub fn remove_if_exists(path: &std::path::Path) {
    let _ = std::fs::remove_file(path);
}
