//! Simulated live price feed.
//!
//! A tokio task ticks every `period` and moves the price by a uniform
//! random delta in `[-max_delta, +max_delta]`, never below `floor`. The
//! first tick fires one full period after spawn.
//!
//! The task is owned by exactly one `PriceFeedHandle`. Cancelling the handle
//! (explicitly or by dropping it) aborts the task and closes the channel, so
//! no price is delivered after teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use vault_core::dashboard::perturb_price;

/// Buffered price updates between the task and its consumer.
const PRICE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFeedConfig {
    pub period: Duration,
    pub max_delta: f64,
    pub floor: f64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(5000),
            max_delta: 0.01,
            floor: 0.1,
        }
    }
}

/// Owner of a running feed task.
#[derive(Debug)]
pub struct PriceFeedHandle {
    task: Option<JoinHandle<()>>,
    updates: mpsc::Receiver<f64>,
    ticks: Arc<AtomicU64>,
}

/// Start a feed at `initial_price`. Must be called inside a tokio runtime.
pub fn spawn_price_feed<R>(initial_price: f64, config: PriceFeedConfig, mut rng: R) -> PriceFeedHandle
where
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(PRICE_CHANNEL_CAPACITY);
    let ticks = Arc::new(AtomicU64::new(0));
    let task_ticks = Arc::clone(&ticks);

    let max_delta = if config.max_delta.is_finite() {
        config.max_delta.abs()
    } else {
        0.0
    };
    let floor = config.floor;
    let period = config.period.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut price = perturb_price(initial_price, 0.0, floor);
        loop {
            ticker.tick().await;
            let delta = rng.gen_range(-max_delta..=max_delta);
            price = perturb_price(price, delta, floor);
            task_ticks.fetch_add(1, Ordering::Relaxed);
            if tx.send(price).await.is_err() {
                break;
            }
        }
        tracing::debug!("PriceFeedStopped reason=receiver_closed");
    });

    PriceFeedHandle {
        task: Some(task),
        updates: rx,
        ticks,
    }
}

impl PriceFeedHandle {
    /// Next price from the feed; `None` once cancelled.
    pub async fn next_price(&mut self) -> Option<f64> {
        if self.task.is_none() {
            return None;
        }
        self.updates.recv().await
    }

    /// Ticks generated by the task so far.
    pub fn ticks_emitted(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Shared tick gauge; keeps reading after the handle is gone.
    pub fn tick_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.ticks)
    }

    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }

    /// Stop the task and discard anything still buffered. Idempotent.
    pub fn cancel(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.abort();
        self.updates.close();
        while self.updates.try_recv().is_ok() {}
        tracing::debug!("PriceFeedCancelled ticks={}", self.ticks_emitted());
    }
}

impl Drop for PriceFeedHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
