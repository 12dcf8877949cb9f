//! Poll scheduler driving the health-check cycle.
//!
//! One long-lived task wakes on a fixed interval, pulls the current site
//! inventory, derives endpoints, and fans checks out through a bounded
//! semaphore. A broadcast channel stops the loop, including mid-cycle.

mod url;

pub use url::*;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Semaphore};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::platform::Inventory;
use crate::probe::EndpointChecker;
use crate::store::StatusStore;

/// Upper bound on simultaneous in-flight checks per cycle.
const MAX_CONCURRENT_CHECKS: usize = 8;

/// Periodic poller: inventory -> endpoints -> checks -> store.
pub struct PollScheduler {
    inventory: Arc<dyn Inventory>,
    checker: Arc<EndpointChecker>,
    store: Arc<StatusStore>,
    interval: Duration,
    shutdown_tx: broadcast::Sender<()>,
}

impl PollScheduler {
    pub fn new(
        inventory: Arc<dyn Inventory>,
        checker: Arc<EndpointChecker>,
        store: Arc<StatusStore>,
        interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            inventory,
            checker,
            store,
            interval,
            shutdown_tx,
        }
    }

    /// Spawn the poll loop. The first cycle runs immediately; subsequent
    /// cycles fire on the configured interval. Ticks that would overlap a
    /// still-running cycle are skipped rather than queued.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self;
        let mut shutdown_rx = scheduler.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(scheduler.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_secs = scheduler.interval.as_secs(),
                "poll scheduler started"
            );

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("poll scheduler stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = shutdown_rx.recv() => {
                                tracing::info!("poll scheduler stopping mid-cycle");
                                break;
                            }
                            _ = scheduler.run_cycle() => {}
                        }
                    }
                }
            }
        })
    }

    /// Signal the poll loop to stop. Idempotent; safe to call with no loop
    /// running.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Run one full check cycle. An inventory read failure abandons this
    /// cycle and leaves all recorded state untouched; the next tick starts
    /// from a clean read.
    pub async fn run_cycle(&self) {
        let sites = match self.inventory.sites() {
            Ok(sites) => sites,
            Err(e) => {
                tracing::error!(error = %e, "inventory read failed, skipping cycle");
                return;
            }
        };

        let endpoints = derive_endpoints(&sites);
        if endpoints.is_empty() {
            tracing::debug!("no checkable endpoints in inventory");
            return;
        }

        tracing::debug!(count = endpoints.len(), "check cycle starting");

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_CHECKS));
        let mut tasks = JoinSet::new();

        for endpoint in endpoints {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let checker = self.checker.clone();
            let store = self.store.clone();

            tasks.spawn(async move {
                let outcome = checker.check(&endpoint.url).await;
                if !outcome.responding {
                    tracing::warn!(
                        site = %endpoint.id.site,
                        path = %endpoint.id.path,
                        error = outcome.error.as_deref().unwrap_or("unknown"),
                        "endpoint check failed"
                    );
                }
                store.record(&endpoint.id, outcome, Utc::now());
                drop(permit);
            });
        }

        while tasks.join_next().await.is_some() {}

        tracing::debug!("check cycle complete");
    }
}
