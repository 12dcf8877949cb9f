//! sitewatch - host web-serving and task-scheduling monitor.
//!
//! Enumerates sites, pools, and scheduled tasks from a platform snapshot,
//! polls site endpoints over HTTP on a timer, and serves the merged
//! inventory-plus-health view as JSON.

mod config;
mod drift;
mod platform;
mod probe;
mod scheduler;
mod store;
mod web;

use std::sync::Arc;

use config::ServerConfig;
use platform::FilePlatform;
use probe::{EndpointChecker, TlsPolicy};
use scheduler::PollScheduler;
use store::StatusStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sitewatch=info".parse()?),
        )
        .init();

    let cfg = ServerConfig::load();
    tracing::info!("starting sitewatch on port {}", cfg.http_port);
    tracing::info!("reading platform snapshot from {}", cfg.platform_path);

    let platform = Arc::new(FilePlatform::new(&cfg.platform_path));
    let store = Arc::new(StatusStore::new(cfg.max_history));

    let tls = if cfg.trust_all_certs {
        TlsPolicy::TrustAll
    } else {
        TlsPolicy::Validated
    };
    let checker = Arc::new(EndpointChecker::new(cfg.check_timeout(), tls)?);

    let scheduler = Arc::new(PollScheduler::new(
        platform.clone(),
        checker,
        store.clone(),
        cfg.refresh_interval(),
    ));
    let poll_loop = scheduler.clone().start();

    let server = Server::new(cfg, platform.clone(), platform, store);
    let result = server.start().await;

    scheduler.shutdown();
    let _ = poll_loop.await;

    result
}
