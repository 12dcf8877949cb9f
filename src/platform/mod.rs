//! Platform module for sitewatch.
//!
//! Defines the narrow interfaces through which the monitor reads live
//! platform state: site/pool inventory and scheduled tasks. Every call
//! re-reads the platform; providers never cache.

mod file;
mod models;

pub use file::*;
pub use models::*;

use thiserror::Error;

/// Platform access error types.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("platform read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("platform snapshot malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Live site and application-pool inventory.
///
/// Implementations must re-query the platform on every call; callers treat
/// a failure as "skip this cycle" and never crash on it.
pub trait Inventory: Send + Sync {
    fn sites(&self) -> Result<Vec<Site>, PlatformError>;
    fn pools(&self) -> Result<Vec<AppPool>, PlatformError>;
}

/// Scheduled-task listing.
pub trait TaskReader: Send + Sync {
    fn tasks(&self) -> Result<Vec<ScheduledTask>, PlatformError>;
}
