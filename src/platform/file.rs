//! File-backed platform provider.
//!
//! Reads a JSON snapshot document describing sites, pools, and scheduled
//! tasks. The file is re-read on every call, so edits show up on the next
//! poll cycle without a restart.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use super::models::{AppPool, ScheduledTask, Site};
use super::{Inventory, PlatformError, TaskReader};

/// Top-level shape of the snapshot document.
#[derive(Debug, Deserialize)]
struct PlatformSnapshot {
    #[serde(default)]
    sites: Vec<Site>,
    #[serde(default)]
    pools: Vec<AppPool>,
    #[serde(default)]
    tasks: Vec<ScheduledTask>,
}

/// Platform provider backed by a JSON snapshot file.
pub struct FilePlatform {
    path: PathBuf,
}

impl FilePlatform {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<PlatformSnapshot, PlatformError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Inventory for FilePlatform {
    fn sites(&self) -> Result<Vec<Site>, PlatformError> {
        Ok(self.read()?.sites)
    }

    fn pools(&self) -> Result<Vec<AppPool>, PlatformError> {
        Ok(self.read()?.pools)
    }
}

impl TaskReader for FilePlatform {
    fn tasks(&self) -> Result<Vec<ScheduledTask>, PlatformError> {
        Ok(self.read()?.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "sites": [
            {
                "name": "Default Web Site",
                "state": "started",
                "physical_path": "C:\\inetpub\\wwwroot",
                "pool": "DefaultAppPool",
                "bindings": [
                    { "protocol": "http", "binding_information": "*:80:" }
                ],
                "applications": [
                    { "path": "/api", "physical_path": "C:\\inetpub\\api", "pool": "ApiPool" }
                ]
            }
        ],
        "pools": [
            {
                "name": "DefaultAppPool",
                "state": "Started",
                "runtime_version": "v4.0",
                "pipeline_mode": "integrated",
                "enable_32bit": false,
                "identity": "application_pool_identity",
                "idle_timeout_minutes": 20,
                "worker_processes": [ { "pid": 4242 } ]
            }
        ],
        "tasks": [
            {
                "name": "Nightly Backup",
                "enabled": true,
                "triggers": [ { "type": "daily", "every_days": 1, "at": "02:00" } ],
                "actions": [ { "type": "execute", "command": "backup.exe", "arguments": null } ]
            }
        ]
    }"#;

    fn write_snapshot(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn test_reads_sites_pools_and_tasks() {
        let tmp = write_snapshot(SNAPSHOT);
        let platform = FilePlatform::new(tmp.path());

        let sites = platform.sites().unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name, "Default Web Site");
        assert_eq!(sites[0].applications.len(), 1);

        let pools = platform.pools().unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].worker_processes[0].pid, 4242);

        let tasks = platform.tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].triggers[0].describe(), "Daily at 02:00");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let platform = FilePlatform::new("/nonexistent/platform.json");
        assert!(platform.sites().is_err());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let tmp = write_snapshot("{ not json");
        let platform = FilePlatform::new(tmp.path());
        assert!(platform.pools().is_err());
    }

    #[test]
    fn test_rereads_file_on_every_call() {
        let tmp = write_snapshot(r#"{ "sites": [], "pools": [], "tasks": [] }"#);
        let platform = FilePlatform::new(tmp.path());
        assert!(platform.sites().unwrap().is_empty());

        std::fs::write(tmp.path(), SNAPSHOT).unwrap();
        assert_eq!(platform.sites().unwrap().len(), 1);
    }
}
