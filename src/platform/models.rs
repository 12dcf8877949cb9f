//! Platform model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteState {
    Started,
    Starting,
    Stopped,
    Stopping,
    Unknown,
}

/// A protocol binding attached to a site.
///
/// `binding_information` is the platform's raw `ip:port:host` form; the
/// host component may be blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub protocol: String,
    pub binding_information: String,
}

/// A sub-application hosted under a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Virtual path, e.g. "/api". The site root is "/" and is not listed here.
    pub path: String,
    pub physical_path: String,
    pub pool: String,
}

/// A web site with its bindings and sub-applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub state: SiteState,
    pub physical_path: String,
    pub pool: String,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// Request-processing pipeline mode of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    Integrated,
    Classic,
}

impl std::fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineMode::Integrated => write!(f, "integrated"),
            PipelineMode::Classic => write!(f, "classic"),
        }
    }
}

/// Identity a pool's worker processes run as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolIdentity {
    LocalSystem,
    LocalService,
    NetworkService,
    ApplicationPoolIdentity,
    SpecificUser,
}

impl std::fmt::Display for PoolIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PoolIdentity::LocalSystem => "local_system",
            PoolIdentity::LocalService => "local_service",
            PoolIdentity::NetworkService => "network_service",
            PoolIdentity::ApplicationPoolIdentity => "application_pool_identity",
            PoolIdentity::SpecificUser => "specific_user",
        };
        f.write_str(label)
    }
}

/// A live worker process serving a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerProcess {
    pub pid: u32,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// An application pool with its process-model settings and live workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPool {
    pub name: String,
    pub state: String,
    pub runtime_version: String,
    pub pipeline_mode: PipelineMode,
    pub enable_32bit: bool,
    pub identity: PoolIdentity,
    pub idle_timeout_minutes: u32,
    #[serde(default)]
    pub worker_processes: Vec<WorkerProcess>,
}

/// What fires a scheduled task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskTrigger {
    Daily { every_days: u32, at: String },
    Weekly { days: Vec<String>, at: String },
    Monthly { days_of_month: Vec<u32>, at: String },
    Once { at: DateTime<Utc> },
    OnLogon { user: Option<String> },
    OnBoot,
    OnIdle,
    OnEvent { log: String, source: Option<String> },
    /// Trigger kinds this monitor does not model; the raw kind is carried
    /// through so it stays visible instead of vanishing into a default arm.
    Other { kind: String },
}

impl TaskTrigger {
    /// Human-readable description of the trigger.
    pub fn describe(&self) -> String {
        match self {
            TaskTrigger::Daily { every_days: 1, at } => format!("Daily at {}", at),
            TaskTrigger::Daily { every_days, at } => {
                format!("Every {} days at {}", every_days, at)
            }
            TaskTrigger::Weekly { days, at } => {
                format!("Weekly on {} at {}", days.join(", "), at)
            }
            TaskTrigger::Monthly { days_of_month, at } => {
                let days: Vec<String> = days_of_month.iter().map(|d| d.to_string()).collect();
                format!("Monthly on day {} at {}", days.join(", "), at)
            }
            TaskTrigger::Once { at } => format!("Once at {}", at.format("%Y-%m-%d %H:%M")),
            TaskTrigger::OnLogon { user: Some(user) } => format!("At logon of {}", user),
            TaskTrigger::OnLogon { user: None } => "At logon of any user".to_string(),
            TaskTrigger::OnBoot => "At system startup".to_string(),
            TaskTrigger::OnIdle => "When the system is idle".to_string(),
            TaskTrigger::OnEvent {
                log,
                source: Some(source),
            } => format!("On event from {} in the {} log", source, log),
            TaskTrigger::OnEvent { log, source: None } => {
                format!("On event in the {} log", log)
            }
            TaskTrigger::Other { kind } => format!("Unrecognized trigger: {}", kind),
        }
    }
}

/// What a scheduled task runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskAction {
    Execute {
        command: String,
        arguments: Option<String>,
    },
    Handler {
        class_id: String,
    },
    Other {
        kind: String,
    },
}

impl TaskAction {
    /// Human-readable description of the action.
    pub fn describe(&self) -> String {
        match self {
            TaskAction::Execute {
                command,
                arguments: Some(args),
            } => format!("Run {} {}", command, args),
            TaskAction::Execute {
                command,
                arguments: None,
            } => format!("Run {}", command),
            TaskAction::Handler { class_id } => format!("Invoke handler {}", class_id),
            TaskAction::Other { kind } => format!("Unrecognized action: {}", kind),
        }
    }
}

/// A scheduled job registered with the host's task scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub name: String,
    pub enabled: bool,
    /// Raw scheduler state label, e.g. "Ready" or "Running".
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_run: Option<DateTime<Utc>>,
    /// Exit code of the last run, if it ever ran.
    #[serde(default)]
    pub last_result: Option<i32>,
    #[serde(default)]
    pub triggers: Vec<TaskTrigger>,
    #[serde(default)]
    pub actions: Vec<TaskAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trigger_descriptions() {
        let daily = TaskTrigger::Daily {
            every_days: 1,
            at: "03:00".to_string(),
        };
        assert_eq!(daily.describe(), "Daily at 03:00");

        let every_third = TaskTrigger::Daily {
            every_days: 3,
            at: "03:00".to_string(),
        };
        assert_eq!(every_third.describe(), "Every 3 days at 03:00");

        let weekly = TaskTrigger::Weekly {
            days: vec!["Mon".to_string(), "Fri".to_string()],
            at: "22:30".to_string(),
        };
        assert_eq!(weekly.describe(), "Weekly on Mon, Fri at 22:30");

        let once = TaskTrigger::Once {
            at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        };
        assert_eq!(once.describe(), "Once at 2024-06-01 12:00");

        assert_eq!(TaskTrigger::OnBoot.describe(), "At system startup");
        assert_eq!(
            TaskTrigger::OnLogon { user: None }.describe(),
            "At logon of any user"
        );
    }

    #[test]
    fn test_unknown_trigger_surfaces_kind() {
        let other = TaskTrigger::Other {
            kind: "session_state_change".to_string(),
        };
        assert!(other.describe().contains("session_state_change"));
    }

    #[test]
    fn test_action_descriptions() {
        let exec = TaskAction::Execute {
            command: "backup.exe".to_string(),
            arguments: Some("--full".to_string()),
        };
        assert_eq!(exec.describe(), "Run backup.exe --full");

        let bare = TaskAction::Execute {
            command: "cleanup.cmd".to_string(),
            arguments: None,
        };
        assert_eq!(bare.describe(), "Run cleanup.cmd");
    }

    #[test]
    fn test_trigger_roundtrip() {
        let trigger = TaskTrigger::OnEvent {
            log: "Application".to_string(),
            source: Some("MyService".to_string()),
        };
        let json = serde_json::to_string(&trigger).unwrap();
        let back: TaskTrigger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trigger);
    }
}
