//! HTTP request handlers and view assembly.

use super::AppState;
use crate::drift::compare_pools;
use crate::platform::{Site, SiteState};
use crate::scheduler::{application_url, site_base_url};
use crate::store::{EndpointId, HealthSummary, StatusRecord, StatusStore};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Liveness
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Always 200 while the process is alive, regardless of what the checks
/// are reporting.
pub async fn handle_healthz() -> impl IntoResponse {
    Json(Liveness {
        status: "ok",
        timestamp: Utc::now(),
    })
}

// ============================================================================
// Sites: merged inventory + health view
// ============================================================================

/// One site with its health state merged in. `status: null` means the
/// endpoint was never checked, which is distinct from a recorded failure.
#[derive(Debug, Serialize)]
pub struct SiteView {
    pub name: String,
    pub state: SiteState,
    pub physical_path: String,
    pub pool: String,
    pub url: Option<String>,
    pub status: Option<StatusRecord>,
    pub summary: Option<HealthSummary>,
    pub applications: Vec<ApplicationView>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationView {
    pub path: String,
    pub physical_path: String,
    pub pool: String,
    pub url: Option<String>,
    pub status: Option<StatusRecord>,
    pub summary: Option<HealthSummary>,
}

/// Merge fresh inventory structure with the store's health state.
///
/// Every inventory site appears in the output, including stopped sites and
/// sites without a usable binding; health fields are simply absent for
/// endpoints that were never checked.
pub fn assemble_sites(
    sites: &[Site],
    store: &StatusStore,
    now: DateTime<Utc>,
    window: ChronoDuration,
) -> Vec<SiteView> {
    sites
        .iter()
        .map(|site| {
            let base = site_base_url(site);
            let root_id = EndpointId::site_root(&site.name);

            let applications = site
                .applications
                .iter()
                .map(|app| {
                    let id = EndpointId::new(&site.name, &app.path);
                    ApplicationView {
                        path: app.path.clone(),
                        physical_path: app.physical_path.clone(),
                        pool: app.pool.clone(),
                        url: base.as_deref().map(|b| application_url(b, &app.path)),
                        status: store.latest(&id),
                        summary: store.summary(&id, now, window),
                    }
                })
                .collect();

            SiteView {
                name: site.name.clone(),
                state: site.state,
                physical_path: site.physical_path.clone(),
                pool: site.pool.clone(),
                url: base,
                status: store.latest(&root_id),
                summary: store.summary(&root_id, now, window),
                applications,
            }
        })
        .collect()
}

pub async fn handle_get_sites(State(state): State<AppState>) -> impl IntoResponse {
    let sites = match state.inventory.sites() {
        Ok(sites) => sites,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let window = ChronoDuration::hours(state.config.summary_window_hours);
    let views = assemble_sites(&sites, &state.store, Utc::now(), window);
    Json(views).into_response()
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Application path; defaults to the site root.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub site: String,
    pub path: String,
    pub summary: Option<HealthSummary>,
    /// Newest first.
    pub history: Vec<StatusRecord>,
}

pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let path = query.path.unwrap_or_else(|| "/".to_string());
    let id = EndpointId::new(name.clone(), path.clone());

    let window = ChronoDuration::hours(state.config.summary_window_hours);
    let response = HistoryResponse {
        site: name,
        path,
        summary: state.store.summary(&id, Utc::now(), window),
        history: state.store.history(&id),
    };
    Json(response)
}

// ============================================================================
// Pools and drift
// ============================================================================

pub async fn handle_get_pools(State(state): State<AppState>) -> impl IntoResponse {
    match state.inventory.pools() {
        Ok(pools) => Json(pools).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn handle_get_drift(State(state): State<AppState>) -> impl IntoResponse {
    match state.inventory.pools() {
        Ok(pools) => Json(compare_pools(&pools)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ============================================================================
// Scheduled tasks
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub name: String,
    pub enabled: bool,
    pub state: Option<String>,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub last_result: Option<i32>,
    pub triggers: Vec<String>,
    pub actions: Vec<String>,
}

pub async fn handle_get_tasks(State(state): State<AppState>) -> impl IntoResponse {
    let tasks = match state.tasks.tasks() {
        Ok(tasks) => tasks,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let views: Vec<TaskView> = tasks
        .into_iter()
        .map(|task| TaskView {
            name: task.name,
            enabled: task.enabled,
            state: task.state,
            last_run: task.last_run,
            next_run: task.next_run,
            last_result: task.last_result,
            triggers: task.triggers.iter().map(|t| t.describe()).collect(),
            actions: task.actions.iter().map(|a| a.describe()).collect(),
        })
        .collect();

    Json(views).into_response()
}
