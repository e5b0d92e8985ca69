use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use chrono::Local;
use serde::Serialize;
use tokio::{net::TcpListener, sync::watch};

use crate::{
    core::{monitor::Snapshot, time_range::TimeRange},
    dashboard::View,
    prelude::*,
};

const INDEX: &str = include_str!("index.html");

#[derive(Clone)]
struct AppState {
    snapshots: watch::Receiver<Arc<Snapshot>>,
    refresh_interval: Duration,
    time_ranges_enabled: bool,
}

#[derive(Serialize)]
struct DashboardResponse {
    #[serde(flatten)]
    view: View,

    refresh_interval_millis: u64,

    /// Button labels, empty when the time-range filtering is disabled.
    time_ranges: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    n_samples: usize,
}

#[bon::builder]
pub fn router(
    snapshots: watch::Receiver<Arc<Snapshot>>,
    refresh_interval: Duration,
    #[builder(default = true)] time_ranges_enabled: bool,
) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/health", get(handle_health))
        .with_state(AppState { snapshots, refresh_interval, time_ranges_enabled })
}

#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, router: Router) -> Result {
    info!(address = %listener.local_addr()?, "listening…");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                error!("failed to listen for the shutdown signal: {error:#}");
            }
            info!("shutting down…");
        })
        .await
        .context("the server has failed")
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX)
}

/// Repeated `range` parameters count as simultaneous triggers; unknown values are ignored.
async fn handle_dashboard(
    State(state): State<AppState>,
    Query(parameters): Query<Vec<(String, String)>>,
) -> Json<DashboardResponse> {
    let range = if state.time_ranges_enabled {
        TimeRange::select(
            parameters
                .iter()
                .filter(|(key, _)| key == "range")
                .filter_map(|(_, value)| value.parse().ok()),
        )
    } else {
        TimeRange::default()
    };
    let snapshot = Arc::clone(&state.snapshots.borrow());
    Json(DashboardResponse {
        view: View::render(&snapshot, range, Local::now()),
        refresh_interval_millis: u64::try_from(state.refresh_interval.as_millis())
            .unwrap_or(u64::MAX),
        time_ranges: if state.time_ranges_enabled {
            TimeRange::ALL.iter().map(ToString::to_string).collect()
        } else {
            Vec::new()
        },
    })
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", n_samples: state.snapshots.borrow().samples.len() })
}
