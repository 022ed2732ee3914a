use crate::api::middleware::RequestOwner;
use crate::api::state::AppState;
use crate::error::AppError;
use crate::models::{DashboardOverview, LatestReading, MonthlyPoint};
use crate::services::DashboardRefresher;
use axum::{
    extract::{Extension, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use std::time::Duration;
use tokio_stream::{Stream, StreamExt};

pub async fn get_overview(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
) -> Result<Json<DashboardOverview>, AppError> {
    let overview = state.dashboard.overview(&state.now(), owner.as_deref()).await?;
    Ok(Json(overview))
}

pub async fn get_trend(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
) -> Result<Json<Vec<MonthlyPoint>>, AppError> {
    let trend = state.dashboard.trend(&state.now(), owner.as_deref()).await?;
    Ok(Json(trend))
}

pub async fn get_latest(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
) -> Result<Json<LatestReading>, AppError> {
    let latest = state.dashboard.latest(owner.as_deref()).await?;
    Ok(Json(latest))
}

/// Server-sent snapshots. The refresh task lives exactly as long as the connection.
pub async fn stream(
    State(state): State<AppState>,
    Extension(owner): Extension<RequestOwner>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let settings = state.settings.clone();
    let handle = DashboardRefresher::spawn(
        state.dashboard.clone(),
        owner.0,
        state.refresh_every,
        move || settings.now(),
    );

    let events = handle
        .into_stream()
        .map(|snapshot| Event::default().event("snapshot").json_data(snapshot));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
