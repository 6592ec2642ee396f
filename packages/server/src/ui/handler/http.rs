//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{ConnectionsDto, DashboardDataDto, ThermostatStatusDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// 最新スナップショット（まだ 1 度もポーリングしていなければ 404）
pub async fn dashboard_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardDataDto>, StatusCode> {
    state
        .poll_devices_usecase
        .latest()
        .await
        .map(|cached| Json(cached.into()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// サーモスタットの要約
pub async fn thermostat_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThermostatStatusDto>, StatusCode> {
    let cached = state
        .poll_devices_usecase
        .latest()
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    ThermostatStatusDto::from_cached(&cached)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// 接続状況（診断用）
pub async fn list_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionsDto> {
    Json(state.get_connections_usecase.execute().await.into())
}
