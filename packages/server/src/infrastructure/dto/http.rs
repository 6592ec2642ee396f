//! HTTP API のレスポンス DTO

use serde::Serialize;
use serde_json::Value;

/// `GET /api/dashboard-data`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDataDto {
    /// 最新スナップショット
    pub data: Value,
    /// 取得時刻（RFC 3339）
    pub captured_at: String,
    /// 取得に失敗したソースがあるか
    pub degraded: bool,
}

/// `GET /api/status`（サーモスタットの要約）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatStatusDto {
    pub current_temp: Value,
    pub heating_setpoint: Value,
    pub cooling_setpoint: Value,
    pub humidity: Value,
    pub mode: Value,
    pub fan_mode: Value,
    pub operating_state: Value,
    pub captured_at: String,
}

/// `GET /api/connections` の接続 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub id: u64,
    pub remote: String,
    pub connected_at: String,
    pub last_activity_at: String,
}

/// `GET /api/connections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsDto {
    pub active: usize,
    pub max: usize,
    pub emergency_threshold: usize,
    pub connections: Vec<ConnectionDto>,
}
