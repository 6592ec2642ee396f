//! Conversion logic from use-case results to HTTP DTOs.

use homedash_shared::time::timestamp_to_rfc3339;
use serde_json::Value;

use crate::{
    domain::ConnectionSummary,
    infrastructure::dto::http::{ConnectionDto, ConnectionsDto, DashboardDataDto, ThermostatStatusDto},
    usecase::{CachedSnapshot, ConnectionsOverview},
};

impl From<CachedSnapshot> for DashboardDataDto {
    fn from(cached: CachedSnapshot) -> Self {
        Self {
            degraded: cached.snapshot.is_degraded(),
            data: cached.snapshot.value().clone(),
            captured_at: timestamp_to_rfc3339(cached.captured_at),
        }
    }
}

impl ThermostatStatusDto {
    /// スナップショットにサーモスタットのセクションがあれば要約を作成
    pub fn from_cached(cached: &CachedSnapshot) -> Option<Self> {
        let thermostat = cached.snapshot.section("thermostat")?;
        let field = |name: &str| thermostat.get(name).cloned().unwrap_or(Value::Null);
        Some(Self {
            current_temp: field("currentTemp"),
            heating_setpoint: field("heatingSetpoint"),
            cooling_setpoint: field("coolingSetpoint"),
            humidity: field("humidity"),
            mode: field("mode"),
            fan_mode: field("fanMode"),
            operating_state: field("operatingState"),
            captured_at: timestamp_to_rfc3339(cached.captured_at),
        })
    }
}

impl From<ConnectionSummary> for ConnectionDto {
    fn from(summary: ConnectionSummary) -> Self {
        Self {
            id: summary.id.value(),
            remote: summary.remote_label.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(summary.created_at),
            last_activity_at: timestamp_to_rfc3339(summary.last_activity_at),
        }
    }
}

impl From<ConnectionsOverview> for ConnectionsDto {
    fn from(overview: ConnectionsOverview) -> Self {
        Self {
            active: overview.size,
            max: overview.max_connections,
            emergency_threshold: overview.emergency_threshold,
            connections: overview.connections.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, RemoteLabel, Snapshot, SnapshotBuilder};
    use serde_json::json;

    #[test]
    fn test_dashboard_data_dto_from_cached_snapshot() {
        // テスト項目: スナップショットと RFC 3339 の取得時刻、degraded フラグが変換される
        // given (前提条件):
        let snapshot = SnapshotBuilder::new()
            .section("thermostat", json!({"currentTemp": 70}))
            .unavailable("weather")
            .build();
        let cached = CachedSnapshot {
            snapshot,
            captured_at: 0,
        };

        // when (操作):
        let dto = DashboardDataDto::from(cached);

        // then (期待する結果):
        assert!(dto.degraded);
        assert_eq!(dto.captured_at, "1970-01-01T00:00:00.000Z");
        assert_eq!(dto.data["thermostat"], json!({"currentTemp": 70}));
        assert_eq!(dto.data["weather"], Value::Null);
    }

    #[test]
    fn test_thermostat_status_requires_thermostat_section() {
        // テスト項目: サーモスタットのセクションがない（または null の）場合は None
        // given (前提条件):
        let with = CachedSnapshot {
            snapshot: Snapshot::new(json!({"thermostat": {"currentTemp": 71.5, "mode": "cool"}})),
            captured_at: 0,
        };
        let without = CachedSnapshot {
            snapshot: SnapshotBuilder::new().unavailable("thermostat").build(),
            captured_at: 0,
        };

        // when (操作):
        let status = ThermostatStatusDto::from_cached(&with).unwrap();

        // then (期待する結果):
        assert_eq!(status.current_temp, json!(71.5));
        assert_eq!(status.mode, json!("cool"));
        assert_eq!(status.fan_mode, Value::Null);
        assert!(ThermostatStatusDto::from_cached(&without).is_none());
    }

    #[test]
    fn test_connections_dto_from_overview() {
        // テスト項目: 接続状況が DTO に変換される
        // given (前提条件):
        let overview = ConnectionsOverview {
            size: 1,
            max_connections: 50,
            emergency_threshold: 40,
            connections: vec![ConnectionSummary {
                id: ConnectionId::new(3),
                remote_label: RemoteLabel::new("192.168.1.20"),
                created_at: 0,
                last_activity_at: 1_000,
            }],
        };

        // when (操作):
        let dto = ConnectionsDto::from(overview);

        // then (期待する結果):
        assert_eq!(dto.active, 1);
        assert_eq!(dto.connections[0].id, 3);
        assert_eq!(dto.connections[0].remote, "192.168.1.20");
        assert_eq!(dto.connections[0].last_activity_at, "1970-01-01T00:00:01.000Z");
    }
}
