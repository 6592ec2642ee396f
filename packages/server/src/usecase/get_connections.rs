//! UseCase: 接続状況の取得（診断用）

use crate::domain::ConnectionSummary;

use super::SharedRegistry;

/// 接続状況
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionsOverview {
    pub size: usize,
    pub max_connections: usize,
    pub emergency_threshold: usize,
    /// 登録順の接続一覧
    pub connections: Vec<ConnectionSummary>,
}

/// 接続状況取得のユースケース
pub struct GetConnectionsUseCase {
    registry: SharedRegistry,
    emergency_threshold: usize,
}

impl GetConnectionsUseCase {
    pub fn new(registry: SharedRegistry, emergency_threshold: usize) -> Self {
        Self {
            registry,
            emergency_threshold,
        }
    }

    pub async fn execute(&self) -> ConnectionsOverview {
        let registry = self.registry.lock().await;
        ConnectionsOverview {
            size: registry.size(),
            max_connections: registry.max_connections(),
            emergency_threshold: self.emergency_threshold,
            connections: registry.summaries(),
        }
    }
}
