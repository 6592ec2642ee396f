//! 接続レジストリ
//!
//! 接続 ID から Connection への唯一の正となるマッピング。同時接続数の上限を強制します。
//!
//! ## 設計ノート
//!
//! - ID は単調増加で払い出すため、`BTreeMap` の走査順がそのまま登録順になる
//! - `for_each` のクロージャには共有参照しか渡さないので、走査中の削除はコンパイル時に防がれる。
//!   呼び出し側は削除対象の ID を集めておき、走査完了後に `remove` する
//! - このレジストリ自体は同期構造体で、並行アクセスの直列化は呼び出し側（Mutex）が担う

use std::{collections::BTreeMap, sync::Arc};

use homedash_shared::time::Clock;

use super::{
    Connection, ConnectionId, ConnectionSummary, EventTransport, RegistryError, RemoteLabel,
};

/// 接続レジストリ
pub struct ConnectionRegistry {
    connections: BTreeMap<ConnectionId, Connection>,
    next_id: u64,
    max_connections: usize,
    /// `drain` 後は true になり、以降の登録は拒否される
    closed: bool,
    clock: Arc<dyn Clock>,
}

impl ConnectionRegistry {
    /// 新しい ConnectionRegistry を作成
    ///
    /// # Arguments
    ///
    /// * `max_connections` - 同時接続数の上限
    /// * `clock` - タイムスタンプの取得元
    pub fn new(max_connections: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            connections: BTreeMap::new(),
            next_id: 1,
            max_connections,
            closed: false,
            clock,
        }
    }

    /// 接続を登録する
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 登録成功
    /// * `Err(RegistryError::CapacityExceeded)` - 上限に達している（レジストリは変化しない）
    /// * `Err(RegistryError::Closed)` - `drain` 済み
    pub fn register(
        &mut self,
        transport: Arc<dyn EventTransport>,
        remote_label: RemoteLabel,
    ) -> Result<ConnectionId, RegistryError> {
        if self.closed {
            return Err(RegistryError::Closed);
        }
        if self.connections.len() >= self.max_connections {
            return Err(RegistryError::CapacityExceeded {
                max: self.max_connections,
            });
        }

        let id = ConnectionId::new(self.next_id);
        self.next_id += 1;

        let now = self.clock.now_millis();
        self.connections
            .insert(id, Connection::new(id, transport, remote_label, now));

        tracing::debug!(
            "Connection {} registered ({}/{})",
            id,
            self.connections.len(),
            self.max_connections
        );
        Ok(id)
    }

    /// 最終アクティビティ時刻を現在時刻に更新する（存在しない ID は無視）
    pub fn touch(&mut self, id: ConnectionId) {
        let now = self.clock.now_millis();
        if let Some(connection) = self.connections.get_mut(&id) {
            connection.touch(now);
        }
    }

    /// 接続を削除する
    ///
    /// トランスポートがまだ開いていれば閉じる。削除済みの ID に対しては何もしない。
    ///
    /// # Returns
    ///
    /// 削除前に存在していたかどうか
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        match self.connections.remove(&id) {
            Some(connection) => {
                connection.close();
                tracing::debug!(
                    "Connection {} removed ({}/{})",
                    id,
                    self.connections.len(),
                    self.max_connections
                );
                true
            }
            None => false,
        }
    }

    /// 登録順に全ての接続を走査する
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(ConnectionId, &Connection),
    {
        for (id, connection) in &self.connections {
            f(*id, connection);
        }
    }

    /// 接続を取得
    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// 登録中の接続 ID（登録順）
    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().copied().collect()
    }

    /// 登録中の接続数
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// 現在時刻（レジストリが使う時計）
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// 全ての接続を取り出してレジストリを閉じる（シャットダウン用）
    ///
    /// 同じロックの中で閉じるので、取り出した後に登録される接続は存在しない。
    pub fn drain(&mut self) -> Vec<Connection> {
        self.closed = true;
        std::mem::take(&mut self.connections).into_values().collect()
    }

    /// 診断用のサマリ一覧（登録順）
    pub fn summaries(&self) -> Vec<ConnectionSummary> {
        self.connections.values().map(Connection::summary).collect()
    }
}
