//! Connection エンティティ

use std::{fmt, sync::Arc};

use serde::Serialize;

use super::{ConnectionId, EventTransport, Frame, RemoteLabel, TransportError};

/// 長時間接続のクライアント 1 件
///
/// トランスポートはこのエンティティが排他的に所有し、他のコンポーネントは
/// `send` を通してのみ書き込む。
pub struct Connection {
    id: ConnectionId,
    created_at: i64,
    last_activity_at: i64,
    remote_label: RemoteLabel,
    transport: Arc<dyn EventTransport>,
}

impl Connection {
    /// 新しい Connection を作成（`created_at` と `last_activity_at` は同じ時刻）
    pub fn new(
        id: ConnectionId,
        transport: Arc<dyn EventTransport>,
        remote_label: RemoteLabel,
        now: i64,
    ) -> Self {
        Self {
            id,
            created_at: now,
            last_activity_at: now,
            remote_label,
            transport,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_activity_at(&self) -> i64 {
        self.last_activity_at
    }

    pub fn remote_label(&self) -> &RemoteLabel {
        &self.remote_label
    }

    /// 登録からの経過時間（ミリ秒）
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.created_at)
    }

    /// 最後に書き込みが成功してからの経過時間（ミリ秒）
    pub fn idle_for(&self, now: i64) -> i64 {
        now.saturating_sub(self.last_activity_at)
    }

    /// 最終アクティビティ時刻を更新する。時刻は巻き戻らない
    pub(crate) fn touch(&mut self, now: i64) {
        self.last_activity_at = self.last_activity_at.max(now);
    }

    /// フレームを書き込む
    pub fn send(&self, frame: Frame) -> Result<(), TransportError> {
        self.transport.send(frame)
    }

    /// トランスポートが既に閉じているか
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// まだ開いていればトランスポートを閉じる
    pub(crate) fn close(&self) {
        if !self.transport.is_closed() {
            self.transport.close();
        }
    }

    /// 診断用のサマリを作成
    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            id: self.id,
            remote_label: self.remote_label.clone(),
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("last_activity_at", &self.last_activity_at)
            .field("remote_label", &self.remote_label)
            .finish_non_exhaustive()
    }
}

/// 接続の診断情報（トランスポートを含まない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub remote_label: RemoteLabel,
    pub created_at: i64,
    pub last_activity_at: i64,
}
