//! UseCase: スナップショットのブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PublishSnapshotUseCase::publish() メソッド
//! - 内容が変わらない限り書き込みが発生しないこと（重複排除）
//! - 書き込み失敗した接続だけが走査後に削除されること
//!
//! ### なぜこのテストが必要か
//! - ポーラーは 30 秒ごとに同じ内容を渡してくるため、重複排除がないと帯域を浪費する
//! - 1 つの壊れた接続が他の接続への配信を止めてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 接続への配信と重複排除
//! - 異常系：一部接続の書き込み失敗
//! - エッジケース：接続 0 件での publish

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, Frame, Snapshot};

use super::SharedRegistry;

/// publish の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 前回と同じ内容だったため何もしなかった
    Unchanged,
    /// 配信した
    Broadcast {
        /// 書き込みに成功した接続
        delivered: Vec<ConnectionId>,
        /// 書き込みに失敗して削除した接続
        removed: Vec<ConnectionId>,
    },
}

/// スナップショットのブロードキャストのユースケース
pub struct PublishSnapshotUseCase {
    /// 接続レジストリ（死活監視と共有）
    registry: SharedRegistry,
    /// 最後に配信した正規化シリアライズ
    ///
    /// publish の間は保持し続けるので、比較と更新が他の publish と交互に実行されることはない。
    /// ロック順序は常に last_broadcast → registry。
    last_broadcast: Mutex<Option<String>>,
}

impl PublishSnapshotUseCase {
    /// 新しい PublishSnapshotUseCase を作成
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            last_broadcast: Mutex::new(None),
        }
    }

    /// スナップショットを配信する
    ///
    /// 前回配信した内容と同じであれば何もしない（レジストリにも触れない）。
    pub async fn publish(&self, snapshot: &Snapshot) -> PublishOutcome {
        let canonical = snapshot.canonical();

        let mut last_broadcast = self.last_broadcast.lock().await;
        if last_broadcast.as_deref() == Some(canonical.as_str()) {
            tracing::debug!("Snapshot unchanged, skipping broadcast");
            return PublishOutcome::Unchanged;
        }

        let payload: Arc<str> = Arc::from(canonical.as_str());
        *last_broadcast = Some(canonical);

        let mut registry = self.registry.lock().await;
        tracing::info!("Data changed, broadcasting to {} clients", registry.size());

        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        registry.for_each(|id, connection| {
            match connection.send(Frame::Data(payload.clone())) {
                Ok(()) => delivered.push(id),
                Err(e) => {
                    tracing::warn!("Failed to send snapshot to client {}: {}", id, e);
                    failed.push(id);
                }
            }
        });

        for id in &delivered {
            registry.touch(*id);
        }
        for id in &failed {
            registry.remove(*id);
        }

        if !failed.is_empty() {
            tracing::info!(
                "Removed {} dead clients during broadcast. Active clients: {}",
                failed.len(),
                registry.size()
            );
        }

        PublishOutcome::Broadcast {
            delivered,
            removed: failed,
        }
    }

    /// 最後に配信した正規化シリアライズ
    pub async fn last_broadcast(&self) -> Option<String> {
        self.last_broadcast.lock().await.clone()
    }

    /// 記録している配信内容を破棄する（次の publish は必ず配信される）
    pub async fn forget(&self) {
        *self.last_broadcast.lock().await = None;
    }

    /// 最後に配信した内容を固定したままレジストリを操作する
    ///
    /// `f` の実行中は publish が割り込めない。`f` の中で登録した接続は
    /// `current` か、次の publish の内容のどちらかを必ず受け取る。
    pub async fn with_current<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&str>, &mut ConnectionRegistry) -> R,
    {
        let last_broadcast = self.last_broadcast.lock().await;
        let mut registry = self.registry.lock().await;
        f(last_broadcast.as_deref(), &mut registry)
    }
}
