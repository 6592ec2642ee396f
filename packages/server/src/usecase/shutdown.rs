//! UseCase: シャットダウン時の接続クローズ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ShutdownUseCase::notify_and_close() メソッド
//!
//! ### なぜこのテストが必要か
//! - クライアントは server-restart イベントを受け取って再接続を判断するため、
//!   クローズより前に必ず通知されなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：全接続への通知とクローズ
//! - 異常系：通知の書き込みに失敗した接続もクローズされる
//! - エッジケース：接続 0 件

use std::sync::Arc;

use crate::domain::Frame;

use super::{PublishSnapshotUseCase, SharedRegistry};

/// クライアントへ送る再起動メッセージ
pub const RESTART_MESSAGE: &str = "Server restarting";

/// シャットダウンのユースケース
pub struct ShutdownUseCase {
    registry: SharedRegistry,
    broadcaster: Arc<PublishSnapshotUseCase>,
}

impl ShutdownUseCase {
    /// 新しい ShutdownUseCase を作成
    pub fn new(registry: SharedRegistry, broadcaster: Arc<PublishSnapshotUseCase>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 全接続に server-restart を通知してからクローズし、レジストリを閉じる
    ///
    /// レジストリは取り出しと同じロックの中で閉じられるので、処理中の購読は
    /// この後 `ShuttingDown` で拒否される。
    ///
    /// # Returns
    ///
    /// 通知対象だった接続数
    pub async fn notify_and_close(&self) -> usize {
        let connections = self.registry.lock().await.drain();
        let count = connections.len();
        tracing::info!("Notifying {} SSE clients of server restart", count);

        for connection in connections {
            if let Err(e) = connection.send(Frame::server_restart(RESTART_MESSAGE)) {
                tracing::debug!(
                    "Failed to notify client {} of restart: {}",
                    connection.id(),
                    e
                );
            }
            connection.close();
        }
        self.broadcaster.forget().await;
        count
    }
}
