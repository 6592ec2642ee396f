//! UseCase: SSE 購読の受付と切断
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubscribeUseCase::execute() / disconnect() メソッド
//! - 初期フレーム（connected コメント、最後に配信された内容）の送信
//!
//! ### なぜこのテストが必要か
//! - 上限到達時はストリームを開かずに再試行を促さなければならない
//! - 初期フレームを送れない接続はその場で回収しないとレジストリに残り続ける
//! - 購読と配信が重なっても、新しい接続が古い状態のまま取り残されてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：初期フレームの送信
//! - 異常系：上限到達、シャットダウン後の購読、初期フレームの書き込み失敗
//! - エッジケース：緊急閾値到達時の事前スイープで空きができる

use std::{sync::Arc, time::Duration};

use crate::domain::{
    ConnectionId, EventTransport, Frame, RegistryError, RemoteLabel, TransportError,
};

use super::{LivenessMonitor, PublishSnapshotUseCase, SharedRegistry, SubscribeError};

/// SSE 購読のユースケース
pub struct SubscribeUseCase {
    /// 接続レジストリ
    registry: SharedRegistry,
    /// 初期データは最後に配信された内容を使う
    broadcaster: Arc<PublishSnapshotUseCase>,
    /// 緊急閾値到達時の事前スイープに使う
    monitor: Arc<LivenessMonitor>,
    /// 上限到達時にクライアントへ伝える再試行までの時間
    retry_after: Duration,
}

impl SubscribeUseCase {
    /// 新しい SubscribeUseCase を作成
    pub fn new(
        registry: SharedRegistry,
        broadcaster: Arc<PublishSnapshotUseCase>,
        monitor: Arc<LivenessMonitor>,
        retry_after: Duration,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            monitor,
            retry_after,
        }
    }

    /// 購読を受け付ける
    ///
    /// 登録と初期フレームの送信は broadcaster のロックの中で行うため、
    /// 登録済みの接続が最新の配信を取りこぼすことはない。
    ///
    /// # Arguments
    ///
    /// * `transport` - クライアントへのトランスポート
    /// * `remote_label` - 接続元のラベル（診断用）
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 登録成功
    /// * `Err(SubscribeError::AtCapacity)` - 上限に達している
    /// * `Err(SubscribeError::ShuttingDown)` - シャットダウン処理が始まっている
    /// * `Err(SubscribeError::HandshakeFailed)` - 初期フレームの送信に失敗（登録は取り消し済み）
    pub async fn execute(
        &self,
        transport: Arc<dyn EventTransport>,
        remote_label: RemoteLabel,
    ) -> Result<ConnectionId, SubscribeError> {
        // 1. 緊急閾値に達していれば先にスイープして空きを作る
        let size = self.registry.lock().await.size();
        if size >= self.monitor.policy().emergency_threshold {
            tracing::info!("Connection count {} at emergency threshold, sweeping first", size);
            self.monitor.sweep_pass().await;
        }

        let retry_after = self.retry_after;
        self.broadcaster
            .with_current(|current, registry| {
                // 2. 登録
                let id = match registry.register(transport, remote_label.clone()) {
                    Ok(id) => id,
                    Err(RegistryError::CapacityExceeded { max }) => {
                        tracing::warn!(
                            "Maximum SSE clients ({}) reached, rejecting connection from {}",
                            max,
                            remote_label
                        );
                        return Err(SubscribeError::AtCapacity { retry_after });
                    }
                    Err(RegistryError::Closed) => {
                        tracing::info!(
                            "Server shutting down, rejecting connection from {}",
                            remote_label
                        );
                        return Err(SubscribeError::ShuttingDown { retry_after });
                    }
                };

                // 3. 初期フレームの送信
                let handshake: Result<(), TransportError> =
                    registry.get(id).map_or(Ok(()), |connection| {
                        connection.send(Frame::connected())?;
                        if let Some(canonical) = current {
                            connection.send(Frame::Data(Arc::from(canonical)))?;
                        }
                        Ok(())
                    });

                match handshake {
                    Ok(()) => {
                        if current.is_some() {
                            registry.touch(id);
                        }
                        tracing::info!(
                            "New SSE client connected (ID: {}, IP: {}). Total clients: {}",
                            id,
                            remote_label,
                            registry.size()
                        );
                        Ok(id)
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to send initial frames, removing client {}: {}",
                            id,
                            e
                        );
                        registry.remove(id);
                        Err(SubscribeError::HandshakeFailed(e))
                    }
                }
            })
            .await
    }

    /// クライアント切断時の後始末（削除済みなら何もしない）
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let mut registry = self.registry.lock().await;
        let removed = registry.remove(id);
        if removed {
            tracing::info!(
                "SSE client disconnected (ID: {}). Total clients: {}",
                id,
                registry.size()
            );
        }
        removed
    }
}
