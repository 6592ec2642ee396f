//! Server state shared by the handlers.

use std::{sync::Arc, time::Duration};

use crate::usecase::{GetConnectionsUseCase, PollDevicesUseCase, SubscribeUseCase};

/// Shared application state
pub struct AppState {
    /// SubscribeUseCase（SSE 購読のユースケース）
    pub subscribe_usecase: Arc<SubscribeUseCase>,
    /// PollDevicesUseCase（最新スナップショットのキャッシュを持つ）
    pub poll_devices_usecase: Arc<PollDevicesUseCase>,
    /// GetConnectionsUseCase（接続状況取得のユースケース）
    pub get_connections_usecase: Arc<GetConnectionsUseCase>,
    /// 接続ごとの送信バッファ（フレーム数）
    pub send_buffer: usize,
    /// 新規接続時にキャッシュを再利用できる最大経過時間
    pub snapshot_max_age: Duration,
}
