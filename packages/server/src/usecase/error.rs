//! UseCase 層のエラー型

use std::time::Duration;

use thiserror::Error;

use crate::domain::TransportError;

/// 購読（SSE 接続）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// 同時接続数の上限に達している。`retry_after` 後の再試行を促す
    #[error("server at capacity, retry in {} seconds", retry_after.as_secs())]
    AtCapacity { retry_after: Duration },

    /// シャットダウン中のため受け付けない。再起動後の再接続を促す
    #[error("server is shutting down, retry in {} seconds", retry_after.as_secs())]
    ShuttingDown { retry_after: Duration },

    /// 初期フレームの書き込みに失敗した
    #[error("failed to send initial frames: {0}")]
    HandshakeFailed(TransportError),
}
