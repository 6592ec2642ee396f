//! ドメイン層のエラー型

use thiserror::Error;

/// 接続レジストリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同時接続数の上限に達している
    #[error("connection registry is at capacity ({max} connections)")]
    CapacityExceeded { max: usize },

    /// シャットダウン中のため新規登録を受け付けない
    #[error("connection registry is closed")]
    Closed,
}

/// トランスポートへの書き込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// クライアント側のストリームが既に閉じている
    #[error("transport is closed")]
    Closed,

    /// 送信バッファが満杯（クライアントが読み出していない）
    #[error("transport send buffer is full")]
    Backpressure,
}

/// デバイス API 取得時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// HTTP リクエスト自体が失敗した（接続不可、タイムアウトなど）
    #[error("device request failed: {0}")]
    Request(String),

    /// デバイス API が成功以外のステータスを返した
    #[error("device API returned status {0}")]
    Status(u16),

    /// レスポンスの形式が想定と異なる
    #[error("failed to decode device response: {0}")]
    Decode(String),

    /// 必要な設定（デバイス ID など）がない
    #[error("device source is not configured")]
    NotConfigured,
}
