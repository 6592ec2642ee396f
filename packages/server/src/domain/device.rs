//! DeviceSource trait 定義
//!
//! ポーラーが状態を取得する外部デバイス API のインターフェース。
//! UseCase 層はこの trait に依存し、Hubitat などの具体的な実装には依存しない。

use async_trait::async_trait;
use serde_json::Value;

use super::DeviceError;

/// 外部デバイス API 1 系統分の状態取得
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// スナップショット内のセクション名（例: "thermostat"）
    fn name(&self) -> &'static str;

    /// 現在の状態を取得
    async fn fetch(&self) -> Result<Value, DeviceError>;
}
