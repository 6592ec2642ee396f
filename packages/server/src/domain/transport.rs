//! EventTransport trait 定義
//!
//! 長時間接続のクライアントへフレームを書き込むためのインターフェース。
//! 具体的な実装（SSE）は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 設計ノート
//!
//! 書き込みは同期（ノンブロッキング）で行います。レジストリのロックを保持したまま
//! 全接続へ書き込むため、`await` を挟まないことが前提です。

use super::{Frame, TransportError};

/// クライアント接続のトランスポート
pub trait EventTransport: Send + Sync {
    /// フレームを書き込む（ブロックしない）
    fn send(&self, frame: Frame) -> Result<(), TransportError>;

    /// クライアント側が既に切断されているか
    fn is_closed(&self) -> bool;

    /// ストリームを閉じる（ベストエフォート、エラーは無視）
    fn close(&self);
}
