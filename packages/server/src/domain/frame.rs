//! トランスポートに書き込む 1 単位のフレーム

use std::sync::Arc;

/// クライアントへ送るフレーム
///
/// SSE の表現への変換は Infrastructure 層が行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// コメント行（`: text`）。アプリケーションからは無視される
    Comment(String),
    /// スナップショットの正規化 JSON を運ぶ `data:` イベント
    Data(Arc<str>),
    /// 名前付きイベント（`event: name`）
    Event { name: String, data: String },
    /// ストリームを終了させる
    Close,
}

impl Frame {
    /// 接続確立直後の確認フレーム
    pub fn connected() -> Self {
        Frame::Comment("connected".to_string())
    }

    /// キープアライブ用のハートビートフレーム
    pub fn heartbeat() -> Self {
        Frame::Comment("heartbeat".to_string())
    }

    /// シャットダウン通知フレーム
    pub fn server_restart(message: &str) -> Self {
        Frame::Event {
            name: "server-restart".to_string(),
            data: serde_json::json!({ "message": message }).to_string(),
        }
    }

    /// ハートビートかどうか
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Frame::Comment(text) if text == "heartbeat")
    }
}
