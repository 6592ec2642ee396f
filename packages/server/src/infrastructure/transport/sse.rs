//! Server-Sent Events を使った EventTransport 実装
//!
//! ## 設計ノート
//!
//! SSE レスポンスの生成は UI 層（`ui/handler/sse.rs`）で行われます。
//! この実装は有界チャネルの送信側を保持し、受信側はレスポンスのストリームになります。
//!
//! - UI 層: レスポンスの生成、切断時の後始末
//! - Infrastructure 層: フレームの書き込み、SSE イベントへの変換
//!
//! 書き込みは `try_send` のみで、待機は発生しません。バッファが埋まっている
//! クライアントは書き込み失敗として扱われ、呼び出し側で回収されます。

use std::convert::Infallible;

use axum::response::sse::Event;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};

use crate::domain::{EventTransport, Frame, TransportError};

/// SSE レスポンスへ書き込むトランスポート
#[derive(Debug, Clone)]
pub struct SseTransport {
    sender: mpsc::Sender<Frame>,
}

impl SseTransport {
    /// 新しいトランスポートと、レスポンスのストリームになる受信側を作成
    ///
    /// # Arguments
    ///
    /// * `buffer` - クライアントに届いていないフレームを保持できる数
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

impl EventTransport for SseTransport {
    fn send(&self, frame: Frame) -> Result<(), TransportError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Backpressure,
            TrySendError::Closed(_) => TransportError::Closed,
        })
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn close(&self) {
        // バッファが埋まっている場合も、送信側が破棄された時点でストリームは終わる
        if let Err(e) = self.sender.try_send(Frame::Close) {
            tracing::debug!("Close frame not queued: {}", e);
        }
    }
}

/// Frame を SSE イベントに変換する（`Close` は `None`）
pub fn frame_to_event(frame: Frame) -> Option<Event> {
    match frame {
        Frame::Comment(text) => Some(Event::default().comment(text)),
        Frame::Data(data) => Some(Event::default().data(data.as_ref())),
        Frame::Event { name, data } => Some(Event::default().event(name).data(data)),
        Frame::Close => None,
    }
}

/// 受信側を SSE イベントのストリームに変換する
///
/// `Frame::Close` を受け取るか、送信側がすべて破棄されるとストリームは終了する。
pub fn frame_stream(
    receiver: mpsc::Receiver<Frame>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    ReceiverStream::new(receiver).map_while(|frame| frame_to_event(frame).map(Ok))
}
