//! クライアントへのフレーム送信の実装
//!
//! - `sse`: Server-Sent Events を使った実装

pub mod sse;

pub use sse::{SseTransport, frame_stream, frame_to_event};
