//! SSE subscription handler.

use std::{
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response, sse::Sse},
};
use tokio_stream::Stream;

use crate::{
    domain::{ConnectionId, RemoteLabel},
    infrastructure::transport::{SseTransport, frame_stream},
    ui::state::AppState,
    usecase::{SubscribeError, SubscribeUseCase},
};

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// `GET /api/events`
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    let peer = peer.ip().to_string();
    let remote_label = RemoteLabel::from_forwarded(forwarded_for, Some(peer.as_str()));

    // キャッシュが古ければ 1 回ポーリングして配信内容を最新にする。
    // 初期データは登録時に最後の配信内容から送られる
    if state
        .poll_devices_usecase
        .refresh_if_stale(state.snapshot_max_age)
        .await
        .is_none()
    {
        tracing::debug!("No snapshot available yet for new subscriber");
    }

    let (transport, receiver) = SseTransport::channel(state.send_buffer);
    match state
        .subscribe_usecase
        .execute(Arc::new(transport), remote_label)
        .await
    {
        Ok(id) => {
            let stream = GuardedStream {
                inner: Box::pin(frame_stream(receiver)),
                _guard: DisconnectGuard {
                    id,
                    usecase: state.subscribe_usecase.clone(),
                },
            };
            (
                [
                    (header::CACHE_CONTROL, "no-cache"),
                    (X_ACCEL_BUFFERING, "no"),
                ],
                Sse::new(stream),
            )
                .into_response()
        }
        Err(SubscribeError::AtCapacity { retry_after }) => {
            let secs = retry_after.as_secs();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, secs.to_string())],
                format!("Server at capacity - please retry in {} seconds", secs),
            )
                .into_response()
        }
        Err(SubscribeError::ShuttingDown { retry_after }) => {
            let secs = retry_after.as_secs();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, secs.to_string())],
                format!("Server restarting - please retry in {} seconds", secs),
            )
                .into_response()
        }
        Err(e @ SubscribeError::HandshakeFailed(_)) => {
            tracing::error!("SSE handshake failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// SSE レスポンスのストリーム
///
/// クライアントが切断してストリームが破棄されると、保持しているガードも破棄される。
struct GuardedStream<S> {
    inner: Pin<Box<S>>,
    _guard: DisconnectGuard,
}

impl<S: Stream> Stream for GuardedStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// SSE ストリームの破棄時に接続をレジストリから削除する
struct DisconnectGuard {
    id: ConnectionId,
    usecase: Arc<SubscribeUseCase>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let id = self.id;
        let usecase = self.usecase.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    usecase.disconnect(id).await;
                });
            }
            // ランタイム停止後はレジストリも破棄されている
            Err(_) => tracing::debug!("No runtime to clean up client {}", id),
        }
    }
}
