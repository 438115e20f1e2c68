//! 看板 WebSocket 事件流
//!
//! 每个连接订阅一家餐厅的广播通道，把事件序列化成文本帧推给
//! 看板。协议刻意保持单向：客户端只发 ping/pong 之类的控制帧，
//! 变更全部走 HTTP 接口。
//!
//! 没有回放。客户端的正确姿势是先连接、再全量拉取 `/api/waitlist`，
//! 掉线重连后同样重载。慢消费者落后到通道容量之外 (Lagged) 时直接
//! 断开，迫使它走重连重载路径，而不是喂给它一个有空洞的事件流。

use axum::{
    Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws/waitlist/{restaurant_id}", get(upgrade))
}

async fn upgrade(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, restaurant_id, socket))
}

async fn handle_socket(state: ServerState, restaurant_id: i64, mut socket: WebSocket) {
    let mut rx = state.broadcaster.subscribe(restaurant_id);
    tracing::info!(
        restaurant_id,
        subscribers = state.broadcaster.subscriber_count(restaurant_id),
        "Dashboard connected"
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(missed)) => {
                        // 落后的消费者必须重载，断开比漏发安全
                        tracing::warn!(restaurant_id, missed, "Dashboard lagged, closing");
                        break;
                    }
                    Err(RecvError::Closed) => break,
                };
                let text = match event.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(restaurant_id, error = %e, "Failed to serialize event");
                        continue;
                    }
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong and stray frames are ignored
                    Some(Err(_)) => break,
                }
            }
        }
    }

    tracing::info!(restaurant_id, "Dashboard disconnected");
}
