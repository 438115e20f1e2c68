//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`waitlist`] - 员工排队管理接口 (需要餐厅作用域)
//! - [`join`] - 顾客扫码加入接口 (公开)
//! - [`events`] - 看板 WebSocket 事件流

pub mod events;
pub mod health;
pub mod join;
pub mod waitlist;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the full application router
pub fn create_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(waitlist::router())
        .merge(join::router())
        .merge(events::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
}
