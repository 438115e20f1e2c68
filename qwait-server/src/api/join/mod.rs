//! Customer Join API 模块 (公开，不要求餐厅作用域头)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/join", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{restaurant_id}", post(handler::join))
        .route(
            "/{restaurant_id}/check-phone/{phone}",
            get(handler::check_phone),
        )
}
