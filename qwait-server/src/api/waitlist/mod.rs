//! Staff Waitlist API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/waitlist", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_active).post(handler::create))
        .route("/all", get(handler::list_all))
        .route("/columns", get(handler::get_columns).put(handler::set_columns))
        .route("/join-info", get(handler::join_info))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", post(handler::change_status))
}
