//! Customer Join Handlers
//!
//! 扫码页面走这两个接口：check-phone 给输入框即时反馈，
//! join 才是权威入口 —— 重复号码在这里被最终拒绝。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{EntryCreate, WaitlistEntry};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::waitlist::manager;

/// POST /api/join/:restaurant_id - 顾客自助加入排队
pub async fn join(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<EntryCreate>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = manager::create_entry(&state, restaurant_id, payload).await?;
    Ok(Json(entry))
}

#[derive(Debug, Serialize)]
pub struct CheckPhoneResponse {
    pub active: bool,
}

/// GET /api/join/:restaurant_id/check-phone/:phone - 重复预检 (advisory)
pub async fn check_phone(
    State(state): State<ServerState>,
    Path((restaurant_id, phone)): Path<(i64, String)>,
) -> AppResult<Json<CheckPhoneResponse>> {
    let active = manager::check_phone(&state, restaurant_id, &phone).await?;
    Ok(Json(CheckPhoneResponse { active }))
}
