//! Staff Waitlist API Handlers
//!
//! 所有接口要求上游认证层注入的餐厅作用域。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{
    ActiveList, ColumnsUpdate, EntryCreate, EntryUpdate, StatusChange, WaitlistConfig,
    WaitlistEntry,
};

use crate::auth::RestaurantScope;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::waitlist::manager;

/// GET /api/waitlist - 活跃队列 (带位置)
pub async fn list_active(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
) -> AppResult<Json<ActiveList>> {
    let list = manager::list_active(&state, restaurant_id).await?;
    Ok(Json(list))
}

/// GET /api/waitlist/all - 全部历史，含终态条目
pub async fn list_all(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
) -> AppResult<Json<Vec<WaitlistEntry>>> {
    let entries = manager::list_all(&state, restaurant_id).await?;
    Ok(Json(entries))
}

/// POST /api/waitlist - 员工手动加入一组顾客
pub async fn create(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Json(payload): Json<EntryCreate>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = manager::create_entry(&state, restaurant_id, payload).await?;
    Ok(Json(entry))
}

/// GET /api/waitlist/:id - 单个条目
pub async fn get_by_id(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Path(id): Path<i64>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = manager::get_entry(&state, restaurant_id, id).await?;
    Ok(Json(entry))
}

/// PUT /api/waitlist/:id - 编辑顾客信息 (状态走 /status)
pub async fn update(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Path(id): Path<i64>,
    Json(payload): Json<EntryUpdate>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = manager::update_entry(&state, restaurant_id, id, payload).await?;
    Ok(Json(entry))
}

/// DELETE /api/waitlist/:id - 移除条目 (硬删除)
pub async fn delete(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    manager::remove_entry(&state, restaurant_id, id).await?;
    Ok(Json(true))
}

/// POST /api/waitlist/:id/status - 状态转移
pub async fn change_status(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Path(id): Path<i64>,
    Json(payload): Json<StatusChange>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = manager::change_status(&state, restaurant_id, id, payload.status).await?;
    Ok(Json(entry))
}

/// GET /api/waitlist/columns - 看板列配置
pub async fn get_columns(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
) -> AppResult<Json<WaitlistConfig>> {
    let config = manager::get_columns(&state, restaurant_id).await?;
    Ok(Json(config))
}

/// PUT /api/waitlist/columns - 替换看板列配置
pub async fn set_columns(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
    Json(payload): Json<ColumnsUpdate>,
) -> AppResult<Json<WaitlistConfig>> {
    let config = manager::set_columns(&state, restaurant_id, payload.columns).await?;
    Ok(Json(config))
}

#[derive(Debug, Serialize)]
pub struct JoinInfo {
    pub restaurant_id: i64,
    /// 二维码指向的前端地址 (图片生成由前端完成)
    pub join_url: String,
}

/// GET /api/waitlist/join-info - 扫码加入链接
pub async fn join_info(
    State(state): State<ServerState>,
    RestaurantScope(restaurant_id): RestaurantScope,
) -> AppResult<Json<JoinInfo>> {
    Ok(Json(JoinInfo {
        restaurant_id,
        join_url: state.config.join_url(restaurant_id),
    }))
}
