//! Waitlist Manager (排队编排)
//!
//! 所有变更操作走同一条路径：验证 → 规范化 → (锁) 守卫 → 存储 → 广播。
//! 广播严格发生在存储操作提交之后；读取路径在快照上全量重算位置。

use shared::message::WaitlistEvent;
use shared::models::{
    ActiveList, EntryCreate, EntryStatus, EntryUpdate, WaitlistColumn, WaitlistConfig,
    WaitlistEntry,
};
use shared::positions::{active_in_order, assign_positions};

use crate::core::ServerState;
use crate::db::repository::{waitlist_config, waitlist_entry};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_people_count, validate_phone,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use crate::waitlist::guard;

/// Create a new entry (staff add-party or customer QR join)
///
/// 餐厅级锁把守卫检查和插入变成一个原子段：同一餐厅同一号码的并发
/// join 只有一个能成功，另一个拿到 [`AppError::DuplicateActiveEntry`]。
pub async fn create_entry(
    state: &ServerState,
    restaurant_id: i64,
    mut data: EntryCreate,
) -> AppResult<WaitlistEntry> {
    validate_required_text(&data.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
    validate_people_count(data.people_count)?;
    data.phone_number = validate_phone(&data.phone_number)?;

    let lock = state.create_lock(restaurant_id);
    let _guard = lock.lock().await;

    if guard::has_active_entry(&state.db, restaurant_id, &data.phone_number).await? {
        return Err(AppError::duplicate(
            "An active entry already exists for this phone number",
        ));
    }

    let entry = waitlist_entry::insert(&state.db, restaurant_id, data).await?;
    drop(_guard);

    tracing::info!(
        restaurant_id,
        entry_id = entry.id,
        people = entry.people_count,
        "Waitlist entry created"
    );
    state.broadcast(restaurant_id, WaitlistEvent::NewEntry(entry.clone()));
    Ok(entry)
}

/// Fetch a single entry
pub async fn get_entry(
    state: &ServerState,
    restaurant_id: i64,
    id: i64,
) -> AppResult<WaitlistEntry> {
    waitlist_entry::find_by_id(&state.db, restaurant_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Waitlist entry {id} not found")))
}

/// Active entries with positions assigned, in queue order
pub async fn list_active(state: &ServerState, restaurant_id: i64) -> AppResult<ActiveList> {
    let entries = waitlist_entry::find_active(&state.db, restaurant_id).await?;
    let entries = active_in_order(entries);
    Ok(ActiveList {
        count: entries.len(),
        entries,
    })
}

/// Full history including terminal entries; positions only on active ones
pub async fn list_all(state: &ServerState, restaurant_id: i64) -> AppResult<Vec<WaitlistEntry>> {
    let entries = waitlist_entry::find_all(&state.db, restaurant_id).await?;
    Ok(assign_positions(entries))
}

/// Staff edit of customer-facing fields
pub async fn update_entry(
    state: &ServerState,
    restaurant_id: i64,
    id: i64,
    mut data: EntryUpdate,
) -> AppResult<WaitlistEntry> {
    if let Some(name) = &data.customer_name {
        validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
    if let Some(count) = data.people_count {
        validate_people_count(count)?;
    }
    if let Some(phone) = data.phone_number.take() {
        // 改号码也要走守卫：部分唯一索引拦下与其他活跃条目的冲突
        data.phone_number = Some(validate_phone(&phone)?);
    }

    let entry = waitlist_entry::update(&state.db, restaurant_id, id, data).await?;

    state.broadcast(restaurant_id, WaitlistEvent::EntryUpdated(entry.clone()));
    Ok(entry)
}

/// Explicit staff remove — hard delete, unlike terminal transitions
pub async fn remove_entry(state: &ServerState, restaurant_id: i64, id: i64) -> AppResult<()> {
    waitlist_entry::delete(&state.db, restaurant_id, id).await?;

    tracing::info!(restaurant_id, entry_id = id, "Waitlist entry removed");
    state.broadcast(restaurant_id, WaitlistEvent::entry_removed(id));
    Ok(())
}

/// Apply a status transition and broadcast the full updated entry
///
/// 完整条目而不是增量：移除一个活跃条目会挪动它后面每个人的位置，
/// 客户端靠重算一次就能对齐。
pub async fn change_status(
    state: &ServerState,
    restaurant_id: i64,
    id: i64,
    target: EntryStatus,
) -> AppResult<WaitlistEntry> {
    let entry = waitlist_entry::set_status(&state.db, restaurant_id, id, target).await?;

    tracing::info!(
        restaurant_id,
        entry_id = id,
        status = entry.status.as_str(),
        "Waitlist entry status changed"
    );
    state.broadcast(restaurant_id, WaitlistEvent::EntryUpdated(entry.clone()));
    Ok(entry)
}

/// Read the visible-column config
pub async fn get_columns(state: &ServerState, restaurant_id: i64) -> AppResult<WaitlistConfig> {
    Ok(waitlist_config::get_columns(&state.db, restaurant_id).await?)
}

/// Replace the visible-column config and notify every dashboard
pub async fn set_columns(
    state: &ServerState,
    restaurant_id: i64,
    columns: Vec<WaitlistColumn>,
) -> AppResult<WaitlistConfig> {
    let config = waitlist_config::set_columns(&state.db, restaurant_id, &columns).await?;

    state.broadcast(
        restaurant_id,
        WaitlistEvent::columns_updated(config.visible_columns.clone()),
    );
    Ok(config)
}

/// Advisory duplicate pre-check (fast UI feedback; create is authoritative)
pub async fn check_phone(state: &ServerState, restaurant_id: i64, phone: &str) -> AppResult<bool> {
    Ok(guard::has_active_entry(&state.db, restaurant_id, phone).await?)
}
