//! Waitlist Entry Repository
//!
//! The store is the single source of truth. `position` never appears here —
//! callers run the position assigner over a snapshot instead.

use shared::models::{EntryCreate, EntryStatus, EntryUpdate, WaitlistEntry};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::waitlist::status::valid_sources;

const COLUMNS: &str = "id, restaurant_id, customer_name, phone_number, people_count, notes, \
     quoted_time, arrival_ts, status, notified_at, notification_attempts, completed_at, \
     created_at, updated_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> RepoResult<Option<WaitlistEntry>> {
    let entry = sqlx::query_as::<_, WaitlistEntry>(&format!(
        "SELECT {COLUMNS} FROM waitlist_entry WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

/// Active entries (WAITING/NOTIFIED) in arrival order, missing arrivals last
pub async fn find_active(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<WaitlistEntry>> {
    let entries = sqlx::query_as::<_, WaitlistEntry>(&format!(
        "SELECT {COLUMNS} FROM waitlist_entry \
         WHERE restaurant_id = ? AND status IN ('WAITING', 'NOTIFIED') \
         ORDER BY arrival_ts IS NULL, arrival_ts, id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Full history including terminal entries (audit view)
pub async fn find_all(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<WaitlistEntry>> {
    let entries = sqlx::query_as::<_, WaitlistEntry>(&format!(
        "SELECT {COLUMNS} FROM waitlist_entry WHERE restaurant_id = ? \
         ORDER BY arrival_ts IS NULL, arrival_ts, id"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Duplicate guard check over the normalized phone number
pub async fn has_active_phone(
    pool: &SqlitePool,
    restaurant_id: i64,
    normalized_phone: &str,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM waitlist_entry \
         WHERE restaurant_id = ? AND phone_number = ? AND status IN ('WAITING', 'NOTIFIED')",
    )
    .bind(restaurant_id)
    .bind(normalized_phone)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Insert a new entry in WAITING state
///
/// 调用方负责字段验证和号码规范化；活跃号码的部分唯一索引兜底，
/// 冲突通过 `From<sqlx::Error>` 映射为 [`RepoError::Duplicate`]。
pub async fn insert(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: EntryCreate,
) -> RepoResult<WaitlistEntry> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO waitlist_entry \
         (id, restaurant_id, customer_name, phone_number, people_count, notes, quoted_time, \
          arrival_ts, status, notification_attempts, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'WAITING', 0, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(&data.customer_name)
    .bind(&data.phone_number)
    .bind(data.people_count)
    .bind(&data.notes)
    .bind(data.quoted_time)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create waitlist entry".into()))
}

/// Patch customer-facing fields (status changes go through [`set_status`])
pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: EntryUpdate,
) -> RepoResult<WaitlistEntry> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE waitlist_entry SET \
         customer_name = COALESCE(?, customer_name), \
         phone_number = COALESCE(?, phone_number), \
         people_count = COALESCE(?, people_count), \
         notes = COALESCE(?, notes), \
         quoted_time = COALESCE(?, quoted_time), \
         updated_at = ? \
         WHERE id = ? AND restaurant_id = ?",
    )
    .bind(&data.customer_name)
    .bind(&data.phone_number)
    .bind(data.people_count)
    .bind(&data.notes)
    .bind(data.quoted_time)
    .bind(now)
    .bind(id)
    .bind(restaurant_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Waitlist entry {id} not found")));
    }
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Waitlist entry {id} not found")))
}

/// Hard delete (explicit staff remove; terminal transitions keep the row)
pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM waitlist_entry WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Waitlist entry {id} not found")));
    }
    Ok(())
}

/// Apply a status transition, serialized per entry
///
/// Conditional update: the `status IN (valid sources)` guard makes a lost
/// race re-read and fail with [`RepoError::InvalidTransition`] instead of
/// corrupting state — the stored status is always a valid graph member.
///
/// 进入 NOTIFIED 记录 `notified_at` 并累加 `notification_attempts`；
/// 首次进入终态记录 `completed_at`。
pub async fn set_status(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    target: EntryStatus,
) -> RepoResult<WaitlistEntry> {
    let sources = valid_sources(target);
    if sources.is_empty() {
        return Err(RepoError::InvalidTransition(format!(
            "no transition leads to {}",
            target.as_str()
        )));
    }

    let now = shared::util::now_millis();
    let notified_now: Option<i64> = (target == EntryStatus::Notified).then_some(now);
    let attempt_bump: i64 = if target == EntryStatus::Notified { 1 } else { 0 };
    let completed_now: Option<i64> = target.is_terminal().then_some(now);

    let placeholders = sources.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "UPDATE waitlist_entry SET \
         status = ?, \
         notified_at = COALESCE(?, notified_at), \
         notification_attempts = notification_attempts + ?, \
         completed_at = COALESCE(completed_at, ?), \
         updated_at = ? \
         WHERE id = ? AND restaurant_id = ? AND status IN ({placeholders})"
    );

    let mut query = sqlx::query(&sql)
        .bind(target)
        .bind(notified_now)
        .bind(attempt_bump)
        .bind(completed_now)
        .bind(now)
        .bind(id)
        .bind(restaurant_id);
    for source in sources {
        query = query.bind(*source);
    }

    let rows = query.execute(pool).await?;
    if rows.rows_affected() == 0 {
        // Distinguish a stale id from a graph violation
        return match find_by_id(pool, restaurant_id, id).await? {
            None => Err(RepoError::NotFound(format!("Waitlist entry {id} not found"))),
            Some(entry) => Err(RepoError::InvalidTransition(format!(
                "cannot transition from {} to {}",
                entry.status.as_str(),
                target.as_str()
            ))),
        };
    }

    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Waitlist entry {id} not found")))
}
