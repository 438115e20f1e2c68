//! Duplicate Guard (重复条目守卫)
//!
//! 同一餐厅、同一规范化号码最多一条活跃条目。这里的检查有两种用途：
//! - advisory：check-phone 接口给前端的快速反馈，不具权威性
//! - authoritative：create 路径在餐厅级锁内调用，加上活跃号码的
//!   部分唯一索引，才是真正能拒绝创建的那一道

use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, waitlist_entry};

/// Is there an active entry for this phone number at this restaurant?
///
/// `phone` may be raw user input — it is normalized before the lookup.
pub async fn has_active_entry(
    pool: &SqlitePool,
    restaurant_id: i64,
    phone: &str,
) -> RepoResult<bool> {
    let normalized = shared::util::normalize_phone(phone);
    if normalized.is_empty() {
        return Ok(false);
    }
    waitlist_entry::has_active_phone(pool, restaurant_id, &normalized).await
}
