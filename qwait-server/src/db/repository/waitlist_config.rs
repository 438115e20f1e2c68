//! Waitlist Config Repository
//!
//! `visible_columns` is stored as a JSON array of column identifiers.

use shared::models::{WaitlistColumn, WaitlistConfig};
use sqlx::SqlitePool;

use super::RepoResult;

/// Read a restaurant's column config, falling back to the default set
pub async fn get_columns(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<WaitlistConfig> {
    let row: Option<String> =
        sqlx::query_scalar("SELECT visible_columns FROM waitlist_config WHERE restaurant_id = ?")
            .bind(restaurant_id)
            .fetch_optional(pool)
            .await?;

    let Some(json) = row else {
        return Ok(WaitlistConfig::default_for(restaurant_id));
    };

    match serde_json::from_str::<Vec<WaitlistColumn>>(&json) {
        Ok(visible_columns) => Ok(WaitlistConfig {
            restaurant_id,
            visible_columns,
        }),
        Err(e) => {
            // 损坏的配置回落到默认列集，不让看板加载失败
            tracing::warn!(restaurant_id, error = %e, "Corrupt column config, using defaults");
            Ok(WaitlistConfig::default_for(restaurant_id))
        }
    }
}

/// Replace a restaurant's column config (upsert)
pub async fn set_columns(
    pool: &SqlitePool,
    restaurant_id: i64,
    columns: &[WaitlistColumn],
) -> RepoResult<WaitlistConfig> {
    let json = serde_json::to_string(columns)
        .map_err(|e| super::RepoError::Validation(format!("Invalid column set: {e}")))?;
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO waitlist_config (restaurant_id, visible_columns, updated_at) \
         VALUES (?, ?, ?) \
         ON CONFLICT(restaurant_id) DO UPDATE SET \
         visible_columns = excluded.visible_columns, updated_at = excluded.updated_at",
    )
    .bind(restaurant_id)
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(WaitlistConfig {
        restaurant_id,
        visible_columns: columns.to_vec(),
    })
}
