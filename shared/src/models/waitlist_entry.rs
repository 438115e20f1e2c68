//! Waitlist Entry Model (排队条目)

use serde::{Deserialize, Serialize};

/// Entry status
///
/// 状态机：WAITING → NOTIFIED → SERVED/CANCELLED/NO_SHOW，
/// WAITING 也可以直接进入三个终态。终态不可再转移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EntryStatus {
    Waiting,
    Notified,
    Served,
    Cancelled,
    NoShow,
}

impl Default for EntryStatus {
    fn default() -> Self {
        Self::Waiting
    }
}

impl EntryStatus {
    /// Active = still in the queue (gets a position)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Notified)
    }

    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// SQL / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Notified => "NOTIFIED",
            Self::Served => "SERVED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

/// Waitlist entry — one party in a restaurant's queue
///
/// `position` 和等待时间都是派生值，永不落库：
/// - `position` 由 [`crate::positions::assign_positions`] 全量重算
/// - 等待时间由 [`WaitlistEntry::wait_time_minutes`] 按需计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WaitlistEntry {
    pub id: i64,
    /// Owning restaurant — every query and broadcast is scoped by this
    pub restaurant_id: i64,
    pub customer_name: String,
    /// Stored normalized (digits only)
    pub phone_number: String,
    pub people_count: i64,
    pub notes: Option<String>,
    /// Staff-quoted estimate in minutes, independent of the computed wait
    pub quoted_time: Option<i64>,
    /// Arrival timestamp (Unix millis) — immutable, sole ordering key.
    /// Option so a corrupt row still deserializes; missing sorts last.
    pub arrival_ts: Option<i64>,
    pub status: EntryStatus,
    /// When the party was last notified (Unix millis)
    pub notified_at: Option<i64>,
    #[serde(default)]
    pub notification_attempts: i64,
    /// Stamped on first transition into a terminal status
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Derived 1-based rank among active entries — never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub position: Option<i64>,
}

impl WaitlistEntry {
    /// 等待时长（分钟，下限 0）
    ///
    /// 终态条目按 `completed_at - arrival_ts` 固定，
    /// 活跃条目按 `now - arrival_ts` 实时计算。
    pub fn wait_time_minutes(&self, now_ms: i64) -> i64 {
        let Some(arrival) = self.arrival_ts else {
            return 0;
        };
        let end = if self.status.is_terminal() {
            self.completed_at.unwrap_or(now_ms)
        } else {
            now_ms
        };
        ((end - arrival) / 60_000).max(0)
    }
}

/// Create entry payload (staff add-party or customer QR join)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCreate {
    pub customer_name: String,
    pub phone_number: String,
    pub people_count: i64,
    pub notes: Option<String>,
    pub quoted_time: Option<i64>,
}

/// Update entry payload (staff edit; status changes go through
/// the status endpoint instead)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub people_count: Option<i64>,
    pub notes: Option<String>,
    pub quoted_time: Option<i64>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: EntryStatus,
}

/// Active list response (count + entries with positions assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveList {
    pub count: usize,
    pub entries: Vec<WaitlistEntry>,
}
