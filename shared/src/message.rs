//! 广播事件类型定义
//!
//! 这些类型在 qwait-server 和 dashboard clients 之间共享。
//! 每家餐厅一条有序事件流；事件总是携带完整条目负载（不是增量），
//! 客户端收到后按 id 幂等合并并全量重算位置。

use serde::{Deserialize, Serialize};

use crate::models::{WaitlistColumn, WaitlistEntry};

/// Payload for ENTRY_REMOVED — only the id survives a hard delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRemoved {
    pub id: i64,
}

/// Payload for COLUMNS_UPDATED — full replacement column set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsUpdated {
    pub columns: Vec<WaitlistColumn>,
}

/// Broadcast event for one restaurant's waitlist channel
///
/// Wire shape: `{ "type": "NEW_ENTRY", "payload": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitlistEvent {
    NewEntry(WaitlistEntry),
    EntryUpdated(WaitlistEntry),
    EntryRemoved(EntryRemoved),
    ColumnsUpdated(ColumnsUpdated),
}

impl WaitlistEvent {
    pub fn entry_removed(id: i64) -> Self {
        Self::EntryRemoved(EntryRemoved { id })
    }

    pub fn columns_updated(columns: Vec<WaitlistColumn>) -> Self {
        Self::ColumnsUpdated(ColumnsUpdated { columns })
    }

    /// 事件涉及的条目 id（列配置事件返回 None）
    pub fn entry_id(&self) -> Option<i64> {
        match self {
            Self::NewEntry(e) | Self::EntryUpdated(e) => Some(e.id),
            Self::EntryRemoved(r) => Some(r.id),
            Self::ColumnsUpdated(_) => None,
        }
    }

    /// Event type tag, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewEntry(_) => "NEW_ENTRY",
            Self::EntryUpdated(_) => "ENTRY_UPDATED",
            Self::EntryRemoved(_) => "ENTRY_REMOVED",
            Self::ColumnsUpdated(_) => "COLUMNS_UPDATED",
        }
    }

    /// 序列化为 JSON 文本（WebSocket 帧）
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
