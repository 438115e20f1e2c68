//! Restaurant Waitlist Config (看板列配置)

use serde::{Deserialize, Serialize};

/// Display column identifiers — a fixed, enumerable set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistColumn {
    ArrivalTime,
    Notes,
    Status,
}

impl WaitlistColumn {
    /// Full column set, in default display order
    pub fn all() -> Vec<WaitlistColumn> {
        vec![Self::ArrivalTime, Self::Notes, Self::Status]
    }
}

/// Per-restaurant waitlist display configuration
///
/// Mutated only by the staff settings action; read by every client on
/// load and on COLUMNS_UPDATED broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistConfig {
    pub restaurant_id: i64,
    pub visible_columns: Vec<WaitlistColumn>,
}

impl WaitlistConfig {
    /// 默认配置 — 显示全部列
    pub fn default_for(restaurant_id: i64) -> Self {
        Self {
            restaurant_id,
            visible_columns: WaitlistColumn::all(),
        }
    }
}

/// Update columns payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsUpdate {
    pub columns: Vec<WaitlistColumn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_serialization() {
        assert_eq!(
            serde_json::to_string(&WaitlistColumn::ArrivalTime).unwrap(),
            "\"arrival_time\""
        );
        let c: WaitlistColumn = serde_json::from_str("\"notes\"").unwrap();
        assert_eq!(c, WaitlistColumn::Notes);
    }

    #[test]
    fn test_default_config_shows_all_columns() {
        let cfg = WaitlistConfig::default_for(7);
        assert_eq!(cfg.restaurant_id, 7);
        assert_eq!(cfg.visible_columns.len(), 3);
    }
}
