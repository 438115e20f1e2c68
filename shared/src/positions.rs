//! Position Assigner (排队位置计算)
//!
//! 纯函数，无 I/O。活跃集合每次变化都全量重算，绝不增量打补丁 ——
//! 增量更新是位置漂移 bug 的温床。
//!
//! 服务端在每次读取/广播前调用；客户端在每个广播事件后对本地
//! 缓存重跑同一个函数，双方因此永远收敛到同一个排序。

use std::cmp::Ordering;

use crate::models::WaitlistEntry;

/// Assign 1-based positions over the active entries
///
/// - Active (WAITING/NOTIFIED) entries are ranked by `arrival_ts`
///   ascending; a missing timestamp sorts last, stably.
/// - Equal timestamps keep their relative input order (stable sort), so
///   the result is deterministic regardless of store iteration order.
/// - Everything else gets `position = None`.
pub fn assign_positions(mut entries: Vec<WaitlistEntry>) -> Vec<WaitlistEntry> {
    let mut active: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.status.is_active())
        .map(|(i, _)| i)
        .collect();
    active.sort_by(|&a, &b| cmp_arrival(entries[a].arrival_ts, entries[b].arrival_ts));

    for entry in entries.iter_mut() {
        entry.position = None;
    }
    for (rank, &idx) in active.iter().enumerate() {
        entries[idx].position = Some(rank as i64 + 1);
    }
    entries
}

/// Active entries only, sorted by position — the dashboard view
pub fn active_in_order(entries: Vec<WaitlistEntry>) -> Vec<WaitlistEntry> {
    let mut active: Vec<WaitlistEntry> = assign_positions(entries)
        .into_iter()
        .filter(|e| e.position.is_some())
        .collect();
    active.sort_by_key(|e| e.position);
    active
}

fn cmp_arrival(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;

    fn entry(id: i64, status: EntryStatus, arrival_ts: Option<i64>) -> WaitlistEntry {
        WaitlistEntry {
            id,
            restaurant_id: 1,
            customer_name: format!("guest-{id}"),
            phone_number: format!("555000{id:04}"),
            people_count: 2,
            notes: None,
            quoted_time: None,
            arrival_ts,
            status,
            notified_at: None,
            notification_attempts: 0,
            completed_at: None,
            created_at: 0,
            updated_at: 0,
            position: None,
        }
    }

    fn positions(entries: &[WaitlistEntry]) -> Vec<(i64, Option<i64>)> {
        entries.iter().map(|e| (e.id, e.position)).collect()
    }

    #[test]
    fn test_positions_are_one_to_n_by_arrival() {
        // A 10:00, B 10:05, C 10:10 — input deliberately out of order
        let out = assign_positions(vec![
            entry(2, EntryStatus::Waiting, Some(605_000)),
            entry(3, EntryStatus::Waiting, Some(610_000)),
            entry(1, EntryStatus::Waiting, Some(600_000)),
        ]);
        let by_id = |id| out.iter().find(|e| e.id == id).unwrap().position;
        assert_eq!(by_id(1), Some(1));
        assert_eq!(by_id(2), Some(2));
        assert_eq!(by_id(3), Some(3));
    }

    #[test]
    fn test_terminal_entries_get_no_position() {
        // Mark B served: A=1, C=2, B=None
        let out = assign_positions(vec![
            entry(1, EntryStatus::Waiting, Some(600_000)),
            entry(2, EntryStatus::Served, Some(605_000)),
            entry(3, EntryStatus::Waiting, Some(610_000)),
        ]);
        assert_eq!(
            positions(&out),
            vec![(1, Some(1)), (2, None), (3, Some(2))]
        );
    }

    #[test]
    fn test_notified_entries_keep_their_position() {
        let out = assign_positions(vec![
            entry(1, EntryStatus::Notified, Some(600_000)),
            entry(2, EntryStatus::Waiting, Some(605_000)),
        ]);
        assert_eq!(positions(&out), vec![(1, Some(1)), (2, Some(2))]);
    }

    #[test]
    fn test_equal_timestamps_preserve_input_order() {
        let out = assign_positions(vec![
            entry(10, EntryStatus::Waiting, Some(600_000)),
            entry(11, EntryStatus::Waiting, Some(600_000)),
            entry(12, EntryStatus::Waiting, Some(600_000)),
        ]);
        assert_eq!(
            positions(&out),
            vec![(10, Some(1)), (11, Some(2)), (12, Some(3))]
        );
    }

    #[test]
    fn test_missing_arrival_sorts_last_stably() {
        let out = assign_positions(vec![
            entry(1, EntryStatus::Waiting, None),
            entry(2, EntryStatus::Waiting, Some(600_000)),
            entry(3, EntryStatus::Waiting, None),
        ]);
        assert_eq!(
            positions(&out),
            vec![(1, Some(2)), (2, Some(1)), (3, Some(3))]
        );
    }

    #[test]
    fn test_no_gaps_no_duplicates() {
        let statuses = [
            EntryStatus::Waiting,
            EntryStatus::Served,
            EntryStatus::Notified,
            EntryStatus::Cancelled,
            EntryStatus::Waiting,
            EntryStatus::NoShow,
            EntryStatus::Notified,
        ];
        let input: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| entry(i as i64, *s, Some(1_000 * i as i64)))
            .collect();
        let active_count = input.iter().filter(|e| e.status.is_active()).count();

        let out = assign_positions(input);
        let mut assigned: Vec<i64> = out.iter().filter_map(|e| e.position).collect();
        assigned.sort_unstable();
        assert_eq!(assigned, (1..=active_count as i64).collect::<Vec<_>>());
    }

    #[test]
    fn test_active_in_order_filters_and_sorts() {
        let out = active_in_order(vec![
            entry(2, EntryStatus::Waiting, Some(605_000)),
            entry(9, EntryStatus::Served, Some(100)),
            entry(1, EntryStatus::Waiting, Some(600_000)),
        ]);
        let ids: Vec<i64> = out.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(out[0].position, Some(1));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let input = vec![
            entry(1, EntryStatus::Waiting, Some(600_000)),
            entry(2, EntryStatus::Notified, Some(605_000)),
        ];
        let once = assign_positions(input);
        let twice = assign_positions(once.clone());
        assert_eq!(once, twice);
    }
}
