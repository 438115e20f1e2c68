//! 端到端排队流程测试 (in-memory 数据库，不起 HTTP 服务)

use qwait_server::db::DbService;
use qwait_server::waitlist::manager;
use qwait_server::{AppError, Config, ServerState};
use shared::message::WaitlistEvent;
use shared::models::{EntryCreate, EntryStatus};
use std::time::Duration;

async fn test_state() -> ServerState {
    let db = DbService::memory().await.unwrap();
    ServerState::with_pool(Config::from_env(), db.pool)
}

fn party(name: &str, phone: &str, people: i64) -> EntryCreate {
    EntryCreate {
        customer_name: name.into(),
        phone_number: phone.into(),
        people_count: people,
        notes: None,
        quoted_time: Some(15),
    }
}

#[tokio::test]
async fn test_full_party_lifecycle() {
    let state = test_state().await;
    let mut rx = state.broadcaster.subscribe(1);

    // 顾客扫码加入
    let entry = manager::create_entry(&state, 1, party("Grace", "555-867-5309", 4))
        .await
        .unwrap();
    assert_eq!(entry.status, EntryStatus::Waiting);
    assert_eq!(entry.quoted_time, Some(15));

    // 员工叫号
    let entry = manager::change_status(&state, 1, entry.id, EntryStatus::Notified)
        .await
        .unwrap();
    assert_eq!(entry.notification_attempts, 1);

    // 入座
    let entry = manager::change_status(&state, 1, entry.id, EntryStatus::Served)
        .await
        .unwrap();
    assert!(entry.completed_at.is_some());

    // 活跃队列已空，历史仍可见
    assert_eq!(manager::list_active(&state, 1).await.unwrap().count, 0);
    let all = manager::list_all(&state, 1).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, EntryStatus::Served);
    assert_eq!(all[0].position, None);

    // 订阅者按发布顺序收到完整事件序列
    let kinds: Vec<&str> = (0..3).map(|_| rx.try_recv().unwrap().kind()).collect();
    assert_eq!(kinds, vec!["NEW_ENTRY", "ENTRY_UPDATED", "ENTRY_UPDATED"]);
}

#[tokio::test]
async fn test_queue_positions_follow_departures() {
    let state = test_state().await;

    let mut ids = Vec::new();
    for (name, phone) in [("A", "2220001"), ("B", "2220002"), ("C", "2220003")] {
        let entry = manager::create_entry(&state, 1, party(name, phone, 2))
            .await
            .unwrap();
        ids.push(entry.id);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    manager::change_status(&state, 1, ids[0], EntryStatus::NoShow)
        .await
        .unwrap();

    let list = manager::list_active(&state, 1).await.unwrap();
    assert_eq!(list.count, 2);
    assert_eq!(list.entries[0].id, ids[1]);
    assert_eq!(list.entries[0].position, Some(1));
    assert_eq!(list.entries[1].id, ids[2]);
    assert_eq!(list.entries[1].position, Some(2));
}

#[tokio::test]
async fn test_concurrent_joins_with_same_phone() {
    let state = test_state().await;

    // 同号码并发加入：恰好一个成功
    let (r1, r2) = tokio::join!(
        manager::create_entry(&state, 1, party("First", "5550001111", 2)),
        manager::create_entry(&state, 1, party("Second", "555-000-1111", 3)),
    );

    let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|&&ok| ok).count();
    assert_eq!(successes, 1);
    let failure = if r1.is_err() { r1 } else { r2 };
    assert!(matches!(
        failure.unwrap_err(),
        AppError::DuplicateActiveEntry(_)
    ));

    assert_eq!(manager::list_active(&state, 1).await.unwrap().count, 1);
}

#[tokio::test]
async fn test_restaurants_are_isolated() {
    let state = test_state().await;
    let mut rx_other = state.broadcaster.subscribe(2);

    manager::create_entry(&state, 1, party("Grace", "5551230000", 2))
        .await
        .unwrap();

    // 另一家餐厅既看不到条目也收不到事件
    assert_eq!(manager::list_active(&state, 2).await.unwrap().count, 0);
    assert!(rx_other.try_recv().is_err());
}

#[tokio::test]
async fn test_lost_status_race_keeps_state_valid() {
    let state = test_state().await;
    let entry = manager::create_entry(&state, 1, party("Grace", "5551230000", 2))
        .await
        .unwrap();

    // 两个员工同时点「入座」和「未到」
    let (r1, r2) = tokio::join!(
        manager::change_status(&state, 1, entry.id, EntryStatus::Served),
        manager::change_status(&state, 1, entry.id, EntryStatus::NoShow),
    );

    // 恰好一个赢，输家拿到 InvalidTransition
    assert_eq!([r1.is_ok(), r2.is_ok()].iter().filter(|&&ok| ok).count(), 1);
    let loser = if r1.is_err() { r1 } else { r2 };
    assert!(matches!(
        loser.unwrap_err(),
        AppError::InvalidTransition(_)
    ));

    // 落库状态是合法终态之一
    let stored = manager::get_entry(&state, 1, entry.id).await.unwrap();
    assert!(stored.status.is_terminal());
    assert!(stored.completed_at.is_some());
}
