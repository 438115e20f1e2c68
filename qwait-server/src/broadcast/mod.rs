//! 通知广播器
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                WaitlistBroadcaster                   │
//! │  DashMap<restaurant_id, broadcast::Sender<Event>>   │
//! └──────────────┬──────────────────┬───────────────────┘
//!                │ channel 7        │ channel 9
//!                ▼                  ▼
//!        staff sockets (7)   staff sockets (9)
//! ```
//!
//! 每家餐厅一条独立通道：通道内事件按发布顺序投递，跨餐厅没有
//! 顺序保证。发布是 fire-and-forget —— 没有订阅者或投递失败都不会
//! 影响触发它的存储操作。无回放：晚加入的订阅者必须全量重载。

use dashmap::DashMap;
use shared::message::WaitlistEvent;
use tokio::sync::broadcast;

/// Default capacity for each restaurant channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Per-restaurant fan-out of waitlist change events
#[derive(Debug)]
pub struct WaitlistBroadcaster {
    channels: DashMap<i64, broadcast::Sender<WaitlistEvent>>,
    capacity: usize,
}

impl WaitlistBroadcaster {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// 发布事件到一家餐厅的通道 (fire-and-forget)
    ///
    /// 返回当前收到事件的订阅者数量，仅用于日志。
    pub fn publish(&self, restaurant_id: i64, event: WaitlistEvent) -> usize {
        let sender = self.sender(restaurant_id);
        match sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                // No connected subscribers — the store write already
                // committed, so this is not an error.
                tracing::trace!(restaurant_id, "Broadcast skipped, no subscribers");
                0
            }
        }
    }

    /// 订阅一家餐厅的事件流
    ///
    /// Drop the receiver to unsubscribe. Only events published after this
    /// call are delivered (no replay) — connect first, then full reload.
    pub fn subscribe(&self, restaurant_id: i64) -> broadcast::Receiver<WaitlistEvent> {
        self.sender(restaurant_id).subscribe()
    }

    /// Current subscriber count for a restaurant's channel
    pub fn subscriber_count(&self, restaurant_id: i64) -> usize {
        self.channels
            .get(&restaurant_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Number of restaurants with a channel allocated
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn sender(&self, restaurant_id: i64) -> broadcast::Sender<WaitlistEvent> {
        self.channels
            .entry(restaurant_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for WaitlistBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = WaitlistBroadcaster::default();
        // Must not panic or error
        assert_eq!(bus.publish(1, WaitlistEvent::entry_removed(5)), 0);
    }

    #[tokio::test]
    async fn test_events_delivered_in_publish_order() {
        let bus = WaitlistBroadcaster::default();
        let mut rx = bus.subscribe(1);

        bus.publish(1, WaitlistEvent::entry_removed(10));
        bus.publish(1, WaitlistEvent::entry_removed(11));
        bus.publish(1, WaitlistEvent::entry_removed(12));

        for expected in [10, 11, 12] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.entry_id(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_channels_are_isolated_per_restaurant() {
        let bus = WaitlistBroadcaster::default();
        let mut rx_a = bus.subscribe(1);
        let mut rx_b = bus.subscribe(2);

        bus.publish(1, WaitlistEvent::entry_removed(100));

        assert_eq!(rx_a.recv().await.unwrap().entry_id(), Some(100));
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscribers() {
        let bus = WaitlistBroadcaster::default();
        bus.publish(1, WaitlistEvent::entry_removed(1));

        let mut rx = bus.subscribe(1);
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_dropping_receiver_unsubscribes() {
        let bus = WaitlistBroadcaster::default();
        let rx = bus.subscribe(1);
        assert_eq!(bus.subscriber_count(1), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(1), 0);
    }
}
