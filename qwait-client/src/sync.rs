//! 本地队列镜像与 WebSocket 同步
//!
//! [`WaitlistSync`] 是纯状态容器：按事件幂等合并，展示前全量重算
//! 位置，和服务端跑同一个 [`shared::positions`] 函数，双方收敛到
//! 同一个排序。
//!
//! [`DashboardConnection`] 是生命周期外壳：连接 WebSocket、触发
//! 全量重载、转发事件、定时刷新等待时长，掉线后自动重连。

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::StreamExt;
use shared::message::WaitlistEvent;
use shared::models::{WaitlistColumn, WaitlistEntry};
use shared::positions::active_in_order;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::{ClientConfig, ClientError, ClientResult, HttpClient};

/// 看板本地状态 — 服务端队列的镜像
#[derive(Debug, Default)]
pub struct WaitlistSync {
    /// 已知条目，按 id 索引 (含事件带来的终态条目)
    entries: HashMap<i64, WaitlistEntry>,
    /// 看板列配置
    columns: Vec<WaitlistColumn>,
    /// 展示用等待时长 (分钟)，定时整体刷新
    wait_times: HashMap<i64, i64>,
}

impl WaitlistSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全量重载 — 连接/重连后的第一步
    ///
    /// 事件流没有回放，重载前收到的内容一律作废。
    pub fn replace_all(&mut self, entries: Vec<WaitlistEntry>) {
        self.entries = entries.into_iter().map(|e| (e.id, e)).collect();
        self.wait_times.clear();
    }

    /// 应用一条广播事件 (幂等)
    ///
    /// ENTRY_UPDATED 对未知 id 按插入处理 —— 事件携带完整条目，
    /// 丢失过 NEW_ENTRY 也能收敛。
    pub fn apply_event(&mut self, event: WaitlistEvent) {
        match event {
            WaitlistEvent::NewEntry(entry) | WaitlistEvent::EntryUpdated(entry) => {
                self.entries.insert(entry.id, entry);
            }
            WaitlistEvent::EntryRemoved(removed) => {
                self.entries.remove(&removed.id);
                self.wait_times.remove(&removed.id);
            }
            WaitlistEvent::ColumnsUpdated(update) => {
                self.columns = update.columns;
            }
        }
    }

    /// 活跃队列，按位置排序 — 看板的展示视图
    ///
    /// 每次调用全量重算位置；结果与服务端 `/api/waitlist` 一致。
    pub fn active(&self) -> Vec<WaitlistEntry> {
        let mut entries: Vec<WaitlistEntry> = self.entries.values().cloned().collect();
        // HashMap 迭代顺序不稳定，先按 (arrival_ts, id) 排定
        entries.sort_by_key(|e| (e.arrival_ts.is_none(), e.arrival_ts, e.id));
        active_in_order(entries)
    }

    /// 刷新全部展示用等待时长
    pub fn refresh_wait_times(&mut self, now_ms: i64) {
        self.wait_times = self
            .entries
            .values()
            .map(|e| (e.id, e.wait_time_minutes(now_ms)))
            .collect();
    }

    /// 某条目的展示等待时长 (分钟)
    pub fn wait_time(&self, id: i64) -> Option<i64> {
        self.wait_times.get(&id).copied()
    }

    pub fn columns(&self) -> &[WaitlistColumn] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Vec<WaitlistColumn>) {
        self.columns = columns;
    }

    pub fn get(&self, id: i64) -> Option<&WaitlistEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 看板连接 — 持有同步状态和后台任务的生命周期
pub struct DashboardConnection {
    config: ClientConfig,
    http: HttpClient,
    sync: Arc<RwLock<WaitlistSync>>,
    cancel: CancellationToken,
}

impl DashboardConnection {
    pub fn new(config: ClientConfig) -> Self {
        let http = config.build_http_client();
        Self {
            config,
            http,
            sync: Arc::new(RwLock::new(WaitlistSync::new())),
            cancel: CancellationToken::new(),
        }
    }

    /// 共享的本地镜像
    pub fn sync(&self) -> Arc<RwLock<WaitlistSync>> {
        self.sync.clone()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// 启动后台同步任务 (非阻塞)
    ///
    /// 任务循环：连接 WS → 全量重载 → 转发事件；断开后等待
    /// 重连间隔再来一轮。`disconnect` 取消整个循环。
    pub fn connect(&self) -> tokio::task::JoinHandle<()> {
        let config = self.config.clone();
        let http = self.http.clone();
        let sync = self.sync.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let reconnect = Duration::from_secs(config.reconnect_interval_secs);
            loop {
                if cancel.is_cancelled() {
                    break;
                }

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = run_session(&config, &http, &sync, &cancel) => match result {
                        Ok(()) => break, // cancelled
                        Err(e) => {
                            tracing::warn!(error = %e, "Dashboard sync session ended, reconnecting");
                        }
                    }
                }

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(reconnect) => {}
                }
            }
            tracing::info!("Dashboard sync stopped");
        })
    }

    /// 停止后台同步
    pub fn disconnect(&self) {
        self.cancel.cancel();
    }
}

impl Drop for DashboardConnection {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// 一次 WS 会话：连接、重载、事件循环
async fn run_session(
    config: &ClientConfig,
    http: &HttpClient,
    sync: &Arc<RwLock<WaitlistSync>>,
    cancel: &CancellationToken,
) -> ClientResult<()> {
    // 先连接再重载：重载之后到达的事件都会被投递，不会漏在中间
    let (ws_stream, _) = connect_async(config.ws_url()).await?;
    let (_, mut read) = ws_stream.split();
    tracing::info!(restaurant_id = config.restaurant_id, "Dashboard connected");

    let list = http.list_active().await?;
    let columns = http.get_columns().await?;
    {
        let mut state = sync.write().await;
        state.replace_all(list.entries);
        state.set_columns(columns.visible_columns);
        state.refresh_wait_times(shared::util::now_millis());
    }

    let mut refresh = interval(Duration::from_secs(config.refresh_interval_secs));
    refresh.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = refresh.tick() => {
                sync.write().await.refresh_wait_times(shared::util::now_millis());
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match WaitlistEvent::from_json(&text) {
                            Ok(event) => sync.write().await.apply_event(event),
                            Err(e) => {
                                tracing::warn!(error = %e, "Ignoring malformed event frame");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(ClientError::InvalidResponse(
                            "Server closed the event stream".to_string(),
                        ));
                    }
                    Some(Ok(_)) => {} // ping/pong frames
                    Some(Err(e)) => return Err(e.into()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::EntryStatus;

    fn entry(id: i64, status: EntryStatus, arrival_ts: i64) -> WaitlistEntry {
        WaitlistEntry {
            id,
            restaurant_id: 1,
            customer_name: format!("guest-{id}"),
            phone_number: format!("555000{id:04}"),
            people_count: 2,
            notes: None,
            quoted_time: None,
            arrival_ts: Some(arrival_ts),
            status,
            notified_at: None,
            notification_attempts: 0,
            completed_at: None,
            created_at: arrival_ts,
            updated_at: arrival_ts,
            position: None,
        }
    }

    #[test]
    fn test_apply_event_is_idempotent() {
        let mut sync = WaitlistSync::new();
        let event = WaitlistEvent::NewEntry(entry(1, EntryStatus::Waiting, 1_000));

        sync.apply_event(event.clone());
        sync.apply_event(event);
        assert_eq!(sync.len(), 1);
        assert_eq!(sync.active()[0].position, Some(1));
    }

    #[test]
    fn test_update_for_unknown_id_inserts() {
        let mut sync = WaitlistSync::new();
        // NEW_ENTRY 丢失，只收到后续的 ENTRY_UPDATED
        sync.apply_event(WaitlistEvent::EntryUpdated(entry(
            7,
            EntryStatus::Notified,
            1_000,
        )));
        assert_eq!(sync.get(7).map(|e| e.status), Some(EntryStatus::Notified));
    }

    #[test]
    fn test_removal_shifts_positions() {
        let mut sync = WaitlistSync::new();
        for (id, ts) in [(1, 1_000), (2, 2_000), (3, 3_000)] {
            sync.apply_event(WaitlistEvent::NewEntry(entry(id, EntryStatus::Waiting, ts)));
        }

        sync.apply_event(WaitlistEvent::entry_removed(2));
        sync.apply_event(WaitlistEvent::entry_removed(2)); // duplicate delivery

        let active = sync.active();
        assert_eq!(
            active.iter().map(|e| (e.id, e.position)).collect::<Vec<_>>(),
            vec![(1, Some(1)), (3, Some(2))]
        );
    }

    #[test]
    fn test_terminal_update_leaves_active_view() {
        let mut sync = WaitlistSync::new();
        sync.apply_event(WaitlistEvent::NewEntry(entry(1, EntryStatus::Waiting, 1_000)));
        sync.apply_event(WaitlistEvent::NewEntry(entry(2, EntryStatus::Waiting, 2_000)));

        sync.apply_event(WaitlistEvent::EntryUpdated(entry(
            1,
            EntryStatus::Served,
            1_000,
        )));

        let active = sync.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 2);
        assert_eq!(active[0].position, Some(1));
        // 终态条目仍在镜像中，供历史视图使用
        assert_eq!(sync.len(), 2);
    }

    #[test]
    fn test_columns_replaced_wholesale() {
        let mut sync = WaitlistSync::new();
        sync.set_columns(WaitlistColumn::all());

        sync.apply_event(WaitlistEvent::columns_updated(vec![WaitlistColumn::Status]));
        assert_eq!(sync.columns(), &[WaitlistColumn::Status]);
    }

    #[test]
    fn test_refresh_wait_times_leaves_positions_alone() {
        let mut sync = WaitlistSync::new();
        sync.apply_event(WaitlistEvent::NewEntry(entry(1, EntryStatus::Waiting, 0)));

        sync.refresh_wait_times(30 * 60_000);
        assert_eq!(sync.wait_time(1), Some(30));
        assert_eq!(sync.active()[0].position, Some(1));

        // 再刷新只改时长
        sync.refresh_wait_times(45 * 60_000);
        assert_eq!(sync.wait_time(1), Some(45));
    }

    #[tokio::test]
    async fn test_disconnect_stops_background_sync() {
        // 无法连接的地址：任务停在重连循环里
        let config = ClientConfig::new("http://127.0.0.1:1", 1);
        let conn = DashboardConnection::new(config);
        let handle = conn.connect();

        conn.disconnect();

        // 取消后任务必须退出，不留悬挂的重连/刷新循环
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sync task should stop after disconnect")
            .expect("sync task should not panic");
    }

    #[test]
    fn test_replace_all_discards_stale_state() {
        let mut sync = WaitlistSync::new();
        sync.apply_event(WaitlistEvent::NewEntry(entry(1, EntryStatus::Waiting, 1_000)));
        sync.refresh_wait_times(60_000);

        sync.replace_all(vec![entry(9, EntryStatus::Waiting, 5_000)]);
        assert!(sync.get(1).is_none());
        assert_eq!(sync.wait_time(1), None);
        assert_eq!(sync.active()[0].id, 9);
    }
}
