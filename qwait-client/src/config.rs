//! Client configuration

/// Client configuration for connecting to the waitlist server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// 本客户端所属餐厅 — 注入每个请求的 `X-Restaurant-Id`
    pub restaurant_id: i64,

    /// Request timeout in seconds
    pub timeout: u64,

    /// 等待时长刷新间隔 (秒)
    pub refresh_interval_secs: u64,

    /// 掉线后的重连间隔 (秒)
    pub reconnect_interval_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, restaurant_id: i64) -> Self {
        Self {
            base_url: base_url.into(),
            restaurant_id,
            timeout: 30,
            refresh_interval_secs: 30,
            reconnect_interval_secs: 5,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the wait-time refresh interval
    pub fn with_refresh_interval(mut self, seconds: u64) -> Self {
        self.refresh_interval_secs = seconds;
        self
    }

    /// WebSocket URL for this restaurant's event stream
    pub fn ws_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{base}")
        };
        format!("{ws_base}/ws/waitlist/{}", self.restaurant_id)
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_schemes() {
        let cfg = ClientConfig::new("http://localhost:3000/", 7);
        assert_eq!(cfg.ws_url(), "ws://localhost:3000/ws/waitlist/7");

        let cfg = ClientConfig::new("https://qwait.example.com", 7);
        assert_eq!(cfg.ws_url(), "wss://qwait.example.com/ws/waitlist/7");
    }
}
