//! HTTP client for waitlist API calls
//!
//! 变更操作全部走这里；WebSocket 只读。

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{
    ActiveList, ColumnsUpdate, EntryCreate, EntryStatus, EntryUpdate, StatusChange, WaitlistConfig,
    WaitlistEntry,
};

use crate::{ClientConfig, ClientError, ClientResult};

const RESTAURANT_HEADER: &str = "X-Restaurant-Id";

/// 服务端错误响应信封
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[allow(dead_code)]
    code: String,
    message: String,
}

/// HTTP client for making requests to the waitlist server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    restaurant_id: i64,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            restaurant_id: config.restaurant_id,
        }
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header(RESTAURANT_HEADER, self.restaurant_id)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(RESTAURANT_HEADER, self.restaurant_id)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .client
            .put(format!("{}{path}", self.base_url))
            .header(RESTAURANT_HEADER, self.restaurant_id)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .client
            .delete(format!("{}{path}", self.base_url))
            .header(RESTAURANT_HEADER, self.restaurant_id)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                StatusCode::CONFLICT => Err(ClientError::Duplicate(message)),
                StatusCode::UNPROCESSABLE_ENTITY => Err(ClientError::InvalidTransition(message)),
                _ => Err(ClientError::Internal(message)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Waitlist API ==========

    /// Active queue with positions (full reload source)
    pub async fn list_active(&self) -> ClientResult<ActiveList> {
        self.get("/api/waitlist").await
    }

    /// Full history including terminal entries
    pub async fn list_all(&self) -> ClientResult<Vec<WaitlistEntry>> {
        self.get("/api/waitlist/all").await
    }

    /// Add a party to the queue (staff action)
    pub async fn create_entry(&self, entry: &EntryCreate) -> ClientResult<WaitlistEntry> {
        self.post("/api/waitlist", entry).await
    }

    /// Fetch a single entry
    pub async fn get_entry(&self, id: i64) -> ClientResult<WaitlistEntry> {
        self.get(&format!("/api/waitlist/{id}")).await
    }

    /// Edit customer-facing fields
    pub async fn update_entry(&self, id: i64, update: &EntryUpdate) -> ClientResult<WaitlistEntry> {
        self.put(&format!("/api/waitlist/{id}"), update).await
    }

    /// Remove an entry from the queue
    pub async fn remove_entry(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/waitlist/{id}")).await
    }

    /// Apply a status transition
    pub async fn set_status(&self, id: i64, status: EntryStatus) -> ClientResult<WaitlistEntry> {
        self.post(&format!("/api/waitlist/{id}/status"), &StatusChange { status })
            .await
    }

    /// Read the dashboard column configuration
    pub async fn get_columns(&self) -> ClientResult<WaitlistConfig> {
        self.get("/api/waitlist/columns").await
    }

    /// Replace the dashboard column configuration
    pub async fn set_columns(&self, columns: ColumnsUpdate) -> ClientResult<WaitlistConfig> {
        self.put("/api/waitlist/columns", &columns).await
    }
}
