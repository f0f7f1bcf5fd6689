//! REST-backed [`TimelineService`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Call | Request |
//! |---|---|
//! | `get_all` | `GET /timeline` |
//! | boards | `POST /boards`, `PATCH /boards/{id}`, `DELETE /boards/{id}` |
//! | bookmarks | `POST /bookmarks`, `PATCH /bookmarks/{id}`, `DELETE /bookmarks/{id}`, `POST /bookmarks/{id}/move` |
//! | connectors | `POST /connectors`, `PATCH /connectors/{id}`, `DELETE /connectors/{id}` |
//!
//! The server is expected to cascade board deletion itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::timeline_service::TimelineService;
use crate::types::board::{Board, BoardPatch, Position};
use crate::types::bookmark::{BookmarkEntry, BookmarkPatch};
use crate::types::connector::{ConnectorDraft, ConnectorPatch, ConnectorString};
use crate::types::errors::ServiceError;
use crate::types::timeline::TimelineData;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeline store reached over HTTP with JSON bodies.
pub struct RemoteTimelineService {
    client: Client,
    base_url: String,
}

impl RemoteTimelineService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("stringboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`, which must start with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &url, &body))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::SerializationError(e.to_string()))
    }
}

fn status_error(status: StatusCode, url: &str, body: &str) -> ServiceError {
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(url.to_string()),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::Rejected(format!("{} {}", status, body))
        }
        StatusCode::SERVICE_UNAVAILABLE => ServiceError::Unavailable(url.to_string()),
        _ => ServiceError::NetworkError(format!("{} from {}", status, url)),
    }
}

#[async_trait]
impl TimelineService for RemoteTimelineService {
    async fn get_all(&self) -> Result<TimelineData, ServiceError> {
        self.fetch(self.client.get(self.endpoint("/timeline"))).await
    }

    async fn create_board(&self, title: &str, position: Position) -> Result<Board, ServiceError> {
        let body = json!({ "title": title, "position": position });
        self.fetch(self.client.post(self.endpoint("/boards")).json(&body))
            .await
    }

    async fn update_board(&self, id: &str, patch: &BoardPatch) -> Result<Board, ServiceError> {
        let url = self.endpoint(&format!("/boards/{}", id));
        self.fetch(self.client.patch(url).json(patch)).await
    }

    async fn delete_board(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&format!("/boards/{}", id));
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn create_bookmark(
        &self,
        board_id: &str,
        title: &str,
        url: Option<&str>,
    ) -> Result<BookmarkEntry, ServiceError> {
        let body = json!({ "board_id": board_id, "title": title, "url": url });
        self.fetch(self.client.post(self.endpoint("/bookmarks")).json(&body))
            .await
    }

    async fn update_bookmark(
        &self,
        id: &str,
        patch: &BookmarkPatch,
    ) -> Result<BookmarkEntry, ServiceError> {
        let url = self.endpoint(&format!("/bookmarks/{}", id));
        self.fetch(self.client.patch(url).json(patch)).await
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&format!("/bookmarks/{}", id));
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn move_bookmark(
        &self,
        id: &str,
        new_board_id: &str,
        new_order: i64,
    ) -> Result<BookmarkEntry, ServiceError> {
        let url = self.endpoint(&format!("/bookmarks/{}/move", id));
        let body = json!({ "board_id": new_board_id, "order": new_order });
        self.fetch(self.client.post(url).json(&body)).await
    }

    async fn create_connector(
        &self,
        draft: &ConnectorDraft,
    ) -> Result<ConnectorString, ServiceError> {
        self.fetch(self.client.post(self.endpoint("/connectors")).json(draft))
            .await
    }

    async fn update_connector(
        &self,
        id: &str,
        patch: &ConnectorPatch,
    ) -> Result<ConnectorString, ServiceError> {
        let url = self.endpoint(&format!("/connectors/{}", id));
        self.fetch(self.client.patch(url).json(patch)).await
    }

    async fn delete_connector(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&format!("/connectors/{}", id));
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}
