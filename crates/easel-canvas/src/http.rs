//! REST client for the whiteboard platform

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::item::{CanvasItem, ItemId, ItemKind, ItemSpec};
use crate::remote::RemoteCanvas;

const ERROR_BODY_LIMIT: usize = 512;

/// Connection settings for [`HttpCanvas`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Platform API root, e.g. `https://canvas.example.com/api/v2`
    pub base_url: String,
    /// Board to operate on
    pub board_id: String,
    /// Bearer token
    pub token: String,
}

impl CanvasConfig {
    /// Settings for one board
    #[inline]
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        board_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            board_id: board_id.into(),
            token: token.into(),
        }
    }
}

/// [`RemoteCanvas`] backed by the platform REST API
///
/// Maps `404` on reads to `Ok(None)` and `404` on deletes to success, so the
/// engine sees externally-deleted items as plain absence rather than failure.
#[derive(Debug, Clone)]
pub struct HttpCanvas {
    config: CanvasConfig,
    client: Client,
}

impl HttpCanvas {
    /// Client over the given settings
    #[inline]
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Reuse an existing HTTP client (connection pooling across boards)
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn items_url(&self) -> String {
        format!(
            "{}/boards/{}/items",
            self.config.base_url.trim_end_matches('/'),
            self.config.board_id
        )
    }

    fn item_url(&self, id: &ItemId) -> String {
        format!("{}/{}", self.items_url(), id)
    }

    fn viewport_url(&self) -> String {
        format!(
            "{}/boards/{}/viewport",
            self.config.base_url.trim_end_matches('/'),
            self.config.board_id
        )
    }

    async fn check(response: Response) -> Result<Response, CanvasError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut message = response.text().await.unwrap_or_default();
        message.truncate(ERROR_BODY_LIMIT);
        Err(CanvasError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<CanvasItem>,
}

#[derive(Debug, Serialize)]
struct ViewportRequest<'a> {
    item_ids: &'a [ItemId],
}

#[async_trait::async_trait]
impl RemoteCanvas for HttpCanvas {
    async fn list_by_kind(&self, kind: ItemKind) -> Result<Vec<CanvasItem>, CanvasError> {
        tracing::debug!(%kind, "listing items");
        let response = self
            .client
            .get(self.items_url())
            .bearer_auth(&self.config.token)
            .query(&[("type", kind.api_name())])
            .send()
            .await?;
        let body: ListResponse = Self::check(response).await?.json().await?;
        Ok(body.data)
    }

    async fn get_by_id(&self, id: &ItemId) -> Result<Option<CanvasItem>, CanvasError> {
        tracing::debug!(%id, "fetching item");
        let response = self
            .client
            .get(self.item_url(id))
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let item: CanvasItem = Self::check(response).await?.json().await?;
        Ok(Some(item))
    }

    async fn create(&self, spec: ItemSpec) -> Result<CanvasItem, CanvasError> {
        tracing::debug!(kind = %spec.kind, title = %spec.title, "creating item");
        let response = self
            .client
            .post(self.items_url())
            .bearer_auth(&self.config.token)
            .json(&spec)
            .send()
            .await?;
        let item: CanvasItem = Self::check(response).await?.json().await?;
        Ok(item)
    }

    async fn update(&self, item: &CanvasItem) -> Result<(), CanvasError> {
        tracing::debug!(id = %item.id, "updating item");
        let response = self
            .client
            .patch(self.item_url(&item.id))
            .bearer_auth(&self.config.token)
            .json(item)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CanvasError::NotFound(item.id.clone()));
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn remove(&self, id: &ItemId) -> Result<(), CanvasError> {
        tracing::debug!(%id, "removing item");
        let response = self
            .client
            .delete(self.item_url(id))
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response).await?;
        Ok(())
    }

    async fn focus_on(&self, ids: &[ItemId]) -> Result<(), CanvasError> {
        tracing::debug!(count = ids.len(), "focusing viewport");
        let response = self
            .client
            .post(self.viewport_url())
            .bearer_auth(&self.config.token)
            .json(&ViewportRequest { item_ids: ids })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> HttpCanvas {
        HttpCanvas::new(CanvasConfig::new(
            "https://canvas.example.com/api/v2/",
            "board-1",
            "secret",
        ))
    }

    #[test]
    fn urls_strip_trailing_slash() {
        let c = canvas();
        assert_eq!(
            c.items_url(),
            "https://canvas.example.com/api/v2/boards/board-1/items"
        );
        assert_eq!(
            c.item_url(&ItemId::new("i9")),
            "https://canvas.example.com/api/v2/boards/board-1/items/i9"
        );
        assert_eq!(
            c.viewport_url(),
            "https://canvas.example.com/api/v2/boards/board-1/viewport"
        );
    }
}
