//! Pivotal Tracker REST client implementing the target tracker port.

use super::{check_status, trim_base_url};
use crate::sync::{
    domain::{ItemPayload, TargetItemId},
    ports::{DeleteOutcome, TargetTracker, TransportError, TransportResult},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;

const SYSTEM: &str = "pivotal";
const TOKEN_HEADER: &str = "X-TrackerToken";

/// Pivotal Tracker project client authenticated with an API token.
#[derive(Debug, Clone)]
pub struct PivotalTracker {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    token: String,
}

impl PivotalTracker {
    /// Creates a client for one project.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            project_id: project_id.into(),
            token: token.into(),
        }
    }

    fn stories_url(&self) -> String {
        format!("{}/projects/{}/stories", self.base_url, self.project_id)
    }

    fn story_url(&self, id: &TargetItemId) -> String {
        format!("{}/{id}", self.stories_url())
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(TOKEN_HEADER, self.token.as_str())
            .header(ACCEPT, "application/json")
    }
}

/// Reads the story id from a response body. The API returns numeric ids,
/// string ids are accepted as well.
fn story_id(body: &Value) -> TransportResult<TargetItemId> {
    let raw = match body.get("id") {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.clone(),
        _ => return Err(TransportError::Decode("story response has no id".to_owned())),
    };
    TargetItemId::new(raw).map_err(|err| TransportError::Decode(err.to_string()))
}

#[async_trait]
impl TargetTracker for PivotalTracker {
    async fn create_item(&self, payload: &ItemPayload) -> TransportResult<TargetItemId> {
        let response = self
            .request(reqwest::Method::POST, self.stories_url())
            .json(payload)
            .send()
            .await
            .map_err(TransportError::request)?;
        let body: Value = check_status(SYSTEM, response)
            .await?
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        story_id(&body)
    }

    async fn update_item(&self, id: &TargetItemId, payload: &ItemPayload) -> TransportResult<()> {
        let response = self
            .request(reqwest::Method::PUT, self.story_url(id))
            .json(payload)
            .send()
            .await
            .map_err(TransportError::request)?;
        check_status(SYSTEM, response).await?;
        Ok(())
    }

    async fn delete_item(&self, id: &TargetItemId) -> TransportResult<DeleteOutcome> {
        let response = self
            .request(reqwest::Method::DELETE, self.story_url(id))
            .send()
            .await
            .map_err(TransportError::request)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::AlreadyGone);
        }
        check_status(SYSTEM, response).await?;
        Ok(DeleteOutcome::Deleted)
    }
}
