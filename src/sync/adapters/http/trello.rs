//! Trello REST client implementing the source board port.

use super::{check_status, trim_base_url};
use crate::sync::{
    domain::{BoardCard, ListId, SourceCardId},
    ports::{SourceBoard, TransportError, TransportResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const SYSTEM: &str = "trello";

/// Card fields requested from the API.
const CARD_FIELDS: &str = "id,name,desc,idList,labels,due";

/// Trello board client authenticated with an API key and token.
#[derive(Debug, Clone)]
pub struct TrelloBoard {
    client: reqwest::Client,
    base_url: String,
    board_id: String,
    api_key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct TrelloCard {
    id: String,
    name: String,
    #[serde(default)]
    desc: String,
    #[serde(rename = "idList")]
    id_list: String,
    #[serde(default)]
    labels: Vec<TrelloLabel>,
    #[serde(default)]
    due: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TrelloLabel {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrelloList {
    name: String,
}

impl TrelloCard {
    fn into_domain(self) -> TransportResult<BoardCard> {
        let id = SourceCardId::new(self.id).map_err(|err| TransportError::Decode(err.to_string()))?;
        let list_id =
            ListId::new(self.id_list).map_err(|err| TransportError::Decode(err.to_string()))?;
        Ok(BoardCard::new(id, self.name, list_id)
            .with_description(self.desc)
            .with_labels(self.labels.into_iter().map(|label| label.name))
            .with_due(self.due))
    }
}

impl TrelloBoard {
    /// Creates a client for one board.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        board_id: impl Into<String>,
        api_key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            board_id: board_id.into(),
            api_key: api_key.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get<T>(&self, path: &str, fields: &str) -> TransportResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(self.url(path))
            .query(&[
                ("key", self.api_key.as_str()),
                ("token", self.token.as_str()),
                ("fields", fields),
            ])
            .send()
            .await
            .map_err(TransportError::request)?;
        check_status(SYSTEM, response)
            .await?
            .json::<T>()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}

#[async_trait]
impl SourceBoard for TrelloBoard {
    async fn board_cards(&self) -> TransportResult<Vec<BoardCard>> {
        let path = format!("boards/{}/cards", self.board_id);
        let cards: Vec<TrelloCard> = self.get(&path, CARD_FIELDS).await?;
        cards.into_iter().map(TrelloCard::into_domain).collect()
    }

    async fn card(&self, card_id: &SourceCardId) -> TransportResult<BoardCard> {
        let path = format!("cards/{card_id}");
        let card: TrelloCard = self.get(&path, CARD_FIELDS).await?;
        card.into_domain()
    }

    async fn list_name(&self, list_id: &ListId) -> TransportResult<String> {
        let path = format!("lists/{list_id}");
        let list: TrelloList = self.get(&path, "name").await?;
        Ok(list.name)
    }
}
