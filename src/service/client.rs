//! Ranking service seam and its HTTP implementation.
//!
//! `HttpRankingService` maps one typed request to one typed response. It never
//! retries, caches or coalesces; retry policy belongs to the session machine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Client as HttpClient, RequestBuilder, Url};

use super::error::{Endpoint, ServiceError, ServiceResult};
use super::wire::{self, PairResponse};
use crate::constants::{
    CHOOSE_PATH, ENTRIES_PATH, ITEMS_PATH, MAX_ERROR_BODY_CHARS, NEXT_PAIR_PATH,
    NO_CACHE_DIRECTIVE, PRAGMA_NO_CACHE, RANKINGS_PATH, RESET_PATH,
};
use crate::model::{Item, ItemId, Judgment, NewItem};

/// Operations offered by the remote ranking service.
#[async_trait]
pub trait RankingService: Send + Sync {
    /// Fetches every item with its current rank.
    async fn list_items(&self) -> ServiceResult<Vec<Item>>;
    /// Fetches the next pending pair, or the completion signal.
    async fn next_pair(&self) -> ServiceResult<PairResponse>;
    /// Creates an item and returns the server's copy.
    async fn add_item(&self, item: &NewItem) -> ServiceResult<Item>;
    /// Deletes an item.
    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()>;
    /// Records a winner/loser judgment.
    async fn submit_choice(&self, judgment: &Judgment) -> ServiceResult<()>;
    /// Clears all rankings and re-seeds comparison state.
    async fn reset(&self) -> ServiceResult<()>;
}

#[async_trait]
impl<T: RankingService + ?Sized> RankingService for Arc<T> {
    async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        (**self).list_items().await
    }

    async fn next_pair(&self) -> ServiceResult<PairResponse> {
        (**self).next_pair().await
    }

    async fn add_item(&self, item: &NewItem) -> ServiceResult<Item> {
        (**self).add_item(item).await
    }

    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()> {
        (**self).delete_item(id).await
    }

    async fn submit_choice(&self, judgment: &Judgment) -> ServiceResult<()> {
        (**self).submit_choice(judgment).await
    }

    async fn reset(&self) -> ServiceResult<()> {
        (**self).reset().await
    }
}

/// JSON-over-HTTP client for the ranking service.
#[derive(Debug, Clone)]
pub struct HttpRankingService {
    http: HttpClient,
    base_url: Url,
}

impl HttpRankingService {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::ClientSetup(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::ClientSetup(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let http = HttpClient::builder()
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::ClientSetup(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_DIRECTIVE));
        headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn execute(&self, endpoint: Endpoint, request: RequestBuilder) -> ServiceResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::network(endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The status alone decides the error; an unreadable body stays empty.
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%endpoint, status = status.as_u16(), "ranking service rejected request");
            return Err(ServiceError::server(
                endpoint,
                status.as_u16(),
                truncate(&body, MAX_ERROR_BODY_CHARS),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ServiceError::network(endpoint, format!("failed to read body: {e}")))
    }
}

#[async_trait]
impl RankingService for HttpRankingService {
    #[tracing::instrument(skip_all)]
    async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        let endpoint = Endpoint::ListItems;
        let body = self
            .execute(endpoint, self.http.get(self.url(&[RANKINGS_PATH])))
            .await?;
        wire::decode_rankings(&body).map_err(|e| ServiceError::decode(endpoint, e))
    }

    #[tracing::instrument(skip_all)]
    async fn next_pair(&self) -> ServiceResult<PairResponse> {
        let endpoint = Endpoint::NextPair;
        let body = self
            .execute(endpoint, self.http.get(self.url(&[NEXT_PAIR_PATH])))
            .await?;
        wire::decode_pair(&body).map_err(|e| ServiceError::decode(endpoint, e))
    }

    #[tracing::instrument(skip_all, fields(title = %item.title))]
    async fn add_item(&self, item: &NewItem) -> ServiceResult<Item> {
        let endpoint = Endpoint::AddItem;
        let body = self
            .execute(endpoint, self.http.post(self.url(&[ENTRIES_PATH])).json(item))
            .await?;
        wire::decode_entry(&body).map_err(|e| ServiceError::decode(endpoint, e))
    }

    #[tracing::instrument(skip_all, fields(item_id = %id))]
    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()> {
        self.execute(
            Endpoint::DeleteItem,
            self.http.delete(self.url(&[ITEMS_PATH, id.as_str()])),
        )
        .await
        .map(|_| ())
    }

    #[tracing::instrument(skip_all, fields(winner = %judgment.winner_id, loser = %judgment.loser_id))]
    async fn submit_choice(&self, judgment: &Judgment) -> ServiceResult<()> {
        self.execute(
            Endpoint::SubmitChoice,
            self.http.post(self.url(&[CHOOSE_PATH])).json(judgment),
        )
        .await
        .map(|_| ())
    }

    #[tracing::instrument(skip_all)]
    async fn reset(&self) -> ServiceResult<()> {
        self.execute(Endpoint::Reset, self.http.post(self.url(&[RESET_PATH])))
            .await
            .map(|_| ())
    }
}

pub(crate) fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
