use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::StoryPage, protocol::StoryQuery};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::FetchError};

/// The one seam between the controller and the stories API.
#[async_trait]
pub trait StoryService: Send + Sync {
    async fn fetch_top_stories(&self, query: &StoryQuery) -> Result<StoryPage, FetchError>;

    /// Defaulted form: page 1, 20 per page, no search.
    async fn fetch_top_stories_with(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        search_title: Option<&str>,
    ) -> Result<StoryPage, FetchError> {
        let defaults = StoryQuery::default();
        let query = StoryQuery::new(
            page.unwrap_or(defaults.page),
            page_size.unwrap_or(defaults.page_size),
            search_title.unwrap_or_default(),
        );
        self.fetch_top_stories(&query).await
    }
}

/// `StoryService` over plain HTTP GET. No retries, no caching.
#[derive(Debug, Clone)]
pub struct HttpStoryService {
    http: Client,
    base_url: Url,
}

impl HttpStoryService {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|source| FetchError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(FetchError::Transport)?;
        Self::with_client(http, &settings.api_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl StoryService for HttpStoryService {
    async fn fetch_top_stories(&self, query: &StoryQuery) -> Result<StoryPage, FetchError> {
        debug!(
            page = query.page,
            page_size = query.page_size,
            search = %query.search_title,
            "requesting top stories"
        );

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status, body));
        }

        response.json::<StoryPage>().await.map_err(FetchError::Decode)
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
