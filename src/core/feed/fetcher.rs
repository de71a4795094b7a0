use std::sync::Arc;

use super::normalizer::limit_items;
use super::parser::parse_feed_bytes;
use super::transport::{FeedTransport, ReqwestTransport};
use super::types::{FeedItem, FeedRequest, FetchFailure, FetchOutcome};

pub const DEFAULT_FEED_BASE_URL: &str = "https://www.drupal.org";

const FEED_PATH: &str = "/project/issues/rss";
// The upstream ignores the comment_count ordering; results come back in its own order.
const FIXED_QUERY: &str = "status=1&priorities=All&categories=All&order=comment_count&sort=desc";

pub fn build_feed_url(base_url: &str, project_name: &str) -> String {
    format!(
        "{}{FEED_PATH}?text=&projects={}&{FIXED_QUERY}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(project_name)
    )
}

#[derive(Clone)]
pub struct FeedFetcher {
    transport: Arc<dyn FeedTransport>,
    base_url: String,
}

impl FeedFetcher {
    pub fn new(transport: Arc<dyn FeedTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(ReqwestTransport::with_client(client)), base_url)
    }

    /// Fetches the issue feed for `project_name`. Failures are logged and
    /// reported through [`FetchOutcome::Unavailable`], never returned as errors.
    pub async fn fetch(&self, project_name: &str) -> FetchOutcome {
        let url = build_feed_url(&self.base_url, project_name);
        tracing::debug!(%url, "fetching issue feed");

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!("{error}");
                return FetchOutcome::Unavailable(FetchFailure::Transport(error.to_string()));
            }
        };

        if response.status != 200 {
            tracing::warn!(status = response.status, %url, "issue feed returned non-200 status");
            return FetchOutcome::Unavailable(FetchFailure::Upstream(response.status));
        }

        match parse_feed_bytes(&response.body) {
            Ok(items) => {
                tracing::debug!(count = items.len(), "parsed issue feed");
                FetchOutcome::Fetched(items)
            }
            Err(error) => {
                tracing::warn!(%url, "issue feed could not be parsed: {error}");
                FetchOutcome::Unavailable(FetchFailure::Parse(error.to_string()))
            }
        }
    }

    pub async fn fetch_items(&self, project_name: &str) -> Vec<FeedItem> {
        self.fetch(project_name).await.into_items()
    }

    /// Fetches and truncates to the request's bound.
    pub async fn fetch_request(&self, request: &FeedRequest) -> FetchOutcome {
        match self.fetch(&request.project_name).await {
            FetchOutcome::Fetched(items) => {
                FetchOutcome::Fetched(limit_items(items, request.max_results))
            }
            unavailable => unavailable,
        }
    }
}

impl std::fmt::Debug for FeedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
