pub mod core;

use crate::core::config::BlockConfig;
use crate::core::feed::{FeedFetcher, FetchOutcome};
use crate::core::render::RenderedBlock;

pub use crate::core::config::{ConfigError, RawBlockSettings, SettingsForm};
pub use crate::core::feed::{FeedItem, FeedRequest, FetchFailure};

/// The "most active issues" block for one configured project.
#[derive(Debug, Clone)]
pub struct IssuesBlock {
    config: BlockConfig,
    fetcher: FeedFetcher,
}

impl IssuesBlock {
    pub fn new(config: BlockConfig, fetcher: FeedFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Builds the block against the configured feed host with a default client.
    pub fn from_config(config: BlockConfig) -> Self {
        let fetcher = FeedFetcher::with_client(reqwest::Client::new(), config.feed_base_url());
        Self::new(config, fetcher)
    }

    pub async fn build(&self) -> RenderedBlock {
        self.build_with_outcome().await.0
    }

    /// Like [`IssuesBlock::build`], also handing back how the fetch went.
    pub async fn build_with_outcome(&self) -> (RenderedBlock, FetchOutcome) {
        let outcome = self.fetcher.fetch_request(&self.config.feed_request()).await;
        if let Some(failure) = outcome.failure() {
            tracing::debug!(?failure, project = self.config.project_name(), "rendering empty issues block");
        }
        let rendered = RenderedBlock::new(self.config.project_name(), outcome.items().to_vec());
        (rendered, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::{FeedTransport, TransportError, TransportResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticTransport {
        status: u16,
        body: String,
        calls: AtomicUsize,
        last_url: std::sync::Mutex<Option<String>>,
    }

    impl StaticTransport {
        fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.into(),
                calls: AtomicUsize::new(0),
                last_url: std::sync::Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl FeedTransport for StaticTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_url.lock().expect("url lock") = Some(url.to_string());
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone().into_bytes(),
            })
        }
    }

    fn feed_with(count: usize) -> String {
        let items: String = (1..=count)
            .map(|index| format!("<item><title>Issue {index}</title></item>"))
            .collect();
        format!("<rss><channel>{items}</channel></rss>")
    }

    fn block_for(form: SettingsForm, transport: Arc<StaticTransport>) -> Result<IssuesBlock, ConfigError> {
        let config = form.validate()?;
        let fetcher = FeedFetcher::new(transport, config.feed_base_url());
        Ok(IssuesBlock::new(config, fetcher))
    }

    #[tokio::test]
    async fn block_limits_rows_to_configured_max() {
        let transport = StaticTransport::new(200, feed_with(15));
        let block = block_for(
            SettingsForm {
                project_name: "Views".to_string(),
                max_issues: "5".to_string(),
                feed_base_url: Some("http://feeds.test".to_string()),
            },
            transport.clone(),
        )
        .expect("settings should validate");

        let (rendered, outcome) = block.build_with_outcome().await;
        assert!(outcome.is_fetched());
        assert_eq!(rendered.caption, "Most active issues of the Views");
        assert_eq!(rendered.rows, vec!["Issue 1", "Issue 2", "Issue 3", "Issue 4", "Issue 5"]);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        let url = transport.last_url.lock().expect("url lock").clone().expect("url recorded");
        assert!(url.starts_with("http://feeds.test/project/issues/rss?text=&projects=Views&"));
    }

    #[tokio::test]
    async fn failed_fetch_renders_empty_state_and_keeps_reason() {
        let transport = StaticTransport::new(503, "unavailable");
        let block = IssuesBlock::new(
            BlockConfig::default(),
            FeedFetcher::new(transport, "http://feeds.test"),
        );

        let (rendered, outcome) = block.build_with_outcome().await;
        assert!(rendered.is_empty());
        assert_eq!(rendered.caption, "Most active issues of the Translation templates for Drupal core");
        assert!(rendered.to_text().contains("No issues available"));
        assert_eq!(outcome, FetchOutcome::Unavailable(FetchFailure::Upstream(503)));
    }

    #[tokio::test]
    async fn empty_feed_is_not_a_failure() {
        let transport = StaticTransport::new(200, feed_with(0));
        let block = IssuesBlock::new(
            BlockConfig::default(),
            FeedFetcher::new(transport, "http://feeds.test"),
        );

        let (rendered, outcome) = block.build_with_outcome().await;
        assert!(rendered.is_empty());
        assert_eq!(outcome, FetchOutcome::Fetched(Vec::new()));
    }

    #[test]
    fn invalid_settings_never_reach_the_network() {
        let transport = StaticTransport::new(200, feed_with(3));

        let empty_project = block_for(
            SettingsForm {
                project_name: String::new(),
                max_issues: "10".to_string(),
                feed_base_url: None,
            },
            transport.clone(),
        );
        assert!(matches!(empty_project, Err(ConfigError::Invalid(_))));

        let non_numeric = block_for(
            SettingsForm {
                project_name: "Views".to_string(),
                max_issues: "ten".to_string(),
                feed_base_url: None,
            },
            transport.clone(),
        );
        assert!(matches!(non_numeric, Err(ConfigError::Invalid(_))));

        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
