pub mod fetcher;
pub mod normalizer;
pub mod parser;
pub mod transport;
pub mod types;

pub use fetcher::{build_feed_url, FeedFetcher, DEFAULT_FEED_BASE_URL};
pub use normalizer::limit_items;
pub use transport::{FeedTransport, ReqwestTransport, TransportError, TransportResponse};
pub use types::{FeedItem, FeedRequest, FetchFailure, FetchOutcome};
