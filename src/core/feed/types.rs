#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub project_name: String,
    pub max_results: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Why a fetch produced no items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Transport(String),
    Upstream(u16),
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(Vec<FeedItem>),
    Unavailable(FetchFailure),
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Unavailable(failure) => Some(failure),
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        match self {
            FetchOutcome::Fetched(items) => items,
            FetchOutcome::Unavailable(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<FeedItem> {
        match self {
            FetchOutcome::Fetched(items) => items,
            FetchOutcome::Unavailable(_) => Vec::new(),
        }
    }
}
