use super::types::FeedItem;

/// Keeps the first `max_results` items in feed order. A bound of zero or
/// less keeps nothing.
pub fn limit_items(mut items: Vec<FeedItem>, max_results: i64) -> Vec<FeedItem> {
    let Ok(max) = usize::try_from(max_results) else {
        return Vec::new();
    };
    items.truncate(max);
    items
}
