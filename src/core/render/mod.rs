use std::fmt::Write as _;

use serde::Serialize;

use super::feed::FeedItem;

pub const ISSUE_TITLE_HEADER: &str = "Issue title";
pub const EMPTY_MESSAGE: &str = "No issues available";
pub const CACHE_MAX_AGE_SECS: u64 = 3600;
pub const CONTENT_LIST_CACHE_TAG: &str = "node_list";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_secs: u64,
    pub tags: Vec<String>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age_secs: CACHE_MAX_AGE_SECS,
            tags: vec![CONTENT_LIST_CACHE_TAG.to_string()],
        }
    }
}

/// What the hosting page draws for the block.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenderedBlock {
    pub caption: String,
    pub header: String,
    pub rows: Vec<String>,
    pub empty_message: String,
    pub cache: CachePolicy,
}

impl RenderedBlock {
    pub fn new(project_name: &str, items: Vec<FeedItem>) -> Self {
        Self {
            caption: caption_for(project_name),
            header: ISSUE_TITLE_HEADER.to_string(),
            rows: items.into_iter().map(|item| item.title).collect(),
            empty_message: EMPTY_MESSAGE.to_string(),
            cache: CachePolicy::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.chars().count())
            .chain([self.header.chars().count(), self.empty_message.chars().count()])
            .max()
            .unwrap_or_default();
        let rule = "-".repeat(width + 2);

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.caption);
        let _ = writeln!(out, "+{rule}+");
        let _ = writeln!(out, "| {:<width$} |", self.header);
        let _ = writeln!(out, "+{rule}+");
        if self.rows.is_empty() {
            let _ = writeln!(out, "| {:<width$} |", self.empty_message);
        }
        for row in &self.rows {
            let _ = writeln!(out, "| {row:<width$} |");
        }
        let _ = writeln!(out, "+{rule}+");
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn caption_for(project_name: &str) -> String {
    format!("Most active issues of the {project_name}")
}
