use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::feed::{FeedRequest, DEFAULT_FEED_BASE_URL};

pub const DEFAULT_PROJECT_NAME: &str = "Translation templates for Drupal core";
pub const DEFAULT_MAX_ISSUES: i64 = 10;
pub const MIN_MAX_ISSUES: i64 = 1;
pub const MAX_MAX_ISSUES: i64 = 100;

pub const PROJECT_ENV_KEY: &str = "ISSUES_PROJECT";
pub const MAX_ISSUES_ENV_KEY: &str = "ISSUES_MAX";
pub const FEED_BASE_URL_ENV_KEY: &str = "ISSUES_FEED_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid block settings: {}", describe(.0))]
    Invalid(Vec<FieldError>),
    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

impl ConfigError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigError::Invalid(errors) => errors,
            ConfigError::EnvFile(_) => &[],
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Stored block settings as the hosting layer hands them over. Any field
/// may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlockSettings {
    pub project_name: Option<String>,
    pub max_issues: Option<i64>,
    pub feed_base_url: Option<String>,
}

/// Stored settings deserialize through [`BlockConfig::resolve`], so the
/// defaults always apply.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(from = "RawBlockSettings")]
pub struct BlockConfig {
    project_name: String,
    max_issues: i64,
    feed_base_url: String,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            max_issues: DEFAULT_MAX_ISSUES,
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
        }
    }
}

impl From<RawBlockSettings> for BlockConfig {
    fn from(raw: RawBlockSettings) -> Self {
        Self::resolve(raw)
    }
}

impl BlockConfig {
    /// Applies defaults to whatever is missing, empty or out of range.
    pub fn resolve(raw: RawBlockSettings) -> Self {
        let defaults = Self::default();
        Self {
            project_name: non_empty(raw.project_name).unwrap_or(defaults.project_name),
            max_issues: raw
                .max_issues
                .filter(|max| (MIN_MAX_ISSUES..=MAX_MAX_ISSUES).contains(max))
                .unwrap_or(defaults.max_issues),
            feed_base_url: non_empty(raw.feed_base_url).unwrap_or(defaults.feed_base_url),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings from a dotenv file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let vars = dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let form = SettingsForm {
            project_name: lookup(PROJECT_ENV_KEY)
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            max_issues: lookup(MAX_ISSUES_ENV_KEY)
                .unwrap_or_else(|| DEFAULT_MAX_ISSUES.to_string()),
            feed_base_url: lookup(FEED_BASE_URL_ENV_KEY),
        };
        form.validate()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn max_issues(&self) -> i64 {
        self.max_issues
    }

    pub fn feed_base_url(&self) -> &str {
        &self.feed_base_url
    }

    pub fn feed_request(&self) -> FeedRequest {
        FeedRequest {
            project_name: self.project_name.clone(),
            max_results: self.max_issues,
        }
    }
}

/// Submitted values of the block settings form, unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    pub project_name: String,
    pub max_issues: String,
    #[serde(default)]
    pub feed_base_url: Option<String>,
}

impl SettingsForm {
    pub fn validate(&self) -> Result<BlockConfig, ConfigError> {
        let mut errors = Vec::new();

        let project_name = self.project_name.trim();
        if project_name.is_empty() {
            errors.push(FieldError {
                field: "project_name",
                message: "Project title cannot be empty.",
            });
        }

        let max_issues = match self.max_issues.trim().parse::<i64>() {
            Ok(value) if (MIN_MAX_ISSUES..=MAX_MAX_ISSUES).contains(&value) => Some(value),
            Ok(_) => {
                errors.push(FieldError {
                    field: "max_issues",
                    message: "The number of issues must be between 1 and 100.",
                });
                None
            }
            Err(_) => {
                errors.push(FieldError {
                    field: "max_issues",
                    message: "The number of issues must be numeric.",
                });
                None
            }
        };

        match max_issues {
            Some(max_issues) if errors.is_empty() => Ok(BlockConfig::resolve(RawBlockSettings {
                project_name: Some(project_name.to_string()),
                max_issues: Some(max_issues),
                feed_base_url: self.feed_base_url.clone(),
            })),
            _ => Err(ConfigError::Invalid(errors)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
