//! Post summaries handed over by the content-fetching client.

use serde::{Deserialize, Serialize};

/// Remote article summary used as input for bookmarking.
///
/// Counts are optional because list queries do not always return them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Remote stable id. Preferred identity key when present.
    #[serde(default)]
    pub content_id: Option<String>,
    /// Canonical article url. Fallback identity key.
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub comment_count: Option<i64>,
}

impl Post {
    /// Creates a post with only the required fields.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content_id: None,
            url: url.into(),
            title: title.into(),
            author: None,
            vote_count: None,
            comment_count: None,
        }
    }

    /// Sets the remote content id.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Returns the content id with blank values treated as absent.
    pub fn identity_content_id(&self) -> Option<&str> {
        self.content_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns the trimmed url used for identity matching.
    pub fn identity_url(&self) -> &str {
        self.url.trim()
    }
}
