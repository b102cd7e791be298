//! Bookmark domain model.
//!
//! # Responsibility
//! - Define the locally persisted copy of a saved post.
//! - Provide construction and recovery helpers.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another bookmark.
//! - A removed bookmark never carries a `folder_uuid`.
//! - `vote_count` and `comment_count` are never negative.

use crate::model::folder::FolderId;
use crate::model::post::Post;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable local bookmark identifier.
///
/// This is the identity token carried by drag payloads.
pub type BookmarkId = Uuid;

/// Locally persisted reference to a remote post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub uuid: BookmarkId,
    /// Remote content id, preferred identity key.
    pub content_id: Option<String>,
    /// Fallback identity key, unique among active bookmarks.
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub vote_count: i64,
    pub comment_count: i64,
    /// Epoch ms when the bookmark was created.
    pub date_saved: i64,
    /// Owning folder, if any.
    pub folder_uuid: Option<FolderId>,
    /// Soft-delete marker ("Recently Deleted").
    pub is_removed: bool,
    /// Epoch ms when the bookmark was soft-deleted.
    pub removed_at: Option<i64>,
}

impl Bookmark {
    /// Builds a fresh, unfiled, active bookmark from a post.
    ///
    /// # Errors
    /// - `ValidationError::EmptyUrl` when the post url is blank.
    pub fn from_post(post: &Post, date_saved: i64) -> Result<Self, ValidationError> {
        let url = post.identity_url();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        Ok(Self {
            uuid: Uuid::new_v4(),
            content_id: post.identity_content_id().map(str::to_string),
            url: url.to_string(),
            title: post.title.trim().to_string(),
            author: post
                .author
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            vote_count: post.vote_count.unwrap_or(0).max(0),
            comment_count: post.comment_count.unwrap_or(0).max(0),
            date_saved,
            folder_uuid: None,
            is_removed: false,
            removed_at: None,
        })
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        Ok(())
    }

    /// Clears the soft-delete marker.
    pub fn restore(&mut self) {
        self.is_removed = false;
        self.removed_at = None;
    }

    /// Returns whether this bookmark is visible in active lists.
    pub fn is_active(&self) -> bool {
        !self.is_removed
    }
}

#[cfg(test)]
mod tests {
    use super::Bookmark;
    use crate::model::post::Post;
    use crate::model::validation::ValidationError;

    #[test]
    fn from_post_copies_fields_and_clamps_counts() {
        let mut post = Post::new(" https://x/1 ", "T").with_content_id("abc");
        post.author = Some("Ann".to_string());
        post.vote_count = Some(-3);
        post.comment_count = Some(7);

        let bookmark = Bookmark::from_post(&post, 1_000).unwrap();
        assert_eq!(bookmark.url, "https://x/1");
        assert_eq!(bookmark.content_id.as_deref(), Some("abc"));
        assert_eq!(bookmark.author.as_deref(), Some("Ann"));
        assert_eq!(bookmark.vote_count, 0);
        assert_eq!(bookmark.comment_count, 7);
        assert_eq!(bookmark.date_saved, 1_000);
        assert!(bookmark.folder_uuid.is_none());
        assert!(bookmark.is_active());
    }

    #[test]
    fn from_post_rejects_blank_url() {
        let post = Post::new("   ", "T");
        assert_eq!(
            Bookmark::from_post(&post, 0).unwrap_err(),
            ValidationError::EmptyUrl
        );
    }

    #[test]
    fn blank_content_id_is_treated_as_absent() {
        let post = Post::new("https://x/2", "T").with_content_id("  ");
        let bookmark = Bookmark::from_post(&post, 0).unwrap();
        assert!(bookmark.content_id.is_none());
    }

    #[test]
    fn restore_clears_removal_marker() {
        let mut bookmark = Bookmark::from_post(&Post::new("https://x/4", "T"), 10).unwrap();
        bookmark.is_removed = true;
        bookmark.removed_at = Some(50);

        bookmark.restore();
        assert!(bookmark.is_active());
        assert_eq!(bookmark.removed_at, None);
        assert!(bookmark.folder_uuid.is_none());
    }
}
