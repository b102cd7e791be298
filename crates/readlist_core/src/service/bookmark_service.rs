//! Bookmark store use-case service.
//!
//! # Responsibility
//! - Toggle bookmarks for posts handed over by the fetch client.
//! - Recover or permanently remove bookmarks, and serve ordered lists.
//!
//! # Invariants
//! - At most one active bookmark per content id OR url.
//! - Toggling off erases the record; it never produces a soft-deleted row.

use crate::clock::now_epoch_ms;
use crate::events::{EventBus, StoreEvent};
use crate::model::bookmark::{Bookmark, BookmarkId};
use crate::model::post::Post;
use crate::model::validation::ValidationError;
use crate::repo::bookmark_repo::{BookmarkFilter, BookmarkRepository};
use crate::service::error::{StoreError, StoreResult};
use log::{debug, info};

/// Result of [`BookmarkService::toggle_bookmark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// `true` when a bookmark was created, `false` when matches were removed.
    pub added: bool,
    /// Id of the created bookmark, or of the primary removed match
    /// (content id match before url match).
    pub bookmark_uuid: BookmarkId,
    /// Every erased bookmark, primary match first. Empty when `added`.
    pub removed: Vec<BookmarkId>,
}

/// Bookmark store facade.
pub struct BookmarkService<R: BookmarkRepository> {
    repo: R,
    events: EventBus,
}

impl<R: BookmarkRepository> BookmarkService<R> {
    pub fn new(repo: R, events: EventBus) -> Self {
        Self { repo, events }
    }

    /// Bookmarks `post`, or removes its existing bookmark.
    ///
    /// # Contract
    /// - Matching is OR across content id and url.
    /// - Every match is detached from its folder and erased in one
    ///   transaction (`added=false`). A post can match two bookmarks when its
    ///   url and content id point at different records.
    /// - Otherwise a new unfiled bookmark is saved with `date_saved=now`.
    pub fn toggle_bookmark(&self, post: &Post) -> StoreResult<ToggleOutcome> {
        let url = post.identity_url();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }

        let erased = self
            .repo
            .delete_active_matches(post.identity_content_id(), url)?;
        if let Some(primary) = erased.first().map(|bookmark| bookmark.uuid) {
            for bookmark in &erased {
                info!(
                    "event=bookmark_toggle module=bookmark status=ok action=removed bookmark_uuid={} had_folder={}",
                    bookmark.uuid,
                    bookmark.folder_uuid.is_some()
                );
                self.events.publish(StoreEvent::BookmarkDeleted {
                    bookmark_uuid: bookmark.uuid,
                    previous_folder: bookmark.folder_uuid,
                });
            }
            return Ok(ToggleOutcome {
                added: false,
                bookmark_uuid: primary,
                removed: erased.iter().map(|bookmark| bookmark.uuid).collect(),
            });
        }

        let bookmark = Bookmark::from_post(post, now_epoch_ms())?;
        self.repo.insert_bookmark(&bookmark)?;
        info!(
            "event=bookmark_toggle module=bookmark status=ok action=added bookmark_uuid={}",
            bookmark.uuid
        );
        self.events.publish(StoreEvent::BookmarkAdded {
            bookmark_uuid: bookmark.uuid,
        });
        Ok(ToggleOutcome {
            added: true,
            bookmark_uuid: bookmark.uuid,
            removed: Vec::new(),
        })
    }

    /// Returns whether an active bookmark exists for `post`.
    pub fn is_bookmarked(&self, post: &Post) -> StoreResult<bool> {
        let url = post.identity_url();
        if url.is_empty() {
            return Ok(false);
        }
        Ok(self
            .repo
            .find_active_match(post.identity_content_id(), url)?
            .is_some())
    }

    /// Hard-deletes one bookmark regardless of removed state.
    pub fn remove_permanently(&self, bookmark_uuid: BookmarkId) -> StoreResult<()> {
        let removed = self.repo.delete_bookmark(bookmark_uuid)?;
        info!(
            "event=bookmark_purge module=bookmark status=ok bookmark_uuid={} was_removed={}",
            removed.uuid, removed.is_removed
        );
        self.events.publish(StoreEvent::BookmarkDeleted {
            bookmark_uuid: removed.uuid,
            previous_folder: removed.folder_uuid,
        });
        Ok(())
    }

    /// Brings a soft-deleted bookmark back as unfiled and active.
    ///
    /// Recovering an already-active bookmark is a no-op.
    pub fn recover(&self, bookmark_uuid: BookmarkId) -> StoreResult<()> {
        if self.repo.restore_bookmark(bookmark_uuid)? {
            info!(
                "event=bookmark_recover module=bookmark status=ok bookmark_uuid={bookmark_uuid}"
            );
            self.events
                .publish(StoreEvent::BookmarkRecovered { bookmark_uuid });
        } else {
            debug!(
                "event=bookmark_recover module=bookmark status=skipped reason=already_active bookmark_uuid={bookmark_uuid}"
            );
        }
        Ok(())
    }

    /// Loads one bookmark regardless of removed state.
    pub fn get_bookmark(&self, bookmark_uuid: BookmarkId) -> StoreResult<Bookmark> {
        self.repo
            .get_bookmark(bookmark_uuid)?
            .ok_or(StoreError::BookmarkNotFound(bookmark_uuid))
    }

    /// Lists active bookmarks sorted by title.
    pub fn list_active(&self, filter: BookmarkFilter) -> StoreResult<Vec<Bookmark>> {
        self.repo.list_active(filter).map_err(Into::into)
    }

    /// Lists "Recently Deleted" bookmarks, optionally filtered by title.
    ///
    /// The filter is a case-insensitive substring match; blank text matches all.
    pub fn list_removed(&self, search_text: Option<&str>) -> StoreResult<Vec<Bookmark>> {
        let removed = self.repo.list_removed()?;
        let needle = match search_text.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_lowercase(),
            _ => return Ok(removed),
        };
        Ok(removed
            .into_iter()
            .filter(|bookmark| bookmark.title.to_lowercase().contains(&needle))
            .collect())
    }
}
