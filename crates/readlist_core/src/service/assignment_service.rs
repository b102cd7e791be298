//! Bookmark-to-folder assignment service.
//!
//! # Responsibility
//! - Maintain the single folder association of each active bookmark.
//! - Resolve drag-and-drop payloads to bookmarks at drop time.
//! - Cascade folder members into "Recently Deleted".
//!
//! # Invariants
//! - A bookmark belongs to at most one folder at a time.
//! - `folder_uuid` is either `None` or an existing folder after every call.
//! - Stale drops are ignored and never touch folder order.

use crate::clock::now_epoch_ms;
use crate::events::{EventBus, StoreEvent};
use crate::model::bookmark::{Bookmark, BookmarkId};
use crate::model::folder::FolderId;
use crate::repo::bookmark_repo::{BookmarkFilter, BookmarkRepository};
use crate::repo::folder_repo::FolderRepository;
use crate::service::error::{StoreError, StoreResult};
use log::{info, warn};
use uuid::Uuid;

/// Stable identity carried by a drag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropToken {
    Bookmark(BookmarkId),
    /// Url of an active bookmark.
    Url(String),
}

impl DropToken {
    /// Parses a drag payload: a UUID resolves by id, anything else by url.
    ///
    /// Returns `None` for blank payloads.
    pub fn parse(payload: &str) -> Option<Self> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return None;
        }
        match Uuid::parse_str(trimmed) {
            Ok(id) => Some(Self::Bookmark(id)),
            Err(_) => Some(Self::Url(trimmed.to_string())),
        }
    }
}

/// Result of [`AssignmentService::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned { previous_folder: Option<FolderId> },
    /// Bookmark was already in the target folder.
    Unchanged,
}

/// Why a drop was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIgnoredReason {
    BookmarkNotFound,
    FolderNotFound,
}

/// Result of [`AssignmentService::handle_drop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Assigned {
        bookmark_uuid: BookmarkId,
        previous_folder: Option<FolderId>,
    },
    Unchanged {
        bookmark_uuid: BookmarkId,
    },
    Ignored(DropIgnoredReason),
}

/// Assignment manager facade.
pub struct AssignmentService<B: BookmarkRepository, F: FolderRepository> {
    bookmarks: B,
    folders: F,
    events: EventBus,
}

impl<B: BookmarkRepository, F: FolderRepository> AssignmentService<B, F> {
    pub fn new(bookmarks: B, folders: F, events: EventBus) -> Self {
        Self {
            bookmarks,
            folders,
            events,
        }
    }

    /// Moves an active bookmark into `folder_uuid`, detaching it from any
    /// previous folder.
    pub fn assign(
        &self,
        bookmark_uuid: BookmarkId,
        folder_uuid: FolderId,
    ) -> StoreResult<AssignOutcome> {
        let previous_folder = self.bookmarks.set_folder(bookmark_uuid, Some(folder_uuid))?;
        if previous_folder == Some(folder_uuid) {
            return Ok(AssignOutcome::Unchanged);
        }

        info!(
            "event=bookmark_assign module=assignment status=ok bookmark_uuid={} folder_uuid={} moved={}",
            bookmark_uuid,
            folder_uuid,
            previous_folder.is_some()
        );
        self.events.publish(StoreEvent::BookmarkAssigned {
            bookmark_uuid,
            folder_uuid,
            previous_folder,
        });
        Ok(AssignOutcome::Assigned { previous_folder })
    }

    /// Clears the folder of an active bookmark. No-op when already unfiled.
    pub fn unassign(&self, bookmark_uuid: BookmarkId) -> StoreResult<()> {
        if let Some(previous_folder) = self.bookmarks.set_folder(bookmark_uuid, None)? {
            info!(
                "event=bookmark_unassign module=assignment status=ok bookmark_uuid={bookmark_uuid}"
            );
            self.events.publish(StoreEvent::BookmarkUnassigned {
                bookmark_uuid,
                previous_folder,
            });
        }
        Ok(())
    }

    /// Assigns the dropped bookmark to `folder_uuid`.
    ///
    /// Resolution failures are logged and reported as `Ignored`; only
    /// persistence failures are returned as errors.
    pub fn handle_drop(
        &self,
        token: &DropToken,
        folder_uuid: FolderId,
    ) -> StoreResult<DropOutcome> {
        let Some(bookmark) = self.resolve_drop(token)? else {
            warn!(
                "event=bookmark_drop module=assignment status=skipped reason=bookmark_not_found folder_uuid={folder_uuid}"
            );
            return Ok(DropOutcome::Ignored(DropIgnoredReason::BookmarkNotFound));
        };

        match self.assign(bookmark.uuid, folder_uuid) {
            Ok(AssignOutcome::Assigned { previous_folder }) => Ok(DropOutcome::Assigned {
                bookmark_uuid: bookmark.uuid,
                previous_folder,
            }),
            Ok(AssignOutcome::Unchanged) => Ok(DropOutcome::Unchanged {
                bookmark_uuid: bookmark.uuid,
            }),
            Err(StoreError::FolderNotFound(_)) => {
                warn!(
                    "event=bookmark_drop module=assignment status=skipped reason=folder_not_found bookmark_uuid={} folder_uuid={folder_uuid}",
                    bookmark.uuid
                );
                Ok(DropOutcome::Ignored(DropIgnoredReason::FolderNotFound))
            }
            Err(StoreError::BookmarkNotFound(_)) => {
                warn!(
                    "event=bookmark_drop module=assignment status=skipped reason=bookmark_vanished bookmark_uuid={}",
                    bookmark.uuid
                );
                Ok(DropOutcome::Ignored(DropIgnoredReason::BookmarkNotFound))
            }
            Err(other) => Err(other),
        }
    }

    /// Soft-deletes every member of `folder_uuid` and clears their folder.
    ///
    /// Returns the ids of the cascaded bookmarks.
    pub fn cascade_soft_delete(&self, folder_uuid: FolderId) -> StoreResult<Vec<BookmarkId>> {
        let cascaded = self
            .bookmarks
            .soft_delete_folder_members(folder_uuid, now_epoch_ms())?;
        info!(
            "event=folder_cascade module=assignment status=ok folder_uuid={} cascaded={}",
            folder_uuid,
            cascaded.len()
        );
        if !cascaded.is_empty() {
            self.events.publish(StoreEvent::FolderMembersSoftDeleted {
                folder_uuid,
                cascaded: cascaded.clone(),
            });
        }
        Ok(cascaded)
    }

    /// Lists the active members of one folder, sorted by title.
    pub fn members(&self, folder_uuid: FolderId) -> StoreResult<Vec<Bookmark>> {
        if self.folders.get_folder(folder_uuid)?.is_none() {
            return Err(StoreError::FolderNotFound(folder_uuid));
        }
        self.bookmarks
            .list_active(BookmarkFilter::Folder(folder_uuid))
            .map_err(Into::into)
    }

    fn resolve_drop(&self, token: &DropToken) -> StoreResult<Option<Bookmark>> {
        let resolved = match token {
            DropToken::Bookmark(id) => self.bookmarks.get_bookmark(*id)?.filter(Bookmark::is_active),
            DropToken::Url(url) => self.bookmarks.find_active_match(None, url.trim())?,
        };
        Ok(resolved)
    }
}
