//! Change notifications for observers of the store.
//!
//! # Responsibility
//! - Let presentation code subscribe to committed mutations.
//! - Deliver one `StoreEvent` per successful, state-changing operation.
//!
//! # Invariants
//! - Events are published only after the transaction commits.
//! - Handlers run outside the subscriber lock, so a handler may subscribe or
//!   unsubscribe without deadlocking.

use crate::model::bookmark::BookmarkId;
use crate::model::folder::FolderId;
use log::debug;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Committed change in folder or bookmark state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    FolderCreated {
        folder_uuid: FolderId,
    },
    FolderRenamed {
        folder_uuid: FolderId,
    },
    /// Folder order changed (reorder or move).
    FoldersReordered,
    FolderDeleted {
        folder_uuid: FolderId,
        cascaded: Vec<BookmarkId>,
    },
    BookmarkAdded {
        bookmark_uuid: BookmarkId,
    },
    /// Bookmark was erased (toggle-off or permanent removal).
    BookmarkDeleted {
        bookmark_uuid: BookmarkId,
        previous_folder: Option<FolderId>,
    },
    BookmarkRecovered {
        bookmark_uuid: BookmarkId,
    },
    BookmarkAssigned {
        bookmark_uuid: BookmarkId,
        folder_uuid: FolderId,
        previous_folder: Option<FolderId>,
    },
    BookmarkUnassigned {
        bookmark_uuid: BookmarkId,
        previous_folder: FolderId,
    },
    /// Members were soft-deleted without removing the folder itself.
    FolderMembersSoftDeleted {
        folder_uuid: FolderId,
        cascaded: Vec<BookmarkId>,
    },
    BookmarksPurged {
        count: usize,
    },
}

impl StoreEvent {
    /// Stable event name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FolderCreated { .. } => "folder_created",
            Self::FolderRenamed { .. } => "folder_renamed",
            Self::FoldersReordered => "folders_reordered",
            Self::FolderDeleted { .. } => "folder_deleted",
            Self::BookmarkAdded { .. } => "bookmark_added",
            Self::BookmarkDeleted { .. } => "bookmark_deleted",
            Self::BookmarkRecovered { .. } => "bookmark_recovered",
            Self::BookmarkAssigned { .. } => "bookmark_assigned",
            Self::BookmarkUnassigned { .. } => "bookmark_unassigned",
            Self::FolderMembersSoftDeleted { .. } => "folder_members_soft_deleted",
            Self::BookmarksPurged { .. } => "bookmarks_purged",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: AtomicU64,
    handlers: RwLock<BTreeMap<SubscriptionId, Handler>>,
}

/// Cloneable publish/subscribe hub. Clones share one subscriber set.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Subscribers>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one handler; handlers are called in subscription order.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        handlers.insert(id, Arc::new(handler));
        id
    }

    /// Removes one handler. Returns `false` when the id is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        handlers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Delivers `event` to every current subscriber.
    pub fn publish(&self, event: StoreEvent) {
        let snapshot: Vec<Handler> = self
            .inner
            .handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect();

        debug!(
            "event=store_change module=events status=ok kind={} subscribers={}",
            event.name(),
            snapshot.len()
        );
        for handler in snapshot {
            handler(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
