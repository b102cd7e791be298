//! Folder registry use-case service.
//!
//! # Responsibility
//! - Validate folder names and order requests above the repository layer.
//! - Provide create, rename, delete, reorder, move and list operations.
//!
//! # Invariants
//! - Folder names are trimmed and non-empty.
//! - Folder `sort_order` is dense and zero-based after every call returns.
//! - Deleting a folder never leaves a bookmark pointing at it.

use crate::clock::now_epoch_ms;
use crate::events::{EventBus, StoreEvent};
use crate::model::bookmark::BookmarkId;
use crate::model::folder::{normalize_folder_name, Folder, FolderId, FolderSummary};
use crate::model::validation::ValidationError;
use crate::repo::folder_repo::FolderRepository;
use crate::service::error::{StoreError, StoreResult};
use log::{debug, info};
use std::collections::BTreeSet;

/// Folder registry facade.
pub struct FolderService<R: FolderRepository> {
    repo: R,
    events: EventBus,
}

impl<R: FolderRepository> FolderService<R> {
    /// Creates service from repository implementation and event hub.
    pub fn new(repo: R, events: EventBus) -> Self {
        Self { repo, events }
    }

    /// Creates one folder at the end of the list.
    pub fn create_folder(&self, name: impl Into<String>) -> StoreResult<Folder> {
        let normalized = normalize_folder_name(&name.into())?;
        let folder = self.repo.create_folder(normalized.as_str())?;
        info!(
            "event=folder_create module=folder status=ok folder_uuid={} sort_order={}",
            folder.uuid, folder.sort_order
        );
        self.events.publish(StoreEvent::FolderCreated {
            folder_uuid: folder.uuid,
        });
        Ok(folder)
    }

    /// Renames one folder in place.
    pub fn rename_folder(
        &self,
        folder_uuid: FolderId,
        name: impl Into<String>,
    ) -> StoreResult<()> {
        let normalized = normalize_folder_name(&name.into())?;
        self.repo.rename_folder(folder_uuid, normalized.as_str())?;
        self.events.publish(StoreEvent::FolderRenamed { folder_uuid });
        Ok(())
    }

    /// Deletes one folder; its members move to "Recently Deleted".
    ///
    /// Returns the ids of the cascaded bookmarks.
    pub fn delete_folder(&self, folder_uuid: FolderId) -> StoreResult<Vec<BookmarkId>> {
        let cascaded = self.repo.delete_folder(folder_uuid, now_epoch_ms())?;
        info!(
            "event=folder_delete module=folder status=ok folder_uuid={} cascaded={}",
            folder_uuid,
            cascaded.len()
        );
        self.events.publish(StoreEvent::FolderDeleted {
            folder_uuid,
            cascaded: cascaded.clone(),
        });
        Ok(cascaded)
    }

    /// Applies a full permutation of folder ids as the new display order.
    ///
    /// Re-applying the stored order writes nothing and publishes no event.
    pub fn reorder_folders(&self, ordered: &[FolderId]) -> StoreResult<()> {
        if !self.repo.reorder_folders(ordered)? {
            debug!(
                "event=folder_reorder module=folder status=skipped reason=unchanged count={}",
                ordered.len()
            );
            return Ok(());
        }
        info!(
            "event=folder_reorder module=folder status=ok count={}",
            ordered.len()
        );
        self.events.publish(StoreEvent::FoldersReordered);
        Ok(())
    }

    /// Moves the folders at `sources` so they land before `destination`.
    ///
    /// Offsets address the current display order. `destination` may equal the
    /// folder count to move to the end.
    pub fn move_folders(&self, sources: &[usize], destination: usize) -> StoreResult<()> {
        let current: Vec<FolderId> = self
            .repo
            .list_folders()?
            .into_iter()
            .map(|folder| folder.uuid)
            .collect();
        let reordered = apply_move(&current, sources, destination)?;
        if reordered == current {
            return Ok(());
        }
        self.reorder_folders(&reordered)
    }

    /// Loads one folder.
    pub fn get_folder(&self, folder_uuid: FolderId) -> StoreResult<Folder> {
        self.repo
            .get_folder(folder_uuid)?
            .ok_or(StoreError::FolderNotFound(folder_uuid))
    }

    /// Lists folders sorted by `(sort_order, name)`.
    pub fn list_folders(&self) -> StoreResult<Vec<Folder>> {
        self.repo.list_folders().map_err(Into::into)
    }

    /// Lists folders with their active member counts.
    pub fn list_folder_summaries(&self) -> StoreResult<Vec<FolderSummary>> {
        self.repo.list_folder_summaries().map_err(Into::into)
    }

    /// Filters folders by case-insensitive name substring.
    pub fn search_folders(&self, text: &str) -> StoreResult<Vec<Folder>> {
        let needle = text.trim().to_lowercase();
        let folders = self.repo.list_folders()?;
        if needle.is_empty() {
            return Ok(folders);
        }
        Ok(folders
            .into_iter()
            .filter(|folder| folder.name.to_lowercase().contains(&needle))
            .collect())
    }
}

/// List-move arithmetic: removes `sources` and reinserts them, in their
/// original relative order, before the element that was at `destination`.
pub fn apply_move<T: Copy>(
    items: &[T],
    sources: &[usize],
    destination: usize,
) -> Result<Vec<T>, ValidationError> {
    let len = items.len();
    if destination > len {
        return Err(ValidationError::MoveDestinationOutOfRange { destination, len });
    }

    let offsets: BTreeSet<usize> = sources.iter().copied().collect();
    if let Some(&offset) = offsets.iter().find(|&&offset| offset >= len) {
        return Err(ValidationError::MoveOffsetOutOfRange { offset, len });
    }

    let moved: Vec<T> = offsets.iter().map(|&offset| items[offset]).collect();
    let mut remaining: Vec<T> = items
        .iter()
        .enumerate()
        .filter(|(index, _)| !offsets.contains(index))
        .map(|(_, item)| *item)
        .collect();

    let insert_at = destination - offsets.range(..destination).count();
    let tail = remaining.split_off(insert_at);
    remaining.extend(moved);
    remaining.extend(tail);
    Ok(remaining)
}
