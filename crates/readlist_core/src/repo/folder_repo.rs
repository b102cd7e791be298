//! Folder repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the ordered folder set.
//! - Keep dense `sort_order` renumbering inside the repository boundary.
//!
//! # Invariants
//! - Listing is deterministic: `sort_order ASC, name ASC, folder_uuid ASC`.
//! - After every committed mutation `sort_order` values are exactly `0..N`.
//! - Deleting a folder soft-deletes its members in the same transaction.

use crate::model::bookmark::BookmarkId;
use crate::model::folder::{Folder, FolderId, FolderSummary};
use crate::model::validation::ValidationError;
use crate::repo::bookmark_repo::soft_delete_members;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite_support::{ensure_schema_ready, parse_uuid};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashSet;
use uuid::Uuid;

const FOLDER_SELECT_SQL: &str = "SELECT
    folder_uuid,
    name,
    sort_order,
    created_at,
    updated_at
FROM folders";

const FOLDER_ORDER_BY: &str = "ORDER BY sort_order ASC, name ASC, folder_uuid ASC";

/// Repository interface for folder persistence.
pub trait FolderRepository {
    /// Creates one folder at the trailing position.
    fn create_folder(&self, name: &str) -> RepoResult<Folder>;
    /// Loads one folder by id.
    fn get_folder(&self, folder_uuid: FolderId) -> RepoResult<Option<Folder>>;
    /// Lists all folders in display order.
    fn list_folders(&self) -> RepoResult<Vec<Folder>>;
    /// Lists all folders in display order with active member counts.
    fn list_folder_summaries(&self) -> RepoResult<Vec<FolderSummary>>;
    /// Renames one folder.
    fn rename_folder(&self, folder_uuid: FolderId, name: &str) -> RepoResult<()>;
    /// Rewrites `sort_order` from a full permutation of folder ids.
    ///
    /// Returns `false` when the permutation matches the stored order.
    fn reorder_folders(&self, ordered: &[FolderId]) -> RepoResult<bool>;
    /// Deletes one folder, cascading members to soft-deleted.
    ///
    /// Returns the ids of the bookmarks that were cascaded.
    fn delete_folder(&self, folder_uuid: FolderId, removed_at: i64)
        -> RepoResult<Vec<BookmarkId>>;
}

/// SQLite-backed folder repository.
pub struct SqliteFolderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFolderRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(
            conn,
            "folders",
            &["folder_uuid", "name", "sort_order", "created_at", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl FolderRepository for SqliteFolderRepository<'_> {
    fn create_folder(&self, name: &str) -> RepoResult<Folder> {
        let folder_uuid = Uuid::new_v4();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let sort_order: i64 = tx.query_row("SELECT COUNT(*) FROM folders;", [], |row| row.get(0))?;
        tx.execute(
            "INSERT INTO folders (folder_uuid, name, sort_order) VALUES (?1, ?2, ?3);",
            params![folder_uuid.to_string(), name, sort_order],
        )?;
        let folder = load_folder(&tx, folder_uuid)?.ok_or(RepoError::FolderNotFound(folder_uuid))?;
        tx.commit()?;
        Ok(folder)
    }

    fn get_folder(&self, folder_uuid: FolderId) -> RepoResult<Option<Folder>> {
        load_folder(self.conn, folder_uuid)
    }

    fn list_folders(&self) -> RepoResult<Vec<Folder>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FOLDER_SELECT_SQL} {FOLDER_ORDER_BY};"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_folder_row(row)?);
        }
        Ok(items)
    }

    fn list_folder_summaries(&self) -> RepoResult<Vec<FolderSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                f.folder_uuid AS folder_uuid,
                f.name AS name,
                f.sort_order AS sort_order,
                f.created_at AS created_at,
                f.updated_at AS updated_at,
                (
                    SELECT COUNT(*)
                    FROM bookmarks b
                    WHERE b.folder_uuid = f.folder_uuid
                      AND b.is_removed = 0
                ) AS bookmark_count
             FROM folders f
             ORDER BY f.sort_order ASC, f.name ASC, f.folder_uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(FolderSummary {
                folder: parse_folder_row(row)?,
                bookmark_count: row.get("bookmark_count")?,
            });
        }
        Ok(items)
    }

    fn rename_folder(&self, folder_uuid: FolderId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE folders
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE folder_uuid = ?1;",
            params![folder_uuid.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::FolderNotFound(folder_uuid));
        }
        Ok(())
    }

    fn reorder_folders(&self, ordered: &[FolderId]) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existing = list_folder_ids(&tx)?;

        let existing_set: HashSet<FolderId> = existing.iter().copied().collect();
        let provided_set: HashSet<FolderId> = ordered.iter().copied().collect();
        if ordered.len() != existing.len()
            || provided_set.len() != ordered.len()
            || provided_set != existing_set
        {
            return Err(ValidationError::ReorderSetMismatch {
                expected: existing.len(),
                provided: ordered.len(),
            }
            .into());
        }

        let changed = write_dense_order(&tx, ordered)?;
        tx.commit()?;
        Ok(changed > 0)
    }

    fn delete_folder(
        &self,
        folder_uuid: FolderId,
        removed_at: i64,
    ) -> RepoResult<Vec<BookmarkId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_folder(&tx, folder_uuid)?.is_none() {
            return Err(RepoError::FolderNotFound(folder_uuid));
        }

        let cascaded = soft_delete_members(&tx, folder_uuid, removed_at)?;
        tx.execute(
            "DELETE FROM folders WHERE folder_uuid = ?1;",
            [folder_uuid.to_string()],
        )?;

        let remaining = list_folder_ids(&tx)?;
        write_dense_order(&tx, &remaining)?;

        tx.commit()?;
        Ok(cascaded)
    }
}

fn load_folder(conn: &Connection, folder_uuid: FolderId) -> RepoResult<Option<Folder>> {
    let mut stmt = conn.prepare(&format!("{FOLDER_SELECT_SQL} WHERE folder_uuid = ?1;"))?;
    let mut rows = stmt.query([folder_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_folder_row(row)?));
    }
    Ok(None)
}

fn list_folder_ids(conn: &Connection) -> RepoResult<Vec<FolderId>> {
    let mut stmt = conn.prepare(&format!("SELECT folder_uuid FROM folders {FOLDER_ORDER_BY};"))?;
    let mut rows = stmt.query([])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "folders.folder_uuid")?);
    }
    Ok(ids)
}

/// Assigns `sort_order = index` for every id, touching only rows that change.
///
/// Returns the number of rewritten rows.
fn write_dense_order(conn: &Connection, ordered: &[FolderId]) -> RepoResult<usize> {
    let mut changed = 0;
    for (index, folder_uuid) in ordered.iter().enumerate() {
        changed += conn.execute(
            "UPDATE folders
             SET sort_order = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE folder_uuid = ?1
               AND sort_order <> ?2;",
            params![folder_uuid.to_string(), index as i64],
        )?;
    }
    Ok(changed)
}

fn parse_folder_row(row: &Row<'_>) -> RepoResult<Folder> {
    let uuid_text: String = row.get("folder_uuid")?;
    let sort_order: i64 = row.get("sort_order")?;
    if sort_order < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative sort_order `{sort_order}` in folders.sort_order"
        )));
    }

    Ok(Folder {
        uuid: parse_uuid(&uuid_text, "folders.folder_uuid")?,
        name: row.get("name")?,
        sort_order,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
