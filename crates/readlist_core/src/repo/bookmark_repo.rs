//! Bookmark repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist bookmark records and their single folder association.
//! - Keep active/removed visibility rules inside the repository boundary.
//!
//! # Invariants
//! - Active listing is deterministic: `title NOCASE ASC, bookmark_uuid ASC`.
//! - `folder_uuid` is only ever written to a folder that exists.
//! - Soft-deleted rows never keep a `folder_uuid`.

use crate::model::bookmark::{Bookmark, BookmarkId};
use crate::model::folder::FolderId;
use crate::model::validation::ValidationError;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sqlite_support::{ensure_schema_ready, parse_flag, parse_uuid};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const BOOKMARK_SELECT_SQL: &str = "SELECT
    bookmark_uuid,
    content_id,
    url,
    title,
    author,
    vote_count,
    comment_count,
    date_saved,
    folder_uuid,
    is_removed,
    removed_at
FROM bookmarks";

const BOOKMARK_COLUMNS: &[&str] = &[
    "bookmark_uuid",
    "content_id",
    "url",
    "title",
    "author",
    "vote_count",
    "comment_count",
    "date_saved",
    "folder_uuid",
    "is_removed",
    "removed_at",
];

/// Folder restriction for active bookmark listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookmarkFilter {
    /// Every active bookmark.
    #[default]
    All,
    /// Active bookmarks without a folder.
    Unfiled,
    /// Active bookmarks in one folder.
    Folder(FolderId),
}

/// Repository interface for bookmark persistence.
pub trait BookmarkRepository {
    /// Inserts one new bookmark row.
    fn insert_bookmark(&self, bookmark: &Bookmark) -> RepoResult<()>;
    /// Loads one bookmark regardless of removed state.
    fn get_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>>;
    /// Finds the active bookmark matching content id OR url.
    fn find_active_match(&self, content_id: Option<&str>, url: &str)
        -> RepoResult<Option<Bookmark>>;
    /// Hard-deletes one bookmark and returns the erased record.
    fn delete_bookmark(&self, id: BookmarkId) -> RepoResult<Bookmark>;
    /// Hard-deletes every active bookmark matching content id OR url.
    ///
    /// Returns the erased records, content id match first.
    fn delete_active_matches(&self, content_id: Option<&str>, url: &str)
        -> RepoResult<Vec<Bookmark>>;
    /// Lists active bookmarks restricted by `filter`.
    fn list_active(&self, filter: BookmarkFilter) -> RepoResult<Vec<Bookmark>>;
    /// Lists soft-deleted bookmarks, most recently removed first.
    fn list_removed(&self) -> RepoResult<Vec<Bookmark>>;
    /// Clears the removed flag. Returns `false` when already active.
    fn restore_bookmark(&self, id: BookmarkId) -> RepoResult<bool>;
    /// Points an active bookmark at `folder_uuid` and returns the previous folder.
    fn set_folder(
        &self,
        id: BookmarkId,
        folder_uuid: Option<FolderId>,
    ) -> RepoResult<Option<FolderId>>;
    /// Soft-deletes every member of one existing folder.
    fn soft_delete_folder_members(
        &self,
        folder_uuid: FolderId,
        removed_at: i64,
    ) -> RepoResult<Vec<BookmarkId>>;
    /// Lists removed bookmarks whose retention anchor is older than `cutoff`.
    fn list_purge_candidates(&self, cutoff: i64) -> RepoResult<Vec<BookmarkId>>;
}

/// SQLite-backed bookmark repository.
pub struct SqliteBookmarkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookmarkRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "bookmarks", BOOKMARK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl BookmarkRepository for SqliteBookmarkRepository<'_> {
    fn insert_bookmark(&self, bookmark: &Bookmark) -> RepoResult<()> {
        bookmark.validate()?;

        self.conn.execute(
            "INSERT INTO bookmarks (
                bookmark_uuid,
                content_id,
                url,
                title,
                author,
                vote_count,
                comment_count,
                date_saved,
                folder_uuid,
                is_removed,
                removed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                bookmark.uuid.to_string(),
                bookmark.content_id.as_deref(),
                bookmark.url.as_str(),
                bookmark.title.as_str(),
                bookmark.author.as_deref(),
                bookmark.vote_count,
                bookmark.comment_count,
                bookmark.date_saved,
                bookmark.folder_uuid.map(|value| value.to_string()),
                i64::from(bookmark.is_removed),
                bookmark.removed_at,
            ],
        )?;
        Ok(())
    }

    fn get_bookmark(&self, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
        load_bookmark(self.conn, id)
    }

    fn find_active_match(
        &self,
        content_id: Option<&str>,
        url: &str,
    ) -> RepoResult<Option<Bookmark>> {
        Ok(load_active_matches(self.conn, content_id, url)?
            .into_iter()
            .next())
    }

    fn delete_bookmark(&self, id: BookmarkId) -> RepoResult<Bookmark> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let bookmark = load_bookmark(&tx, id)?.ok_or(RepoError::BookmarkNotFound(id))?;
        tx.execute(
            "DELETE FROM bookmarks WHERE bookmark_uuid = ?1;",
            [id.to_string()],
        )?;
        tx.commit()?;
        Ok(bookmark)
    }

    fn delete_active_matches(
        &self,
        content_id: Option<&str>,
        url: &str,
    ) -> RepoResult<Vec<Bookmark>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let matches = load_active_matches(&tx, content_id, url)?;
        for bookmark in &matches {
            tx.execute(
                "DELETE FROM bookmarks WHERE bookmark_uuid = ?1;",
                [bookmark.uuid.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(matches)
    }

    fn list_active(&self, filter: BookmarkFilter) -> RepoResult<Vec<Bookmark>> {
        let order_by = "ORDER BY title COLLATE NOCASE ASC, bookmark_uuid ASC";
        let items = match filter {
            BookmarkFilter::All => query_bookmarks(
                self.conn,
                &format!("{BOOKMARK_SELECT_SQL} WHERE is_removed = 0 {order_by};"),
                [],
            )?,
            BookmarkFilter::Unfiled => query_bookmarks(
                self.conn,
                &format!(
                    "{BOOKMARK_SELECT_SQL}
                     WHERE is_removed = 0
                       AND folder_uuid IS NULL
                     {order_by};"
                ),
                [],
            )?,
            BookmarkFilter::Folder(folder_uuid) => query_bookmarks(
                self.conn,
                &format!(
                    "{BOOKMARK_SELECT_SQL}
                     WHERE is_removed = 0
                       AND folder_uuid = ?1
                     {order_by};"
                ),
                [folder_uuid.to_string()],
            )?,
        };
        Ok(items)
    }

    fn list_removed(&self) -> RepoResult<Vec<Bookmark>> {
        query_bookmarks(
            self.conn,
            &format!(
                "{BOOKMARK_SELECT_SQL}
                 WHERE is_removed = 1
                 ORDER BY COALESCE(removed_at, date_saved) DESC,
                          title COLLATE NOCASE ASC,
                          bookmark_uuid ASC;"
            ),
            [],
        )
    }

    fn restore_bookmark(&self, id: BookmarkId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut bookmark = load_bookmark(&tx, id)?.ok_or(RepoError::BookmarkNotFound(id))?;
        if bookmark.is_active() {
            return Ok(false);
        }

        if let Some(conflict) =
            load_active_matches(&tx, bookmark.content_id.as_deref(), &bookmark.url)?
                .into_iter()
                .next()
        {
            return Err(ValidationError::ActiveDuplicate {
                bookmark_uuid: conflict.uuid,
            }
            .into());
        }

        bookmark.restore();
        tx.execute(
            "UPDATE bookmarks
             SET is_removed = ?2,
                 removed_at = ?3
             WHERE bookmark_uuid = ?1;",
            params![
                id.to_string(),
                i64::from(bookmark.is_removed),
                bookmark.removed_at
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn set_folder(
        &self,
        id: BookmarkId,
        folder_uuid: Option<FolderId>,
    ) -> RepoResult<Option<FolderId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let bookmark = load_bookmark(&tx, id)?
            .filter(Bookmark::is_active)
            .ok_or(RepoError::BookmarkNotFound(id))?;

        if let Some(folder_uuid) = folder_uuid {
            ensure_folder_exists(&tx, folder_uuid)?;
        }

        let previous = bookmark.folder_uuid;
        if previous == folder_uuid {
            return Ok(previous);
        }

        tx.execute(
            "UPDATE bookmarks
             SET folder_uuid = ?2
             WHERE bookmark_uuid = ?1
               AND is_removed = 0;",
            params![id.to_string(), folder_uuid.map(|value| value.to_string())],
        )?;
        tx.commit()?;
        Ok(previous)
    }

    fn soft_delete_folder_members(
        &self,
        folder_uuid: FolderId,
        removed_at: i64,
    ) -> RepoResult<Vec<BookmarkId>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_folder_exists(&tx, folder_uuid)?;
        let ids = soft_delete_members(&tx, folder_uuid, removed_at)?;
        tx.commit()?;
        Ok(ids)
    }

    fn list_purge_candidates(&self, cutoff: i64) -> RepoResult<Vec<BookmarkId>> {
        let mut stmt = self.conn.prepare(
            "SELECT bookmark_uuid
             FROM bookmarks
             WHERE is_removed = 1
               AND COALESCE(removed_at, date_saved) < ?1
             ORDER BY bookmark_uuid ASC;",
        )?;
        let mut rows = stmt.query([cutoff])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "bookmarks.bookmark_uuid")?);
        }
        Ok(ids)
    }
}

/// Marks every member of `folder_uuid` removed and detaches it.
///
/// Callers own the surrounding transaction; the folder delete path runs this
/// in the same transaction that erases the folder row.
pub(crate) fn soft_delete_members(
    conn: &Connection,
    folder_uuid: FolderId,
    removed_at: i64,
) -> RepoResult<Vec<BookmarkId>> {
    let mut ids = Vec::new();
    {
        let mut stmt = conn.prepare(
            "SELECT bookmark_uuid
             FROM bookmarks
             WHERE folder_uuid = ?1
             ORDER BY bookmark_uuid ASC;",
        )?;
        let mut rows = stmt.query([folder_uuid.to_string()])?;
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "bookmarks.bookmark_uuid")?);
        }
    }

    conn.execute(
        "UPDATE bookmarks
         SET is_removed = 1,
             removed_at = ?2,
             folder_uuid = NULL
         WHERE folder_uuid = ?1;",
        params![folder_uuid.to_string(), removed_at],
    )?;
    Ok(ids)
}

fn ensure_folder_exists(conn: &Connection, folder_uuid: FolderId) -> RepoResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM folders WHERE folder_uuid = ?1;",
            [folder_uuid.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::FolderNotFound(folder_uuid)),
    }
}

/// Active rows sharing the content id or the url. At most two, since each
/// column is unique within the active set.
fn load_active_matches(
    conn: &Connection,
    content_id: Option<&str>,
    url: &str,
) -> RepoResult<Vec<Bookmark>> {
    query_bookmarks(
        conn,
        &format!(
            "{BOOKMARK_SELECT_SQL}
             WHERE is_removed = 0
               AND (url = ?1 OR (?2 IS NOT NULL AND content_id = ?2))
             ORDER BY CASE WHEN content_id = ?2 THEN 0 ELSE 1 END, bookmark_uuid ASC;"
        ),
        params![url, content_id],
    )
}

fn load_bookmark(conn: &Connection, id: BookmarkId) -> RepoResult<Option<Bookmark>> {
    let mut stmt = conn.prepare(&format!("{BOOKMARK_SELECT_SQL} WHERE bookmark_uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_bookmark_row(row)?));
    }
    Ok(None)
}

fn query_bookmarks<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Vec<Bookmark>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_bookmark_row(row)?);
    }
    Ok(items)
}

fn parse_bookmark_row(row: &Row<'_>) -> RepoResult<Bookmark> {
    let uuid_text: String = row.get("bookmark_uuid")?;
    let uuid = parse_uuid(&uuid_text, "bookmarks.bookmark_uuid")?;

    let folder_uuid = row
        .get::<_, Option<String>>("folder_uuid")?
        .map(|value| parse_uuid(&value, "bookmarks.folder_uuid"))
        .transpose()?;
    let is_removed = parse_flag(row.get("is_removed")?, "bookmarks.is_removed")?;
    if is_removed && folder_uuid.is_some() {
        return Err(RepoError::InvalidData(format!(
            "removed bookmark {uuid} still references a folder"
        )));
    }

    let bookmark = Bookmark {
        uuid,
        content_id: row.get("content_id")?,
        url: row.get("url")?,
        title: row.get("title")?,
        author: row.get("author")?,
        vote_count: row.get("vote_count")?,
        comment_count: row.get("comment_count")?,
        date_saved: row.get("date_saved")?,
        folder_uuid,
        is_removed,
        removed_at: row.get("removed_at")?,
    };
    bookmark.validate()?;
    Ok(bookmark)
}
