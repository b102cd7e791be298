use readlist_core::db::open_db_in_memory;
use readlist_core::{
    Bookmark, BookmarkFilter, BookmarkRepository, EventBus, FolderId, FolderService, Post,
    SqliteBookmarkRepository, SqliteFolderRepository, StoreError, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn folder_service(conn: &Connection) -> FolderService<SqliteFolderRepository<'_>> {
    FolderService::new(SqliteFolderRepository::try_new(conn).unwrap(), EventBus::new())
}

fn names(service: &FolderService<SqliteFolderRepository<'_>>) -> Vec<String> {
    service
        .list_folders()
        .unwrap()
        .into_iter()
        .map(|folder| folder.name)
        .collect()
}

fn orders(service: &FolderService<SqliteFolderRepository<'_>>) -> Vec<i64> {
    service
        .list_folders()
        .unwrap()
        .into_iter()
        .map(|folder| folder.sort_order)
        .collect()
}

#[test]
fn create_appends_with_dense_order() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);

    let first = service.create_folder("Rust").unwrap();
    let second = service.create_folder("  Go ").unwrap();
    let third = service.create_folder("Zig").unwrap();

    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);
    assert_eq!(second.name, "Go");
    assert_eq!(third.sort_order, 2);
    assert_eq!(names(&service), vec!["Rust", "Go", "Zig"]);
    assert_eq!(orders(&service), vec![0, 1, 2]);
}

#[test]
fn create_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);

    let err = service.create_folder(" \n ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyFolderName)
    ));
    assert!(service.list_folders().unwrap().is_empty());
}

#[test]
fn rename_keeps_position_and_rejects_missing_folder() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    service.create_folder("A").unwrap();
    let b = service.create_folder("B").unwrap();

    service.rename_folder(b.uuid, " Bravo ").unwrap();
    let renamed = service.get_folder(b.uuid).unwrap();
    assert_eq!(renamed.name, "Bravo");
    assert_eq!(renamed.sort_order, 1);

    let err = service.rename_folder(b.uuid, "  ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyFolderName)
    ));

    let missing = Uuid::new_v4();
    let err = service.rename_folder(missing, "Other").unwrap_err();
    assert!(matches!(err, StoreError::FolderNotFound(id) if id == missing));
    assert!(service.get_folder(missing).unwrap_err().is_not_found());
}

#[test]
fn reorder_applies_permutation() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    let a = service.create_folder("A").unwrap();
    let b = service.create_folder("B").unwrap();
    let c = service.create_folder("C").unwrap();

    service.reorder_folders(&[c.uuid, a.uuid, b.uuid]).unwrap();

    assert_eq!(names(&service), vec!["C", "A", "B"]);
    assert_eq!(orders(&service), vec![0, 1, 2]);
}

#[test]
fn reorder_rejects_partial_duplicate_or_foreign_sets() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    let a = service.create_folder("A").unwrap();
    let b = service.create_folder("B").unwrap();

    let attempts: Vec<Vec<FolderId>> = vec![
        vec![a.uuid],
        vec![a.uuid, a.uuid],
        vec![a.uuid, Uuid::new_v4()],
        vec![a.uuid, b.uuid, Uuid::new_v4()],
    ];
    for ordered in attempts {
        let err = service.reorder_folders(&ordered).unwrap_err();
        assert!(
            matches!(
                err,
                StoreError::Validation(ValidationError::ReorderSetMismatch { expected: 2, .. })
            ),
            "unexpected error for {ordered:?}: {err}"
        );
    }
    assert_eq!(names(&service), vec!["A", "B"]);
}

#[test]
fn move_folders_follows_list_move_semantics() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    for name in ["A", "B", "C", "D"] {
        service.create_folder(name).unwrap();
    }

    service.move_folders(&[0], 4).unwrap();
    assert_eq!(names(&service), vec!["B", "C", "D", "A"]);

    service.move_folders(&[2, 3], 0).unwrap();
    assert_eq!(names(&service), vec!["D", "A", "B", "C"]);
    assert_eq!(orders(&service), vec![0, 1, 2, 3]);

    let err = service.move_folders(&[4], 0).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MoveOffsetOutOfRange { offset: 4, len: 4 })
    ));
    let err = service.move_folders(&[0], 5).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MoveDestinationOutOfRange { .. })
    ));
    assert_eq!(names(&service), vec!["D", "A", "B", "C"]);
}

#[test]
fn delete_renumbers_remaining_folders() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    service.create_folder("A").unwrap();
    let b = service.create_folder("B").unwrap();
    service.create_folder("C").unwrap();

    let cascaded = service.delete_folder(b.uuid).unwrap();

    assert!(cascaded.is_empty());
    assert_eq!(names(&service), vec!["A", "C"]);
    assert_eq!(orders(&service), vec![0, 1]);

    let next = service.create_folder("D").unwrap();
    assert_eq!(next.sort_order, 2);

    let err = service.delete_folder(b.uuid).unwrap_err();
    assert!(matches!(err, StoreError::FolderNotFound(id) if id == b.uuid));
}

#[test]
fn delete_cascades_members_to_recently_deleted() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    let bookmarks = SqliteBookmarkRepository::try_new(&conn).unwrap();
    let folder = service.create_folder("Later").unwrap();

    let kept = Bookmark::from_post(&Post::new("https://x/kept", "Kept"), 1).unwrap();
    let member =
        Bookmark::from_post(&Post::new("https://x/member", "Member"), 1).unwrap();
    bookmarks.insert_bookmark(&kept).unwrap();
    bookmarks.insert_bookmark(&member).unwrap();
    bookmarks.set_folder(member.uuid, Some(folder.uuid)).unwrap();

    let cascaded = service.delete_folder(folder.uuid).unwrap();

    assert_eq!(cascaded, vec![member.uuid]);
    let stored = bookmarks.get_bookmark(member.uuid).unwrap().unwrap();
    assert!(stored.is_removed);
    assert_eq!(stored.folder_uuid, None);
    assert!(stored.removed_at.is_some());

    let active = bookmarks.list_active(BookmarkFilter::All).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].uuid, kept.uuid);
}

#[test]
fn summaries_count_only_active_members() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    let bookmarks = SqliteBookmarkRepository::try_new(&conn).unwrap();
    let reading = service.create_folder("Reading").unwrap();
    let empty = service.create_folder("Empty").unwrap();

    for index in 0..3 {
        let bookmark = Bookmark::from_post(
            &Post::new(format!("https://x/{index}"), format!("Post {index}")),
            1,
        )
        .unwrap();
        bookmarks.insert_bookmark(&bookmark).unwrap();
        bookmarks
            .set_folder(bookmark.uuid, Some(reading.uuid))
            .unwrap();
    }

    let summaries = service.list_folder_summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].folder.uuid, reading.uuid);
    assert_eq!(summaries[0].bookmark_count, 3);
    assert_eq!(summaries[1].folder.uuid, empty.uuid);
    assert_eq!(summaries[1].bookmark_count, 0);
}

#[test]
fn search_matches_name_substring_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let service = folder_service(&conn);
    service.create_folder("Rust Async").unwrap();
    service.create_folder("Databases").unwrap();
    service.create_folder("rustdoc").unwrap();

    let found: Vec<String> = service
        .search_folders(" RUST ")
        .unwrap()
        .into_iter()
        .map(|folder| folder.name)
        .collect();
    assert_eq!(found, vec!["Rust Async", "rustdoc"]);

    assert_eq!(service.search_folders("").unwrap().len(), 3);
    assert!(service.search_folders("golang").unwrap().is_empty());
}
