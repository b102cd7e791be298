use readlist_core::db::open_db_in_memory;
use readlist_core::{
    AssignmentService, BookmarkService, DropToken, EventBus, FolderService, Post,
    RetentionSweeper, SqliteBookmarkRepository, SqliteFolderRepository, StoreEvent,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn recorder(events: &EventBus) -> Arc<Mutex<Vec<StoreEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    events.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    seen
}

fn drain(seen: &Arc<Mutex<Vec<StoreEvent>>>) -> Vec<StoreEvent> {
    std::mem::take(&mut *seen.lock().unwrap())
}

#[test]
fn folder_mutations_publish_one_event_each() {
    let conn = open_db_in_memory().unwrap();
    let events = EventBus::new();
    let seen = recorder(&events);
    let folders = FolderService::new(SqliteFolderRepository::try_new(&conn).unwrap(), events);

    let a = folders.create_folder("A").unwrap();
    let b = folders.create_folder("B").unwrap();
    folders.rename_folder(a.uuid, "Alpha").unwrap();
    folders.move_folders(&[1], 0).unwrap();
    folders.delete_folder(a.uuid).unwrap();

    assert_eq!(
        drain(&seen),
        vec![
            StoreEvent::FolderCreated { folder_uuid: a.uuid },
            StoreEvent::FolderCreated { folder_uuid: b.uuid },
            StoreEvent::FolderRenamed { folder_uuid: a.uuid },
            StoreEvent::FoldersReordered,
            StoreEvent::FolderDeleted {
                folder_uuid: a.uuid,
                cascaded: Vec::new()
            },
        ]
    );
}

#[test]
fn failed_and_noop_calls_publish_nothing() {
    let conn = open_db_in_memory().unwrap();
    let events = EventBus::new();
    let folders = FolderService::new(
        SqliteFolderRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let bookmarks = BookmarkService::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let assignments = AssignmentService::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        SqliteFolderRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let folder = folders.create_folder("Only").unwrap();
    let second = folders.create_folder("Second").unwrap();
    let bookmark = bookmarks
        .toggle_bookmark(&Post::new("https://a/1", "One"))
        .unwrap()
        .bookmark_uuid;
    let seen = recorder(&events);

    assert!(folders.create_folder("  ").is_err());
    assert!(folders.rename_folder(Uuid::new_v4(), "Nope").is_err());
    assert!(folders.reorder_folders(&[]).is_err());
    folders.move_folders(&[0], 0).unwrap();
    folders.reorder_folders(&[folder.uuid, second.uuid]).unwrap();
    assert!(bookmarks.toggle_bookmark(&Post::new("", "Blank")).is_err());
    bookmarks.recover(bookmark).unwrap();
    assignments.unassign(bookmark).unwrap();
    assert!(assignments.assign(bookmark, Uuid::new_v4()).is_err());
    assert!(assignments.cascade_soft_delete(folder.uuid).unwrap().is_empty());
    assignments
        .handle_drop(&DropToken::Bookmark(Uuid::new_v4()), folder.uuid)
        .unwrap();

    assert!(drain(&seen).is_empty());
    let order: Vec<_> = folders
        .list_folders()
        .unwrap()
        .into_iter()
        .map(|folder| folder.uuid)
        .collect();
    assert_eq!(order, vec![folder.uuid, second.uuid]);
}

#[test]
fn toggle_off_publishes_one_delete_per_erased_match() {
    let conn = open_db_in_memory().unwrap();
    let events = EventBus::new();
    let bookmarks = BookmarkService::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let by_url = bookmarks
        .toggle_bookmark(&Post::new("https://a/u", "U").with_content_id("x"))
        .unwrap()
        .bookmark_uuid;
    let by_content = bookmarks
        .toggle_bookmark(&Post::new("https://a/v", "V").with_content_id("y"))
        .unwrap()
        .bookmark_uuid;
    let seen = recorder(&events);

    bookmarks
        .toggle_bookmark(&Post::new("https://a/u", "U").with_content_id("y"))
        .unwrap();

    assert_eq!(
        drain(&seen),
        vec![
            StoreEvent::BookmarkDeleted {
                bookmark_uuid: by_content,
                previous_folder: None
            },
            StoreEvent::BookmarkDeleted {
                bookmark_uuid: by_url,
                previous_folder: None
            },
        ]
    );
}

#[test]
fn bookmark_lifecycle_publishes_events_in_order() {
    let conn = open_db_in_memory().unwrap();
    let events = EventBus::new();
    let folders = FolderService::new(
        SqliteFolderRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let bookmarks = BookmarkService::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let assignments = AssignmentService::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        SqliteFolderRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let sweeper = RetentionSweeper::new(
        SqliteBookmarkRepository::try_new(&conn).unwrap(),
        events.clone(),
    );
    let folder = folders.create_folder("Reading").unwrap();
    let seen = recorder(&events);

    let post = Post::new("https://a/1", "One");
    let id = bookmarks.toggle_bookmark(&post).unwrap().bookmark_uuid;
    assignments.assign(id, folder.uuid).unwrap();
    assignments.unassign(id).unwrap();
    assignments.assign(id, folder.uuid).unwrap();
    let cascaded = assignments.cascade_soft_delete(folder.uuid).unwrap();
    bookmarks.recover(id).unwrap();
    bookmarks.toggle_bookmark(&post).unwrap();

    let second = bookmarks
        .toggle_bookmark(&Post::new("https://a/2", "Two"))
        .unwrap()
        .bookmark_uuid;
    assignments.assign(second, folder.uuid).unwrap();
    assignments.cascade_soft_delete(folder.uuid).unwrap();
    conn.execute(
        "UPDATE bookmarks SET removed_at = 0 WHERE bookmark_uuid = ?1;",
        [second.to_string()],
    )
    .unwrap();
    sweeper.sweep_now().unwrap();

    let published = drain(&seen);
    let names: Vec<&str> = published.iter().map(StoreEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "bookmark_added",
            "bookmark_assigned",
            "bookmark_unassigned",
            "bookmark_assigned",
            "folder_members_soft_deleted",
            "bookmark_recovered",
            "bookmark_deleted",
            "bookmark_added",
            "bookmark_assigned",
            "folder_members_soft_deleted",
            "bookmarks_purged",
        ]
    );
    assert_eq!(cascaded, vec![id]);
}
