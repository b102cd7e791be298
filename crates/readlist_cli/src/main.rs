//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `readlist_core` linkage and open a reading-list database.
//! - Run one retention sweep and print deterministic counts.
//!
//! Usage: `readlist_cli [config.json]`

use readlist_core::{
    init_logging, BookmarkFilter, BookmarkService, EventBus, FolderService, RetentionSweeper,
    SqliteBookmarkRepository, SqliteFolderRepository, StoreConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("readlist_core ping={}", readlist_core::ping());
    println!("readlist_core version={}", readlist_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("readlist_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::from_file(&path).map_err(|err| err.to_string())?,
        None => StoreConfig::default(),
    };

    if config.logging.log_dir.is_some() {
        init_logging(&config.logging)?;
    }

    let conn = readlist_core::db::open_db(&config.database_path).map_err(|err| err.to_string())?;
    let events = EventBus::new();

    let sweeper = RetentionSweeper::new(
        SqliteBookmarkRepository::try_new(&conn).map_err(|err| err.to_string())?,
        events.clone(),
    );
    let report = sweeper.sweep_now().map_err(|err| err.to_string())?;
    log::info!(
        "event=cli_sweep module=cli status=ok purged={} skipped={} failed={}",
        report.purged,
        report.skipped,
        report.failed
    );

    let folders = FolderService::new(
        SqliteFolderRepository::try_new(&conn).map_err(|err| err.to_string())?,
        events.clone(),
    );
    let bookmarks = BookmarkService::new(
        SqliteBookmarkRepository::try_new(&conn).map_err(|err| err.to_string())?,
        events,
    );
    let folder_count = folders.list_folders().map_err(|err| err.to_string())?.len();
    let active_count = bookmarks
        .list_active(BookmarkFilter::All)
        .map_err(|err| err.to_string())?
        .len();
    let removed_count = bookmarks
        .list_removed(None)
        .map_err(|err| err.to_string())?
        .len();

    println!("readlist database={}", config.database_path.display());
    println!("readlist folders={folder_count}");
    println!("readlist bookmarks_active={active_count}");
    println!("readlist bookmarks_removed={removed_count}");
    println!("readlist sweep_purged={}", report.purged);
    Ok(())
}
