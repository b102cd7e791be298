//! Core domain logic for the reading list.
//! This crate is the single source of truth for bookmark and folder invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, LoggingConfig, StoreConfig};
pub use events::{EventBus, StoreEvent, SubscriptionId};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bookmark::{Bookmark, BookmarkId};
pub use model::folder::{Folder, FolderId, FolderSummary};
pub use model::post::Post;
pub use model::validation::ValidationError;
pub use repo::bookmark_repo::{BookmarkFilter, BookmarkRepository, SqliteBookmarkRepository};
pub use repo::folder_repo::{FolderRepository, SqliteFolderRepository};
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::{
    AssignOutcome, AssignmentService, DropIgnoredReason, DropOutcome, DropToken,
};
pub use service::bookmark_service::{BookmarkService, ToggleOutcome};
pub use service::error::{StoreError, StoreResult};
pub use service::folder_service::FolderService;
pub use service::retention::{RetentionSweeper, SweepReport, RETENTION_WINDOW_DAYS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
