//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for folders and bookmarks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Multi-row mutations run inside one immediate transaction.
//! - Repository APIs return semantic errors (`FolderNotFound`,
//!   `BookmarkNotFound`) in addition to DB transport errors.

pub mod bookmark_repo;
pub mod error;
pub mod folder_repo;
mod sqlite_support;

pub use error::{RepoError, RepoResult};
