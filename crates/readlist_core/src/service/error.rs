//! Caller-facing error taxonomy for store operations.

use crate::model::bookmark::BookmarkId;
use crate::model::folder::FolderId;
use crate::model::validation::ValidationError;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by folder, bookmark and assignment services.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected (blank name, malformed reorder set, ...).
    Validation(ValidationError),
    FolderNotFound(FolderId),
    BookmarkNotFound(BookmarkId),
    /// Underlying store read/write failure.
    Persistence(RepoError),
}

impl StoreError {
    /// Returns whether this is one of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FolderNotFound(_) | Self::BookmarkNotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::FolderNotFound(id) => write!(f, "folder not found: {id}"),
            Self::BookmarkNotFound(id) => write!(f, "bookmark not found: {id}"),
            Self::Persistence(err) => write!(f, "store failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::FolderNotFound(id) => Self::FolderNotFound(id),
            RepoError::BookmarkNotFound(id) => Self::BookmarkNotFound(id),
            other => Self::Persistence(other),
        }
    }
}
