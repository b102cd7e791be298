//! Validation failures shared by model, repository and service layers.

use crate::model::bookmark::BookmarkId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input or state rejected before any persistence happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Folder name is blank after trim.
    EmptyFolderName,
    /// Post or bookmark url is blank after trim.
    EmptyUrl,
    /// Reorder request does not name exactly the existing folder set.
    ReorderSetMismatch { expected: usize, provided: usize },
    /// Move source offset does not address an existing folder.
    MoveOffsetOutOfRange { offset: usize, len: usize },
    /// Move destination is past the end of the folder list.
    MoveDestinationOutOfRange { destination: usize, len: usize },
    /// Recovering would create a second active bookmark for the same post.
    /// Carries the id of the active bookmark it collides with.
    ActiveDuplicate { bookmark_uuid: BookmarkId },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFolderName => write!(f, "folder name must not be blank"),
            Self::EmptyUrl => write!(f, "bookmark url must not be blank"),
            Self::ReorderSetMismatch { expected, provided } => write!(
                f,
                "reorder must list every folder exactly once: expected {expected} ids, got {provided}"
            ),
            Self::MoveOffsetOutOfRange { offset, len } => {
                write!(f, "move offset {offset} is out of range for {len} folders")
            }
            Self::MoveDestinationOutOfRange { destination, len } => write!(
                f,
                "move destination {destination} is out of range for {len} folders"
            ),
            Self::ActiveDuplicate { bookmark_uuid } => write!(
                f,
                "active bookmark {bookmark_uuid} already has this url or content id"
            ),
        }
    }
}

impl Error for ValidationError {}
