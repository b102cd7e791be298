//! Folder domain model.
//!
//! # Invariants
//! - `uuid` is immutable.
//! - `sort_order` values across all folders form the dense range `0..N`.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable folder identifier.
pub type FolderId = Uuid;

/// User-defined, ordered bucket of bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub uuid: FolderId,
    /// Trimmed display name. Uniqueness is not enforced.
    pub name: String,
    /// Display rank, zero-based.
    pub sort_order: i64,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Folder row together with its active member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    pub folder: Folder,
    pub bookmark_count: u32,
}

/// Trims a folder name and rejects blank values.
pub fn normalize_folder_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyFolderName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_folder_name;
    use crate::model::validation::ValidationError;

    #[test]
    fn normalize_folder_name_trims_whitespace() {
        assert_eq!(normalize_folder_name("  Reading \n").unwrap(), "Reading");
    }

    #[test]
    fn normalize_folder_name_rejects_blank() {
        assert_eq!(
            normalize_folder_name(" \t ").unwrap_err(),
            ValidationError::EmptyFolderName
        );
    }
}
