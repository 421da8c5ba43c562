//! Errors raised by the version tracking core

use std::path::PathBuf;

/// Failure of the backing store for version markers
///
/// Missing or malformed markers are not errors (they mean "needs refresh").
/// Only a store that cannot be read or written ends up here, since silently
/// ignoring it would lose refresh state.
#[derive(Debug)]
pub enum SyncError {
    /// The store could not be read or written for an entity
    StorageUnavailable {
        entity_id: String,
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// Entity id cannot be used as a storage key
    InvalidEntityId { entity_id: String },
}

impl SyncError {
    pub fn storage(entity_id: &str, path: Option<PathBuf>, source: std::io::Error) -> Self {
        SyncError::StorageUnavailable {
            entity_id: entity_id.to_string(),
            path,
            source,
        }
    }

    /// Entity the error applies to
    pub fn entity_id(&self) -> &str {
        match self {
            SyncError::StorageUnavailable { entity_id, .. } => entity_id,
            SyncError::InvalidEntityId { entity_id } => entity_id,
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::StorageUnavailable {
                entity_id,
                path: Some(path),
                source,
            } => write!(
                f,
                "version store unavailable for '{}' ({}): {}",
                entity_id,
                path.display(),
                source
            ),
            SyncError::StorageUnavailable {
                entity_id, source, ..
            } => write!(f, "version store unavailable for '{}': {}", entity_id, source),
            SyncError::InvalidEntityId { entity_id } => {
                write!(f, "invalid entity id for version store: '{}'", entity_id)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::StorageUnavailable { source, .. } => Some(source),
            SyncError::InvalidEntityId { .. } => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
