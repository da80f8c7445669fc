use thiserror::Error;

use crate::domain::track::TrackId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt library snapshot: {0}")]
    CorruptSnapshot(#[from] serde_json::Error),

    #[error("stored audio for track {track} does not match its digest")]
    CorruptBlob { track: TrackId },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StorageError {
    /// The backend itself cannot be used right now, as opposed to one bad
    /// record or statement.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_backend_is_unavailable() {
        assert!(StorageError::Unavailable("closed".into()).is_unavailable());
        assert!(!StorageError::Database(rusqlite::Error::InvalidQuery).is_unavailable());
        assert!(
            !StorageError::CorruptBlob {
                track: TrackId::from("a")
            }
            .is_unavailable()
        );
    }
}
