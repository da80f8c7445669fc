use serde::{Deserialize, Serialize};

use crate::{
    domain::track::{TrackId, TrackMetadata},
    library::playlists::{ALL_SONGS, Playlists},
};

/// Full persisted state of the library. Written as a whole on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub library: Vec<TrackMetadata>,
    #[serde(default)]
    pub playlists: Playlists,
    #[serde(default)]
    pub recent: Vec<TrackId>,
    #[serde(default = "default_current_playlist")]
    pub current_playlist: String,
}

fn default_current_playlist() -> String {
    ALL_SONGS.to_string()
}

impl Default for LibrarySnapshot {
    fn default() -> Self {
        Self {
            library: Vec::new(),
            playlists: Playlists::default(),
            recent: Vec::new(),
            current_playlist: default_current_playlist(),
        }
    }
}

impl LibrarySnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() -> anyhow::Result<()> {
        let snapshot = LibrarySnapshot::from_json("{}")?;
        assert_eq!(snapshot, LibrarySnapshot::default());
        Ok(())
    }

    #[test]
    fn test_field_names() -> anyhow::Result<()> {
        let json = serde_json::to_value(LibrarySnapshot::default())?;
        assert_eq!(
            json,
            serde_json::json!({
                "library": [],
                "playlists": {"All Songs": []},
                "recent": [],
                "currentPlaylist": "All Songs"
            })
        );
        Ok(())
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(LibrarySnapshot::from_json("{not json").is_err());
        assert!(LibrarySnapshot::from_json(r#"{"library": 5}"#).is_err());
    }
}
