use std::{fmt::Display, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hash::PayloadDigest;

/// Mime type assumed when nothing better can be derived from the file name.
pub const FALLBACK_MIME: &str = "audio/mpeg";
/// File name recorded for payloads imported without one.
pub const FALLBACK_FILE_NAME: &str = "audio";

/// Opaque, globally unique track identifier. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary audio payload together with the tags the blob store keeps for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
    pub file_name: String,
}

impl AudioPayload {
    /// Builds a payload, filling in the mime type and file name when missing.
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: Option<&str>, file_name: &str) -> Self {
        let file_name = if file_name.trim().is_empty() {
            FALLBACK_FILE_NAME.to_string()
        } else {
            file_name.to_string()
        };
        let mime_type = match mime_type {
            Some(m) if !m.trim().is_empty() => m.to_string(),
            _ => mime_for_file_name(&file_name),
        };
        Self {
            bytes: bytes.into(),
            mime_type,
            file_name,
        }
    }

    pub fn digest(&self) -> PayloadDigest {
        PayloadDigest::from_bytes(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Represent a music track
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub file_name: String,
    /// `data:` URI of the cover image, empty when there is none.
    pub cover_data_uri: String,
    /// Absent until imported or re-attached by hydration.
    pub payload: Option<AudioPayload>,
}

impl Track {
    pub fn metadata(&self) -> TrackMetadata {
        TrackMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            file_name: self.file_name.clone(),
            cover_data: self.cover_data_uri.clone(),
        }
    }

    pub fn is_playable(&self) -> bool {
        self.payload.is_some()
    }

    /// case-insensitive substring match on name or file name
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.file_name.to_lowercase().contains(query_lower)
    }
}

impl From<TrackMetadata> for Track {
    fn from(meta: TrackMetadata) -> Self {
        Self {
            id: meta.id,
            name: meta.name,
            file_name: meta.file_name,
            cover_data_uri: meta.cover_data,
            payload: None,
        }
    }
}

/// Persisted form of a track: everything but the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub id: TrackId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub cover_data: String,
}

/// Display name used on import: the trimmed user input, or the file name
/// without its last extension.
pub fn display_name(input: &str, file_name: &str) -> String {
    let input = input.trim();
    if !input.is_empty() {
        return input.to_string();
    }
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => file_name[..dot].to_string(),
        _ => file_name.to_string(),
    }
}

/// Map file extension (without dot) to a MIME type a media element can play.
/// Returns None if the extension is not recognized.
pub fn mime_from_ext(ext: &str) -> Option<&'static str> {
    match ext {
        "m4a" => Some("audio/x-m4a"),
        "aac" => Some("audio/aac"),
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

pub fn mime_for_file_name(file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    if let Some(mime) = ext.as_deref().and_then(mime_from_ext) {
        return mime.to_string();
    }
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_trimmed_input() {
        assert_eq!(display_name("  Song A ", "a.mp3"), "Song A");
        assert_eq!(display_name("", "a.mp3"), "a");
        assert_eq!(display_name("   ", "my.song.flac"), "my.song");
        assert_eq!(display_name("", "noext"), "noext");
        assert_eq!(display_name("", "trailing."), "trailing.");
    }

    #[test]
    fn test_mime_for_file_name() {
        assert_eq!(mime_for_file_name("a.mp3"), "audio/mpeg");
        assert_eq!(mime_for_file_name("a.M4A"), "audio/x-m4a");
        assert_eq!(mime_for_file_name("a.FLAC"), "audio/flac");
        assert_eq!(mime_for_file_name("audio"), FALLBACK_MIME);
    }

    #[test]
    fn test_payload_defaults() {
        let payload = AudioPayload::new(vec![1u8, 2, 3], None, "");
        assert_eq!(payload.file_name, FALLBACK_FILE_NAME);
        assert_eq!(payload.mime_type, FALLBACK_MIME);
        assert_eq!(payload.len(), 3);

        let payload = AudioPayload::new(vec![1u8], Some("audio/ogg"), "x.mp3");
        assert_eq!(payload.mime_type, "audio/ogg");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(TrackId::generate(), TrackId::generate());
    }

    #[test]
    fn test_metadata_json_shape() -> anyhow::Result<()> {
        let track = Track {
            id: TrackId::from("t1"),
            name: "Song A".into(),
            file_name: "a.mp3".into(),
            cover_data_uri: String::new(),
            payload: Some(AudioPayload::new(vec![0u8], None, "a.mp3")),
        };
        let json = serde_json::to_value(track.metadata())?;
        assert_eq!(
            json,
            serde_json::json!({"id": "t1", "name": "Song A", "fileName": "a.mp3", "coverData": ""})
        );

        let back: Track = serde_json::from_value::<TrackMetadata>(json)?.into();
        assert_eq!(back.id, track.id);
        assert!(!back.is_playable());
        Ok(())
    }
}
