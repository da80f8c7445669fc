use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Cover image picked at import time.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl CoverImage {
    /// Embeddable `data:` URI for the image.
    pub fn to_data_uri(&self) -> String {
        let mime = match &self.mime_type {
            Some(m) if !m.trim().is_empty() => m.clone(),
            _ => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .to_string(),
        };
        format!("data:{mime};base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Data URI for an optional cover, empty string when absent.
pub fn cover_data_uri(cover: Option<&CoverImage>) -> String {
    cover.map(CoverImage::to_data_uri).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_to_data_uri() {
        let cover = CoverImage {
            file_name: "cover.png".into(),
            mime_type: None,
            bytes: b"abc".to_vec(),
        };
        assert_eq!(cover.to_data_uri(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_explicit_mime_wins() {
        let cover = CoverImage {
            file_name: "cover".into(),
            mime_type: Some("image/webp".into()),
            bytes: vec![],
        };
        assert_eq!(cover.to_data_uri(), "data:image/webp;base64,");
    }

    #[test]
    fn test_missing_cover_is_empty() {
        assert_eq!(cover_data_uri(None), "");
    }
}
