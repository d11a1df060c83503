//! What a caller submits for extraction.

use bytes::Bytes;
use url::Url;

use crate::config::LimitsConfig;
use crate::importer::ImportError;

/// One uploaded photograph.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub data: Bytes,
}

impl ImageInput {
    /// Build an image, guessing the MIME type from the file name when the
    /// client did not send one.
    pub fn new(file_name: Option<String>, mime_type: Option<String>, data: Bytes) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.is_empty() && m != "application/octet-stream")
            .or_else(|| file_name.as_deref().and_then(guess_image_mime).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self {
            file_name,
            mime_type,
            data,
        }
    }
}

/// One extraction request.
#[derive(Debug, Clone, Default)]
pub struct ExtractInput {
    pub images: Vec<ImageInput>,
    pub text: Option<String>,
    pub source_url: Option<Url>,
}

impl ExtractInput {
    /// Pasted text, if any non-blank text was sent.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Check the request against the configured limits.
    pub fn validate(&self, limits: &LimitsConfig) -> Result<(), ImportError> {
        if self.images.is_empty() && self.text().is_none() {
            return Err(ImportError::NoInput);
        }
        if self.images.len() > limits.max_images {
            return Err(ImportError::TooManyImages {
                count: self.images.len(),
                max: limits.max_images,
            });
        }
        if let Some(text) = self.text() {
            let chars = text.chars().count();
            if chars > limits.max_text_chars {
                return Err(ImportError::TextTooLong {
                    chars,
                    max: limits.max_text_chars,
                });
            }
        }
        if let Some(image) = self.images.iter().find(|i| !i.mime_type.starts_with("image/")) {
            return Err(ImportError::UnsupportedMedia(image.mime_type.clone()));
        }
        Ok(())
    }
}

/// Map a file extension to an image MIME type.
pub fn guess_image_mime(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str) -> ImageInput {
        ImageInput::new(Some("photo.jpg".into()), Some(mime.into()), Bytes::from_static(b"\xff\xd8"))
    }

    #[test]
    fn test_requires_images_or_text() {
        let limits = LimitsConfig::default();
        let empty = ExtractInput {
            text: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(empty.validate(&limits), Err(ImportError::NoInput)));

        let text_only = ExtractInput {
            text: Some("2 eggs, whisk".into()),
            ..Default::default()
        };
        assert!(text_only.validate(&limits).is_ok());
    }

    #[test]
    fn test_image_limit() {
        let limits = LimitsConfig {
            max_images: 2,
            ..Default::default()
        };
        let input = ExtractInput {
            images: vec![image("image/png"); 3],
            ..Default::default()
        };
        assert!(matches!(
            input.validate(&limits),
            Err(ImportError::TooManyImages { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_text_limit_counts_chars() {
        let limits = LimitsConfig {
            max_text_chars: 3,
            ..Default::default()
        };
        let ok = ExtractInput {
            text: Some("äöü".into()),
            ..Default::default()
        };
        assert!(ok.validate(&limits).is_ok());
        let long = ExtractInput {
            text: Some("äöüß".into()),
            ..Default::default()
        };
        assert!(matches!(long.validate(&limits), Err(ImportError::TextTooLong { chars: 4, .. })));
    }

    #[test]
    fn test_rejects_non_images() {
        let input = ExtractInput {
            images: vec![image("application/pdf")],
            ..Default::default()
        };
        assert!(matches!(
            input.validate(&LimitsConfig::default()),
            Err(ImportError::UnsupportedMedia(m)) if m == "application/pdf"
        ));
    }

    #[test]
    fn test_mime_guess() {
        let img = ImageInput::new(Some("IMG_0001.HEIC".into()), None, Bytes::new());
        assert_eq!(img.mime_type, "image/heic");
        let img = ImageInput::new(Some("scan.png".into()), Some("application/octet-stream".into()), Bytes::new());
        assert_eq!(img.mime_type, "image/png");
        let img = ImageInput::new(None, None, Bytes::new());
        assert_eq!(img.mime_type, "application/octet-stream");
    }
}
