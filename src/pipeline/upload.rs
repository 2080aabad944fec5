//! Uploaded photo validation.

use std::path::Path;

use thiserror::Error;

/// Inline image payloads above this size are rejected by the model API.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// MIME types accepted for analysis.
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image type '{0}' (expected JPEG, PNG or WebP)")]
    UnsupportedType(String),

    #[error("image is empty")]
    Empty,

    #[error("image is too large ({0} bytes, limit is 20 MiB)")]
    TooLarge(usize),
}

// ---------------------------------------------------------------------------
// ImageUpload
// ---------------------------------------------------------------------------

/// A validated photo ready to send to the model.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    /// Validate raw bytes with an explicit MIME type.
    pub fn from_bytes(bytes: Vec<u8>, mime_type: &str) -> Result<Self, UploadError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(UploadError::UnsupportedType(mime_type));
        }
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge(bytes.len()));
        }
        Ok(Self { bytes, mime_type })
    }

    /// Read and validate an image file; the MIME type is guessed from the
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("unknown")
                    .to_string()
            });
        if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(UploadError::UnsupportedType(mime_type));
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, &mime_type)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn accepts_supported_types() {
        for mime in SUPPORTED_MIME_TYPES {
            let upload = ImageUpload::from_bytes(vec![1, 2, 3], mime).expect("valid");
            assert_eq!(upload.mime_type, *mime);
        }
        let upload = ImageUpload::from_bytes(vec![1], " IMAGE/JPEG ").expect("normalised");
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn rejects_other_types() {
        assert!(matches!(
            ImageUpload::from_bytes(vec![1], "image/gif"),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(matches!(
            ImageUpload::from_bytes(Vec::new(), "image/png"),
            Err(UploadError::Empty)
        ));
        assert!(matches!(
            ImageUpload::from_bytes(vec![0; MAX_IMAGE_BYTES + 1], "image/png"),
            Err(UploadError::TooLarge(_))
        ));
    }

    #[test]
    fn from_path_guesses_mime_from_extension() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("peel.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).expect("write");

        let upload = ImageUpload::from_path(&path).expect("upload");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn from_path_rejects_non_images_before_reading() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("notes.txt");
        assert!(matches!(
            ImageUpload::from_path(&path),
            Err(UploadError::UnsupportedType(t)) if t == "text/plain"
        ));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing.png");
        assert!(matches!(ImageUpload::from_path(&path), Err(UploadError::Io(_))));
    }
}
