//! Product image storage
//!
//! [`ImageStore`] abstracts where product images live; callers get back a
//! stable URI to persist on the product row. The backend is selected by the
//! `IMAGE_STORE` deployment flag — only the local-filesystem store is
//! implemented, serving files under `/images/`.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Named-blob image storage returning a stable URI
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Validate and persist an uploaded image, returning its public URI.
    /// The write completes before any row referencing the URI is committed.
    async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, AppError>;
}

/// Local-filesystem store writing under `{work_dir}/public/images`
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

/// Build the image store selected by the deployment flag
pub fn from_config(config: &Config) -> Result<Arc<dyn ImageStore>, AppError> {
    match config.image_store.as_str() {
        "local" => Ok(Arc::new(LocalImageStore::new(config.images_dir()))),
        other => Err(AppError::Internal(format!(
            "Unknown image store backend: {other}"
        ))),
    }
}

/// Keep only filename-safe characters from the original basename
fn sanitize_base_name(name: &str) -> String {
    let base: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(32)
        .collect();
    if base.is_empty() { "image".into() } else { base }
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Empty file provided".into()));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file format '{ext_lower}'. Supported: {}",
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // Verify it actually decodes as an image
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::Validation(format!(
            "Invalid image file ({ext_lower}): {e}"
        )));
    }

    Ok(())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        let path = PathBuf::from(original_name);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| {
                AppError::Validation(format!("Invalid file extension for: {original_name}"))
            })?;

        validate_image(data, &ext)?;

        let base = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(sanitize_base_name)
            .unwrap_or_else(|| "image".into());
        let filename = format!("{base}-{}.{ext}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create images directory: {e}")))?;
        tokio::fs::write(self.root.join(&filename), data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to save image: {e}")))?;

        tracing::info!(original_name, filename, size = data.len(), "Image stored");

        Ok(format!("/images/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_uri() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf());

        let url = store.save("caneca azul.png", &png_bytes()).await.unwrap();
        assert!(url.starts_with("/images/canecaazul-"));
        assert!(url.ends_with(".png"));

        let filename = url.strip_prefix("/images/").unwrap();
        assert!(dir.path().join(filename).exists());
    }

    #[tokio::test]
    async fn test_save_rejects_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf());

        let err = store.save("notes.txt", b"hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_non_image_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf());

        let err = store.save("fake.png", b"not a png").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_missing_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf());

        let err = store.save("noext", &png_bytes()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
