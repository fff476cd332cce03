//! Asset Store
//!
//! Persists uploaded item thumbnails under `<static_dir>/thumbnails` with
//! generated, collision-free names and removes them again when an item's
//! image is replaced or the item is deleted.

use image::ImageFormat;
use shared::error::{AppError, ErrorCode};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Accepted upload extensions
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "gif", "webm"];

/// Public URL prefix of stored thumbnails
pub const PUBLIC_PREFIX: &str = "/static/thumbnails/";

/// EBML header every WebM file starts with
const WEBM_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Empty file provided")]
    Empty,

    #[error("File too large ({size} bytes). Maximum size is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported file format '{0}'. Supported: png, jpg, jpeg, gif, webm")]
    UnsupportedFormat(String),

    #[error("File content does not match its .{0} extension")]
    ContentMismatch(String),

    #[error("Failed to write asset: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Empty => AppError::with_message(ErrorCode::EmptyFile, err.to_string()),
            AssetError::TooLarge { size, max } => {
                AppError::with_message(ErrorCode::FileTooLarge, err.to_string())
                    .with_detail("size", size)
                    .with_detail("max", max)
            }
            AssetError::UnsupportedFormat(ref ext) => {
                AppError::with_message(ErrorCode::UnsupportedFileFormat, err.to_string())
                    .with_detail("extension", ext.clone())
            }
            AssetError::ContentMismatch(_) => {
                AppError::with_message(ErrorCode::InvalidImageFile, err.to_string())
            }
            AssetError::Io(e) => {
                tracing::error!(error = %e, "Asset write failed");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    thumbnails_dir: PathBuf,
    max_bytes: usize,
}

impl AssetStore {
    pub fn new(thumbnails_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            thumbnails_dir: thumbnails_dir.into(),
            max_bytes,
        }
    }

    pub fn thumbnails_dir(&self) -> &Path {
        &self.thumbnails_dir
    }

    /// Validate and persist an upload, returning its public path
    ///
    /// Files are opened with create-new so two uploads can never overwrite
    /// each other even if a generated name were to repeat.
    pub async fn store(&self, data: &[u8], original_filename: &str) -> Result<String, AssetError> {
        let ext = self.validate(data, original_filename)?;

        tokio::fs::create_dir_all(&self.thumbnails_dir).await?;

        let filename = format!(
            "{}_{}.{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S"),
            Uuid::new_v4().simple(),
            ext
        );
        let path = self.thumbnails_dir.join(&filename);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        if let Err(e) = write_all(&mut file, data).await {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }

        tracing::info!(
            file = %filename,
            original = %original_filename,
            size = data.len(),
            "Asset stored"
        );
        Ok(format!("{PUBLIC_PREFIX}{filename}"))
    }

    /// Remove a stored asset
    ///
    /// Missing files are ignored. Failures are logged and swallowed so a
    /// committed catalog change is never undone by cleanup.
    pub async fn delete(&self, asset_path: &str) {
        let Some(path) = self.resolve(asset_path) else {
            tracing::warn!(path = %asset_path, "Refusing to delete asset outside thumbnails directory");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %asset_path, "Asset deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %asset_path, "Asset already gone");
            }
            Err(e) => tracing::warn!(path = %asset_path, error = %e, "Failed to delete asset"),
        }
    }

    /// Whether the file behind a public asset path is present on disk
    pub async fn exists(&self, asset_path: &str) -> bool {
        match self.resolve(asset_path) {
            Some(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Map a public path to a file directly inside the thumbnails directory
    fn resolve(&self, asset_path: &str) -> Option<PathBuf> {
        let name = asset_path.strip_prefix(PUBLIC_PREFIX)?;
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) if !name.contains('\\') => {
                Some(self.thumbnails_dir.join(file))
            }
            _ => None,
        }
    }

    /// Check size, extension and content; returns the lowercased extension
    fn validate(&self, data: &[u8], filename: &str) -> Result<String, AssetError> {
        if data.is_empty() {
            return Err(AssetError::Empty);
        }
        if data.len() > self.max_bytes {
            return Err(AssetError::TooLarge {
                size: data.len(),
                max: self.max_bytes,
            });
        }

        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AssetError::UnsupportedFormat(ext));
        }

        let matches = if ext == "webm" {
            data.starts_with(&WEBM_MAGIC)
        } else {
            match (image::guess_format(data), ImageFormat::from_extension(&ext)) {
                (Ok(actual), Some(claimed)) => actual == claimed,
                _ => false,
            }
        };
        if !matches {
            return Err(AssetError::ContentMismatch(ext));
        }

        Ok(ext)
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}
