use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// An image received from an admin form, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("upload is empty")]
    Empty,

    #[error("upload is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for uploaded icons. Paths handed out and accepted are relative to the store root.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Writes the upload and returns its relative path.
    async fn store(&self, upload: &ImageUpload) -> Result<String, AssetError>;

    /// Removes a stored file. A file that is already gone is not an error.
    async fn remove(&self, relative: &str) -> Result<(), AssetError>;

    async fn exists(&self, relative: &str) -> bool;

    fn public_url(&self, relative: &str) -> String;
}

const ALLOWED_TYPES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/webp", &["webp"]),
    ("image/gif", &["gif"]),
];

pub struct LocalAssetStore {
    root: PathBuf,
    subdir: String,
    public_base: String,
    max_bytes: usize,
}

impl LocalAssetStore {
    pub fn new(
        root: impl Into<PathBuf>,
        subdir: impl Into<String>,
        public_base: impl Into<String>,
        max_bytes: usize,
    ) -> Self {
        Self {
            root: root.into(),
            subdir: subdir.into(),
            public_base: public_base.into(),
            max_bytes,
        }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, AssetError> {
        let path = Path::new(relative);
        let safe = !relative.is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AssetError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }
}

/// Picks the stored file extension, requiring the declared type and the file name to agree.
fn image_extension(upload: &ImageUpload) -> Result<&'static str, AssetError> {
    let extension = Path::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content_type = upload
        .content_type
        .as_deref()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();

    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .and_then(|(_, exts)| exts.iter().find(|e| **e == extension).copied())
        .ok_or_else(|| {
            AssetError::UnsupportedType(format!("{content_type} ({})", upload.file_name))
        })
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, upload: &ImageUpload) -> Result<String, AssetError> {
        if upload.data.is_empty() {
            return Err(AssetError::Empty);
        }
        if upload.data.len() > self.max_bytes {
            return Err(AssetError::TooLarge {
                size: upload.data.len(),
                max: self.max_bytes,
            });
        }
        let extension = image_extension(upload)?;

        let dir = self.root.join(&self.subdir);
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());
        let path = dir.join(&file_name);

        let mut file = fs::File::create(&path).await?;
        if let Err(e) = write_all_synced(&mut file, &upload.data).await {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "failed to clean up partial upload");
            }
            return Err(e.into());
        }

        let relative = format!("{}/{file_name}", self.subdir);
        tracing::info!(path = %relative, bytes = upload.data.len(), "stored image");
        Ok(relative)
    }

    async fn remove(&self, relative: &str) -> Result<(), AssetError> {
        let path = self.resolve(relative)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %relative, "removed image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, relative: &str) -> bool {
        match self.resolve(relative) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    fn public_url(&self, relative: &str) -> String {
        format!("{}{relative}", self.public_base)
    }
}

async fn write_all_synced(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}
