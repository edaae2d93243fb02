use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{BoxReader, ImageStore, ImageUpload, StoredImage};

/// Filesystem-backed image store.
///
/// Images are content-addressed: `{base_path}/{folder}/{sha256}.{ext}`, so
/// uploading the same picture twice stores it once. URLs are built from
/// `public_url`, which is expected to point at the app's `/media` route.
pub struct FilesystemImageStore {
    base_path: PathBuf,
    public_url: String,
    max_size: u64,
}

impl FilesystemImageStore {
    /// Create a new filesystem image store.
    pub async fn new(
        base_path: PathBuf,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_url: public_url.into(),
            max_size,
        })
    }

    fn image_path(&self, public_id: &str) -> PathBuf {
        public_id
            .split('/')
            .fold(self.base_path.clone(), |path, segment| path.join(segment))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), public_id)
    }
}

/// Checks that a `/`-separated key only contains plain, non-hidden segments.
pub fn validate_key(key: &str) -> Result<&str, StorageError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && !segment.starts_with('.')
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });
    if valid {
        Ok(key)
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredImage, StorageError> {
        let folder = validate_key(folder)?;
        if image.data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: image.data.len() as u64,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::compute(&image.data);
        let public_id = match image.extension() {
            Some(ext) => format!("{folder}/{hash}.{}", validate_key(&ext)?),
            None => format!("{folder}/{hash}"),
        };
        let image_path = self.image_path(&public_id);

        if !fs::try_exists(&image_path).await? {
            if let Some(parent) = image_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            let temp_path = self.temp_path();
            if let Err(e) = fs::write(&temp_path, &image.data).await {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }

            if let Err(e) = fs::rename(&temp_path, &image_path).await {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
        }

        tracing::debug!(%public_id, size = image.data.len(), "Stored image on disk");

        Ok(StoredImage {
            secure_url: self.url_for(&public_id),
            public_id,
        })
    }

    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError> {
        let image_path = self.image_path(validate_key(public_id)?);
        match fs::File::open(&image_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(public_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
