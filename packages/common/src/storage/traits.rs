use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// An image received from a client, held in memory until it is stored.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    /// Filename as submitted by the client.
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// Lowercased last `.`-separated segment of the filename. A name
    /// without a dot is its own extension, so a bare `png` counts as png.
    pub fn extension(&self) -> Option<String> {
        let ext = self.file_name.rsplit('.').next().unwrap_or_default();
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.data.is_empty()
    }
}

/// Where an uploaded image ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredImage {
    /// Publicly reachable HTTPS (or configured base) URL of the image.
    pub secure_url: String,
    /// Backend-specific identifier, `folder/name` for every backend.
    pub public_id: String,
}

/// A place profile pictures can be uploaded to.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload an image under `folder` and return its public location.
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredImage, StorageError>;

    /// Open a stored image for serving.
    ///
    /// Backends that serve images from their own host return `NotFound`.
    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError> {
        Err(StorageError::NotFound(public_id.to_string()))
    }
}
