mod error;
mod hash;
mod traits;

pub mod cloudinary;
pub mod filesystem;

use std::sync::Arc;

pub use error::StorageError;
pub use hash::ContentHash;
pub use traits::{BoxReader, ImageStore, ImageUpload, StoredImage};

use crate::config::{StorageBackend, StorageConfig};
use cloudinary::CloudinaryImageStore;
use filesystem::FilesystemImageStore;

/// Build the image store selected by `config.backend`.
pub async fn build_image_store(config: &StorageConfig) -> Result<Arc<dyn ImageStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemImageStore::new(
                config.filesystem.path.clone(),
                config.filesystem.public_url.clone(),
                config.max_image_size,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Cloudinary => {
            let cloudinary = config.cloudinary.as_ref().ok_or_else(|| {
                StorageError::Config("storage.cloudinary section is required".into())
            })?;
            Ok(Arc::new(CloudinaryImageStore::new(
                cloudinary,
                config.max_image_size,
            )?))
        }
    }
}
