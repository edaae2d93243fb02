pub mod config;
pub mod storage;

pub use config::{CloudinaryConfig, FilesystemStorageConfig, StorageBackend, StorageConfig};
