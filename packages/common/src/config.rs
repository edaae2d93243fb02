use std::path::PathBuf;

use serde::Deserialize;

/// Which image store receives profile pictures.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Content-addressed files on local disk, served by the app itself.
    Filesystem,
    /// Signed uploads to the Cloudinary image host.
    Cloudinary,
}

/// Image storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: filesystem.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Folder images are uploaded under. Default: "SIS".
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Largest accepted image in bytes. Default: 10 MiB.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    /// Required when `backend = "cloudinary"`.
    #[serde(default)]
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Directory holding stored images. Default: "./media".
    #[serde(default = "default_filesystem_path")]
    pub path: PathBuf,
    /// Base URL the stored images are reachable at. Default: "http://127.0.0.1:3000/media".
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Default: "https://api.cloudinary.com".
    #[serde(default = "default_cloudinary_api_url")]
    pub api_url: String,
    /// Upload request timeout in seconds. Default: 30.
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Filesystem
}
fn default_folder() -> String {
    "SIS".into()
}
fn default_max_image_size() -> u64 {
    10 * 1024 * 1024
}
fn default_filesystem_path() -> PathBuf {
    PathBuf::from("./media")
}
fn default_public_url() -> String {
    "http://127.0.0.1:3000/media".into()
}
fn default_cloudinary_api_url() -> String {
    "https://api.cloudinary.com".into()
}
fn default_upload_timeout_secs() -> u64 {
    30
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            path: default_filesystem_path(),
            public_url: default_public_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            folder: default_folder(),
            max_image_size: default_max_image_size(),
            filesystem: FilesystemStorageConfig::default(),
            cloudinary: None,
        }
    }
}
