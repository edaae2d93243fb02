use common::storage::{ImageStore, ImageUpload, StorageError};
use tracing::warn;

/// Profile picture extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub fn has_allowed_extension(upload: &ImageUpload) -> bool {
    upload
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Upload a profile picture if one was supplied with an accepted extension.
///
/// Returns the URL to store in `profile_pic`, or `None` when nothing was
/// uploaded. A file with any other extension is skipped without an error.
pub async fn upload_profile_pic(
    store: &dyn ImageStore,
    file: Option<ImageUpload>,
    folder: &str,
) -> Result<Option<String>, StorageError> {
    let Some(file) = file else {
        return Ok(None);
    };

    if !has_allowed_extension(&file) {
        warn!(
            file_name = %file.file_name,
            "Skipping profile picture with unsupported extension"
        );
        return Ok(None);
    }

    let stored = store.upload(file, folder).await?;
    Ok(Some(stored.secure_url))
}
