use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{ImageStore, ImageUpload, StoredImage};
use crate::config::CloudinaryConfig;

/// Uploads images to Cloudinary with signed requests.
pub struct CloudinaryImageStore {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
    max_size: u64,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryImageStore {
    pub fn new(config: &CloudinaryConfig, max_size: u64) -> Result<Self, StorageError> {
        if config.cloud_name.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(StorageError::Config(
                "cloudinary cloud_name and api_key must be set".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            upload_url: upload_url(&config.api_url, &config.cloud_name),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            max_size,
        })
    }
}

fn upload_url(api_url: &str, cloud_name: &str) -> String {
    format!(
        "{}/v1_1/{}/image/upload",
        api_url.trim_end_matches('/'),
        cloud_name
    )
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, secret appended, SHA-256 hex digest.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    ContentHash::compute(format!("{joined}{api_secret}").as_bytes()).to_hex()
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<StoredImage, StorageError> {
        if image.data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: image.data.len() as u64,
                limit: self.max_size,
            });
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string();
        let signature = sign(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let mime = mime_guess::from_path(&image.file_name).first_or_octet_stream();
        let size = image.data.len();
        let part = Part::bytes(image.data)
            .file_name(image.file_name)
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::info!(public_id = %uploaded.public_id, size, "Uploaded image to Cloudinary");

        Ok(StoredImage {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}
