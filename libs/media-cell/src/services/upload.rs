use std::path::PathBuf;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{ImageKind, MediaError, SpooledImage, UploadedImage};
use crate::services::cloudinary::CloudinaryClient;

/// Validates an uploaded image, spools it to local disk under a generated
/// filename, and pushes it to the image CDN.
pub struct ImageUploadService {
    cloudinary: CloudinaryClient,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
}

impl ImageUploadService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            cloudinary: CloudinaryClient::new(config),
            upload_dir: PathBuf::from(&config.upload_dir),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn validate(&self, content_type: &str, size: u64) -> Result<ImageKind, MediaError> {
        let kind = ImageKind::from_content_type(content_type)
            .ok_or_else(|| MediaError::UnsupportedType(content_type.to_string()))?;

        if size == 0 {
            return Err(MediaError::Empty);
        }
        if size > self.max_upload_bytes {
            return Err(MediaError::TooLarge {
                max_bytes: self.max_upload_bytes,
            });
        }

        Ok(kind)
    }

    pub async fn spool_to_disk(
        &self,
        data: &[u8],
        kind: ImageKind,
    ) -> Result<SpooledImage, MediaError> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let path = self.upload_dir.join(filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        debug!("Spooled upload to {}", path.display());
        Ok(SpooledImage { path, kind })
    }

    /// Full pipeline: validate, spool, push to the CDN, clean up the spool.
    pub async fn store_image(
        &self,
        data: &[u8],
        content_type: &str,
    ) -> Result<UploadedImage, MediaError> {
        let kind = self.validate(content_type, data.len() as u64)?;
        let spooled = self.spool_to_disk(data, kind).await?;

        let result = self.cloudinary.upload_image(data, kind).await;

        // The spool file has served its purpose whether or not the CDN push
        // succeeded.
        if let Err(e) = tokio::fs::remove_file(&spooled.path).await {
            warn!("Failed to remove spooled upload {}: {}", spooled.path.display(), e);
        }

        let url = result.map_err(|e| MediaError::ImageHost(e.to_string()))?;
        Ok(UploadedImage { url })
    }
}
