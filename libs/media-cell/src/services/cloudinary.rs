use std::fmt::Write as _;

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::ImageKind;

/// Client for the image CDN's upload API. Requests are signed with SHA-256
/// over the sorted parameter string plus the API secret.
pub struct CloudinaryClient {
    client: reqwest::Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.cloudinary_api_base.clone(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    pub async fn upload_image(&self, data: &[u8], kind: ImageKind) -> Result<String> {
        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);
        debug!("Uploading {} byte image to CDN", data.len());

        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        // The file rides along as a base64 data URI form field.
        let data_uri = format!("data:{};base64,{}", kind.content_type(), BASE64.encode(data));

        let form = [
            ("file", data_uri.as_str()),
            ("api_key", self.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Image host error ({}): {}", status, error_text);
            return Err(anyhow!("Image host error ({}): {}", status, error_text));
        }

        let body: Value = response.json().await?;
        body["secure_url"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Image host response missing secure_url"))
    }

    /// Sorted `key=value` pairs joined with `&`, with the secret appended,
    /// hashed and hex encoded.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        to_sign.push_str(&self.api_secret);

        let digest = Sha256::digest(to_sign.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    }
}
