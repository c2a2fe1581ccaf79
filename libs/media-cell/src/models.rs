use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image formats the platform accepts for profile pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// An image spooled to local disk before the CDN push.
#[derive(Debug, Clone)]
pub struct SpooledImage {
    pub path: PathBuf,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image exceeds maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },

    #[error("Image data is empty")]
    Empty,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image host error: {0}")]
    ImageHost(String),
}
