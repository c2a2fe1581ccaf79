use std::env;
use tracing::warn;

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_api_url: String,
    pub data_api_key: String,
    pub data_source: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_api_base: String,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub currency: String,
    pub cloudinary_api_base: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub upload_dir: String,
    pub max_upload_bytes: u64,
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn defaulted(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            data_api_url: required("DATA_API_URL"),
            data_api_key: required("DATA_API_KEY"),
            data_source: defaulted("DATA_SOURCE", "Cluster0"),
            database_name: defaulted("DATABASE_NAME", "medibook"),
            jwt_secret: required("JWT_SECRET"),
            admin_email: required("ADMIN_EMAIL"),
            admin_password: required("ADMIN_PASSWORD"),
            stripe_secret_key: required("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: required("STRIPE_WEBHOOK_SECRET"),
            stripe_api_base: defaulted("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            checkout_success_url: defaulted(
                "CHECKOUT_SUCCESS_URL",
                "http://localhost:5173/verify?success=true",
            ),
            checkout_cancel_url: defaulted(
                "CHECKOUT_CANCEL_URL",
                "http://localhost:5173/verify?success=false",
            ),
            currency: defaulted("CURRENCY", "usd"),
            cloudinary_api_base: defaulted("CLOUDINARY_API_BASE", DEFAULT_CLOUDINARY_API_BASE),
            cloudinary_cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: required("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: required("CLOUDINARY_API_SECRET"),
            upload_dir: defaulted("UPLOAD_DIR", "uploads"),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.data_api_url.is_empty()
            && !self.data_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_payments_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_webhook_secret.is_empty()
    }

    pub fn is_media_configured(&self) -> bool {
        !self.cloudinary_cloud_name.is_empty()
            && !self.cloudinary_api_key.is_empty()
            && !self.cloudinary_api_secret.is_empty()
    }
}
