pub mod cloudinary;
pub mod upload;
