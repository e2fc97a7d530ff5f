//! Image plumbing shared by the front ends.
//!
//! Uploads are normalized before the model ever sees them: extension checked
//! against the allow-list, pixels decoded and re-encoded as RGB JPEG at fixed
//! quality, size capped, then base64-encoded for the wire.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, DynamicImage};

use crate::config::UploadConfig;
use crate::error::{Error, Result};

const JPEG_QUALITY: u8 = 85;

/// Check a filename's extension against the configured allow-list.
pub fn validate_extension(filename: &str, cfg: &UploadConfig) -> Result<()> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if cfg.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => Ok(()),
        _ => Err(Error::input(format!(
            "invalid file type; allowed extensions: {}",
            cfg.allowed_extensions.join(", ")
        ))),
    }
}

/// Decode an uploaded image, normalize it to an RGB JPEG, enforce the size
/// cap, and return it base64-encoded.
pub fn encode_image(bytes: &[u8], cfg: &UploadConfig) -> Result<String> {
    if bytes.is_empty() {
        return Err(Error::input("file is empty"));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::input(format!("invalid image: {}", e)))?;

    // Strip alpha and normalize format in one pass.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))
        .map_err(|e| Error::input(format!("failed to re-encode image: {}", e)))?;
    let jpeg = buffer.into_inner();

    let limit = cfg.max_file_size_mb * 1024 * 1024;
    if jpeg.len() as u64 > limit {
        return Err(Error::input(format!(
            "image size ({:.2}MB) exceeds maximum allowed size ({}MB)",
            jpeg.len() as f64 / (1024.0 * 1024.0),
            cfg.max_file_size_mb
        )));
    }

    Ok(STANDARD.encode(jpeg))
}

/// Full upload pipeline: extension check, then decode/re-encode/encode.
pub fn prepare_upload(filename: &str, bytes: &[u8], cfg: &UploadConfig) -> Result<String> {
    validate_extension(filename, cfg)?;
    encode_image(bytes, cfg)
}
