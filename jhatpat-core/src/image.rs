//! Validation for generated recipe images.
//!
//! Images travel as self-contained `data:image/...;base64,` URIs so they can be
//! persisted with the recipe. Anything we cannot decode into an allowed format
//! is rejected before it reaches the history.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe images.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded size for an image (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const DATA_URI_PREFIX: &str = "data:image/";

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

/// Decode a base64 image data URI and validate its payload.
///
/// Returns the detected content type. The declared type in the URI is not
/// trusted; the bytes decide.
pub fn validate_data_uri(uri: &str) -> Result<String, String> {
    if !uri.starts_with(DATA_URI_PREFIX) {
        return Err("Not an image data URI".to_string());
    }

    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| "Malformed data URI".to_string())?;

    if !header.ends_with(";base64") {
        return Err("Image data URI is not base64 encoded".to_string());
    }

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("Invalid base64 image payload: {}", e))?;

    if data.is_empty() {
        return Err("Empty image payload".to_string());
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(format!(
            "Image too large: {} bytes (max {})",
            data.len(),
            MAX_FILE_SIZE
        ));
    }

    validate_image(&data)
}
