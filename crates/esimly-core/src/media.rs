// ── Banner image encoding ──
//
// Promotion/campaign banners are embedded in the JSON payload as base64
// data URLs -- a deliberate simplification at this deployment's scale
// (there is no object storage tier). The 2 MB cap bounds payload size.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::CoreError;

/// Maximum accepted image size (pre-encoding).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Encode image bytes as a `data:` URL for embedding in a promotion or
/// campaign payload. Rejects anything over [`MAX_IMAGE_BYTES`].
pub fn image_to_data_url(bytes: &[u8], mime: &str) -> Result<String, CoreError> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::validation(
            "bannerImage",
            format!(
                "image is {} bytes, the maximum is {} (2 MB)",
                bytes.len(),
                MAX_IMAGE_BYTES
            ),
        ));
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Guess the MIME type from a file extension (the upload dialog filters
/// to images already; this only labels the data URL).
pub fn mime_from_extension(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encodes_small_images() {
        let url = image_to_data_url(b"fakepng", "image/png").unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn rejects_oversized_images() {
        let big = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = image_to_data_url(&big, "image/png").unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn exactly_at_cap_is_accepted() {
        let edge = vec![0u8; MAX_IMAGE_BYTES];
        assert!(image_to_data_url(&edge, "image/jpeg").is_ok());
    }

    #[test]
    fn extension_mapping() {
        use std::path::Path;
        assert_eq!(mime_from_extension(Path::new("b.PNG")), "image/png");
        assert_eq!(mime_from_extension(Path::new("b.jpg")), "image/jpeg");
        assert_eq!(mime_from_extension(Path::new("b")), "image/jpeg");
    }
}
