use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::task;

/// Longest side of a photo sent to the vision service
const UPLOAD_MAX_DIMENSION: u32 = 1024;

/// A photo of one coin face, ready for upload and preview
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Re-encoded JPEG bytes, used for the on-screen preview and the
    /// base64 upload payload
    pub jpeg: Vec<u8>,
    /// The reference stored on the record (embedded data URL)
    pub data_url: String,
}

/// Load a picked photo and prepare it for identification
///
/// Decodes the file, downscales so the longest side is at most
/// UPLOAD_MAX_DIMENSION, and re-encodes as JPEG.
pub async fn prepare_photo(path: PathBuf) -> Result<CapturedPhoto, String> {
    // Spawn blocking because decode and resize are CPU-intensive
    task::spawn_blocking(move || prepare_photo_blocking(&path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking implementation of photo preparation
fn prepare_photo_blocking(path: &Path) -> Result<CapturedPhoto, String> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }

    let img = image::open(path).map_err(|e| format!("Failed to decode photo: {}", e))?;

    let img = if img.width().max(img.height()) > UPLOAD_MAX_DIMENSION {
        img.resize(UPLOAD_MAX_DIMENSION, UPLOAD_MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG cannot carry an alpha channel
    let mut jpeg = Vec::new();
    img.to_rgb8()
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode photo: {}", e))?;

    let data_url = format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg));

    println!(
        "📷 Prepared photo: {} ({} KB)",
        path.display(),
        jpeg.len() / 1024
    );

    Ok(CapturedPhoto { jpeg, data_url })
}

/// Decode a stored image reference back into raw bytes for display.
///
/// Only embedded data URLs can be decoded locally; any other reference
/// yields None and the UI shows a placeholder instead.
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let (_, encoded) = url.split_once("base64,")?;
    BASE64.decode(encoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let url = format!("data:image/jpeg;base64,{}", BASE64.encode(b"coin"));
        assert_eq!(decode_data_url(&url), Some(b"coin".to_vec()));
    }

    #[test]
    fn test_decode_rejects_external_references() {
        assert_eq!(decode_data_url("https://example.com/coin.jpg"), None);
        assert_eq!(decode_data_url(""), None);
    }
}
