//! Plan image inspection: data URIs, natural dimensions and upload detection.
//!
//! The plan image travels as a `data:` URI inside snapshots. Its pixel size
//! is only needed for clamping area boxes, so a decode failure is not fatal:
//! callers fall back to an unknown size.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ImageError;
use crate::geometry::ImageSize;

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Extension of exported plan files.
pub const PLAN_EXTENSION: &str = "json";

/// Check if a filename has a supported image extension.
pub fn is_image_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type, e.g. `image/png` (empty when the URI omits it)
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Split and decode a base64 `data:` URI.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, ImageError> {
    let rest = uri.strip_prefix("data:").ok_or(ImageError::NotADataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::NotADataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(ImageError::NotADataUri)?;

    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}

/// Encode raw file bytes as a base64 `data:` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Natural pixel size of an image given as a data URI.
///
/// Only the image header is read.
pub fn image_dimensions(uri: &str) -> Result<ImageSize, ImageError> {
    let data = parse_data_uri(uri)?;
    let (width, height) = image::ImageReader::new(Cursor::new(data.bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .into_dimensions()?;
    log::debug!("Image dimensions {}x{} ({})", width, height, data.mime);
    Ok(ImageSize::new(width, height))
}

/// What a file picked by the user contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// A raster plan image
    Image,
    /// A JSON plan snapshot
    Plan,
}

impl UploadKind {
    /// Classify an upload by MIME type, falling back to the file extension.
    pub fn detect(filename: &str, mime: Option<&str>) -> Result<Self, ImageError> {
        match mime.map(str::to_ascii_lowercase).as_deref() {
            Some(m) if m.starts_with("image/") => return Ok(UploadKind::Image),
            Some("application/json") => return Ok(UploadKind::Plan),
            _ => {}
        }
        if is_image_file(filename) {
            return Ok(UploadKind::Image);
        }
        if extension(filename).as_deref() == Some(PLAN_EXTENSION) {
            return Ok(UploadKind::Plan);
        }
        Err(ImageError::UnsupportedFileType(
            mime.map_or_else(|| filename.to_string(), str::to_string),
        ))
    }
}
