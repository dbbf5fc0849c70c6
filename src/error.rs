//! Error types for the annotation core.

use thiserror::Error;

use crate::model::ElementId;

/// Referential and structural errors raised by the annotation model.
///
/// These signal programmer errors in the caller (an id that no longer
/// exists, an index past the end of a path) rather than user-facing
/// problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No marker with the given id
    #[error("Unknown marker: {0}")]
    UnknownMarker(ElementId),

    /// No path with the given id
    #[error("Unknown path: {0}")]
    UnknownPath(ElementId),

    /// No area with the given id
    #[error("Unknown area: {0}")]
    UnknownArea(ElementId),

    /// Point index outside the path's point sequence
    #[error("Index {index} out of range for path {path} with {len} points")]
    IndexOutOfRange {
        /// The path being edited
        path: ElementId,
        /// The rejected index
        index: usize,
        /// Number of points in the path
        len: usize,
    },

    /// Attempt to move or displace an endpoint pinned to a marker
    #[error("Point {index} of path {path} is pinned to a linked marker")]
    PinnedEndpoint {
        /// The linked path
        path: ElementId,
        /// The pinned point index
        index: usize,
    },

    /// A path update would leave the path with too few points
    #[error("Path {path} needs at least {min} points")]
    TooFewPoints {
        /// The path being edited
        path: ElementId,
        /// Minimum number of points for this path
        min: usize,
    },
}

/// Errors raised while importing a plan snapshot.
#[derive(Error, Debug)]
pub enum ImportError {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot has no image
    #[error("Missing required field: image")]
    MissingImage,

    /// A top-level collection is not an array
    #[error("Field '{field}' must be a list")]
    NotASequence {
        /// Name of the offending field
        field: &'static str,
    },

    /// An entry of a collection could not be read
    #[error("Invalid {field} entry at index {index}: {message}")]
    InvalidEntry {
        /// Collection the entry belongs to
        field: &'static str,
        /// Position of the entry
        index: usize,
        /// Description of the problem
        message: String,
    },
}

/// Errors raised while inspecting image data.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The string is not a `data:` URI
    #[error("Not a data URI")]
    NotADataUri,

    /// The payload is not valid base64
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload could not be decoded as an image
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The file picked by the user is neither an image nor a plan
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The image size could not be determined, so it cannot be flattened
    #[error("Image dimensions unknown")]
    UnknownDimensions,
}

/// Errors raised by a key-value storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Snapshot serialization failed
    #[error("Failed to serialize workspace: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend-specific failure (quota exceeded, storage unavailable)
    #[error("Storage error: {0}")]
    Backend(String),
}
