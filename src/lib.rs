//! planmark - floor plan annotation core
//!
//! The model and editing logic behind a client-side plan annotator: markers,
//! marker-to-marker links drawn as paths, freehand paths and circular areas
//! over a raster image. The presentation layer does hit testing and drawing;
//! it feeds gestures into an [`Editor`], reads the [`Workspace`] through a
//! [`FilterView`], and lets a [`PlanStore`] handle persistence.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod filter;
pub mod format;
pub mod geometry;
pub mod image_info;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod render;
pub mod store;
pub mod workspace;

pub use config::{EditorConfig, LogLevel};
pub use editor::{ClickTarget, Editor, Key, PressTarget, Selection, Tool};
pub use error::{ImageError, ImportError, ModelError, StorageError};
pub use filter::{FilterKind, FilterView, Filters};
pub use geometry::{ImageSize, Point};
pub use model::{Area, ElementId, Marker, MarkerStatus, Path};
pub use store::{KeyValueStore, MemoryStore, PlanStore};
pub use workspace::Workspace;

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;
