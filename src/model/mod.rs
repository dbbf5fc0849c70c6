//! Data models for planmark: markers, paths and areas.

mod area;
mod id;
mod marker;
mod path;

pub use area::{Area, AreaUpdate};
pub use id::{ElementId, Entity, EntityMap};
pub use marker::{Marker, MarkerStatus, MarkerUpdate};
pub use path::{MarkerLink, Path, PathUpdate};

/// Kind of an annotation element, used to tag selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Marker,
    Path,
    Area,
}

impl ElementKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Marker => "Marker",
            ElementKind::Path => "Path",
            ElementKind::Area => "Area",
        }
    }
}
