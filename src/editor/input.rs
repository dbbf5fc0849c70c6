//! Input events the presentation layer feeds into the editor.
//!
//! Hit testing belongs to the view: it reports which element (or handle)
//! received a click or press, and the editor decides what that means.

use crate::model::ElementId;

use super::state::Selection;

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// Empty canvas (the image background)
    Canvas,
    Marker(ElementId),
    Path(ElementId),
    Area(ElementId),
}

impl ClickTarget {
    /// The selection a select-tool click on this target produces.
    pub fn as_selection(&self) -> Option<Selection> {
        match self {
            ClickTarget::Canvas => None,
            ClickTarget::Marker(id) => Some(Selection::Marker(id.clone())),
            ClickTarget::Path(id) => Some(Selection::Path(id.clone())),
            ClickTarget::Area(id) => Some(Selection::Area(id.clone())),
        }
    }
}

/// What a pointer press landed on, for starting drags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    Marker(ElementId),
    /// Handle on an existing point of the selected path
    PathPoint { path: ElementId, index: usize },
    /// Handle in the middle of segment `segment` (between points
    /// `segment` and `segment + 1`) of the selected path
    PathMidpoint { path: ElementId, segment: usize },
    /// Center handle of the selected area
    AreaCenter(ElementId),
    /// Radius handle of the selected area
    AreaRadius(ElementId),
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Backspace,
    Other,
}
