//! Editor state types: tools, per-tool gesture sub-states and selection.

use crate::geometry::Point;
use crate::model::{ElementId, ElementKind};

/// Annotation tools available in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Selecting, dragging and editing existing elements
    #[default]
    Select,
    /// Placing markers
    Marker,
    /// Drawing freehand paths
    Path,
    /// Drawing circular areas
    Area,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Marker => "Marker",
            Tool::Path => "Path",
            Tool::Area => "Area",
        }
    }
}

/// Progress of the path tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PathDrawing {
    /// The next click starts a new path.
    #[default]
    Idle,
    /// Clicks extend this path.
    Extending { path_id: ElementId },
}

/// Progress of the two-click area gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AreaDrawing {
    /// The next click places a center.
    #[default]
    Idle,
    /// Center placed; pointer movement previews the radius until the next
    /// click or Enter commits it.
    AwaitingRadius { id: ElementId, center: Point },
}

/// What a select-tool drag is moving.
#[derive(Debug, Clone, PartialEq)]
pub enum Drag {
    Marker(ElementId),
    PathPoint { path: ElementId, index: usize },
    AreaCenter(ElementId),
    AreaRadius(ElementId),
}

impl Drag {
    /// The element being dragged.
    pub fn element(&self) -> (ElementKind, &ElementId) {
        match self {
            Drag::Marker(id) => (ElementKind::Marker, id),
            Drag::PathPoint { path, .. } => (ElementKind::Path, path),
            Drag::AreaCenter(id) | Drag::AreaRadius(id) => (ElementKind::Area, id),
        }
    }
}

/// The active tool together with its gesture state.
///
/// Gesture state lives inside the variant of the tool that owns it, so an
/// in-progress area cannot exist while the path tool is active, and drags
/// only exist under the select tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    Select { drag: Option<Drag> },
    Marker,
    Path(PathDrawing),
    Area(AreaDrawing),
}

impl ToolState {
    /// Fresh state for a tool, with no gesture in progress.
    pub fn new(tool: Tool) -> Self {
        match tool {
            Tool::Select => ToolState::Select { drag: None },
            Tool::Marker => ToolState::Marker,
            Tool::Path => ToolState::Path(PathDrawing::Idle),
            Tool::Area => ToolState::Area(AreaDrawing::Idle),
        }
    }

    pub fn tool(&self) -> Tool {
        match self {
            ToolState::Select { .. } => Tool::Select,
            ToolState::Marker => Tool::Marker,
            ToolState::Path(_) => Tool::Path,
            ToolState::Area(_) => Tool::Area,
        }
    }
}

impl Default for ToolState {
    fn default() -> Self {
        ToolState::new(Tool::default())
    }
}

/// The single selected element, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Marker(ElementId),
    Path(ElementId),
    Area(ElementId),
}

impl Selection {
    pub fn kind(&self) -> ElementKind {
        match self {
            Selection::Marker(_) => ElementKind::Marker,
            Selection::Path(_) => ElementKind::Path,
            Selection::Area(_) => ElementKind::Area,
        }
    }

    pub fn id(&self) -> &ElementId {
        match self {
            Selection::Marker(id) | Selection::Path(id) | Selection::Area(id) => id,
        }
    }
}
