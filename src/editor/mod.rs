//! Editing state machine.
//!
//! [`Editor`] turns pointer and keyboard gestures into workspace mutations.
//! It tracks the active tool (with its gesture sub-state), the marker awaiting
//! a link partner, and the current selection. All of these hold element ids
//! only; the [`Workspace`] passed into each call is the single owner of the
//! entities.
//!
//! Per click the precedence is: linking, then the active tool. Drags only
//! happen under the select tool and end on pointer release or when the
//! pointer leaves the drawing surface.
//!
//! Methods return `Ok(true)` when the workspace was mutated, so the caller
//! knows when to persist.

mod input;
mod state;

pub use input::{ClickTarget, Key, PressTarget};
pub use state::{AreaDrawing, Drag, PathDrawing, Selection, Tool, ToolState};

use crate::error::ModelError;
use crate::filter::{FilterKind, FilterView};
use crate::geometry::Point;
use crate::model::{AreaUpdate, ElementId, ElementKind, MarkerUpdate, PathUpdate};
use crate::workspace::Workspace;

/// Result of an editor operation: whether the workspace changed.
pub type EditResult = Result<bool, ModelError>;

/// Gesture and selection state of the editing surface.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    tool: ToolState,
    /// Marker waiting for a second marker to link to.
    linking: Option<ElementId>,
    selection: Option<Selection>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    pub fn tool(&self) -> Tool {
        self.tool.tool()
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tool
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn linking(&self) -> Option<&ElementId> {
        self.linking.as_ref()
    }

    /// Path currently extended by the path tool.
    pub fn drawing_path(&self) -> Option<&ElementId> {
        match &self.tool {
            ToolState::Path(PathDrawing::Extending { path_id }) => Some(path_id),
            _ => None,
        }
    }

    /// Area whose radius is being drawn, with its center.
    pub fn drawing_area(&self) -> Option<(&ElementId, Point)> {
        match &self.tool {
            ToolState::Area(AreaDrawing::AwaitingRadius { id, center }) => Some((id, *center)),
            _ => None,
        }
    }

    pub fn drag(&self) -> Option<&Drag> {
        match &self.tool {
            ToolState::Select { drag } => drag.as_ref(),
            _ => None,
        }
    }

    // ========================================================================
    // Tool and selection
    // ========================================================================

    /// Switch tools. Any gesture of the previous tool is abandoned; elements
    /// it created stay as they are.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool.tool() == tool {
            return;
        }
        log::debug!("Tool: {} -> {}", self.tool.tool().name(), tool.name());
        self.tool = ToolState::new(tool);
    }

    /// Select an element, or clear the selection.
    pub fn select(&mut self, selection: Option<Selection>) {
        if self.selection != selection {
            log::debug!("Selection: {:?}", selection);
            self.selection = selection;
        }
    }

    /// Enter linking mode from `marker`.
    pub fn begin_linking(&mut self, ws: &Workspace, marker: &ElementId) -> Result<(), ModelError> {
        if ws.marker(marker).is_none() {
            return Err(ModelError::UnknownMarker(marker.clone()));
        }
        log::debug!("Linking from marker {}", marker);
        self.linking = Some(marker.clone());
        Ok(())
    }

    pub fn cancel_linking(&mut self) {
        self.linking = None;
    }

    // ========================================================================
    // Pointer gestures
    // ========================================================================

    /// Handle a click at `pos` (image coordinates) on `target`.
    pub fn click(&mut self, ws: &mut Workspace, target: ClickTarget, pos: Point) -> EditResult {
        if let Some(origin) = self.linking.clone() {
            return match target {
                ClickTarget::Marker(id) if id != origin => {
                    let created = ws.link_markers(&origin, &id)?;
                    self.linking = None;
                    Ok(created.is_some())
                }
                _ => Ok(false),
            };
        }

        match &mut self.tool {
            ToolState::Select { .. } => {
                let selection = target.as_selection();
                self.selection = match selection {
                    Some(selection) if !is_shown(ws, &selection) => {
                        log::debug!("Ignoring click on hidden {:?}", selection);
                        None
                    }
                    selection => selection,
                };
                Ok(false)
            }
            ToolState::Marker => {
                let id = ws.add_marker(pos).id.clone();
                log::info!("Placed marker {}", id);
                ws.sync_filter_colors();
                Ok(true)
            }
            ToolState::Path(drawing) => {
                let active = match drawing {
                    PathDrawing::Extending { path_id } => Some(path_id.clone()),
                    PathDrawing::Idle => None,
                };
                let path_id = ws.add_path_point(active.as_ref(), pos)?;
                *drawing = PathDrawing::Extending { path_id };
                Ok(true)
            }
            ToolState::Area(drawing) => match drawing.clone() {
                AreaDrawing::Idle => {
                    let id = ws.add_area(pos).id.clone();
                    log::debug!("Area {} center placed", id);
                    *drawing = AreaDrawing::AwaitingRadius {
                        id: id.clone(),
                        center: pos,
                    };
                    self.selection = Some(Selection::Area(id));
                    Ok(true)
                }
                AreaDrawing::AwaitingRadius { id, center } => {
                    *drawing = AreaDrawing::Idle;
                    ws.update_area(&id, AreaUpdate::radius(center.distance_to(&pos)))?;
                    log::info!("Area {} committed", id);
                    Ok(true)
                }
            },
        }
    }

    /// Handle a pointer press; under the select tool this may start a drag.
    pub fn pointer_down(
        &mut self,
        ws: &mut Workspace,
        target: PressTarget,
        pos: Point,
    ) -> EditResult {
        if self.linking.is_some() {
            return Ok(false);
        }
        let selected = self.selection.clone();
        let ToolState::Select { drag } = &mut self.tool else {
            return Ok(false);
        };

        let (started, changed) = match target {
            PressTarget::Marker(id) => {
                if ws.marker(&id).is_none() {
                    return Err(ModelError::UnknownMarker(id));
                }
                (Some(Drag::Marker(id)), false)
            }
            PressTarget::PathPoint { path, index } => {
                if selected != Some(Selection::Path(path.clone())) {
                    return Ok(false);
                }
                let p = ws
                    .path(&path)
                    .ok_or_else(|| ModelError::UnknownPath(path.clone()))?;
                if index >= p.points.len() || p.is_pinned(index) {
                    log::debug!("Point {} of path {} is not draggable", index, path);
                    return Ok(false);
                }
                (Some(Drag::PathPoint { path, index }), false)
            }
            PressTarget::PathMidpoint { path, segment } => {
                if selected != Some(Selection::Path(path.clone())) {
                    return Ok(false);
                }
                let index = segment + 1;
                ws.insert_path_point(&path, pos, index)?;
                log::debug!("Inserted bend {} into path {}", index, path);
                (Some(Drag::PathPoint { path, index }), true)
            }
            PressTarget::AreaCenter(id) => {
                if selected != Some(Selection::Area(id.clone())) {
                    return Ok(false);
                }
                (Some(Drag::AreaCenter(id)), false)
            }
            PressTarget::AreaRadius(id) => {
                if selected != Some(Selection::Area(id.clone())) {
                    return Ok(false);
                }
                (Some(Drag::AreaRadius(id)), false)
            }
        };

        *drag = started;
        Ok(changed)
    }

    /// Handle pointer movement: previews an area radius or applies a drag.
    pub fn pointer_move(&mut self, ws: &mut Workspace, pos: Point) -> EditResult {
        match &self.tool {
            ToolState::Area(AreaDrawing::AwaitingRadius { id, center }) => {
                ws.update_area(id, AreaUpdate::radius(center.distance_to(&pos)))?;
                Ok(true)
            }
            ToolState::Select { drag: Some(drag) } => {
                log::trace!("Drag {:?} to ({:.1}, {:.1})", drag, pos.x, pos.y);
                match drag {
                    Drag::Marker(id) => ws.update_marker(id, MarkerUpdate::position(pos))?,
                    Drag::PathPoint { path, index } => ws.move_path_point(path, *index, pos)?,
                    Drag::AreaCenter(id) => ws.update_area(id, AreaUpdate::center(pos))?,
                    Drag::AreaRadius(id) => {
                        let center = ws
                            .area(id)
                            .ok_or_else(|| ModelError::UnknownArea(id.clone()))?
                            .center;
                        ws.update_area(id, AreaUpdate::radius(center.distance_to(&pos)))?;
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// End any drag in progress.
    pub fn pointer_up(&mut self) {
        if let ToolState::Select { drag } = &mut self.tool {
            if let Some(ended) = drag.take() {
                log::debug!("Drag ended: {:?}", ended);
            }
        }
    }

    /// The pointer left the drawing surface; treated exactly like a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Handle a key press. `text_input_focused` suppresses deletion so that
    /// Backspace keeps working in form fields.
    pub fn key_down(&mut self, ws: &mut Workspace, key: Key, text_input_focused: bool) -> EditResult {
        match key {
            Key::Escape => {
                self.escape();
                Ok(false)
            }
            Key::Enter => {
                if let ToolState::Area(drawing) = &mut self.tool {
                    if matches!(drawing, AreaDrawing::AwaitingRadius { .. }) {
                        log::debug!("Area committed with Enter");
                        *drawing = AreaDrawing::Idle;
                    }
                }
                Ok(false)
            }
            Key::Delete | Key::Backspace if !text_input_focused => self.delete_selected(ws),
            _ => Ok(false),
        }
    }

    /// Abandon linking, path drawing, area drawing and the selection.
    pub fn escape(&mut self) {
        self.linking = None;
        match &mut self.tool {
            ToolState::Path(drawing) => *drawing = PathDrawing::Idle,
            ToolState::Area(drawing) => *drawing = AreaDrawing::Idle,
            _ => {}
        }
        self.selection = None;
    }

    // ========================================================================
    // Edits routed through the editor
    // ========================================================================

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self, ws: &mut Workspace) -> EditResult {
        let Some(selection) = self.selection.take() else {
            return Ok(false);
        };
        match &selection {
            Selection::Marker(id) => {
                ws.delete_marker(id)?;
                ws.sync_filter_colors();
            }
            Selection::Path(id) => {
                ws.delete_path(id)?;
            }
            Selection::Area(id) => {
                ws.delete_area(id)?;
            }
        }
        log::info!("Deleted {} {}", selection.kind().name(), selection.id());
        self.reconcile(ws);
        Ok(true)
    }

    /// Edit marker fields, keeping the color filter in sync.
    pub fn update_marker(&mut self, ws: &mut Workspace, id: &ElementId, update: MarkerUpdate) -> EditResult {
        let recolor = update.touches_color();
        ws.update_marker(id, update)?;
        if recolor {
            ws.sync_filter_colors();
        }
        self.reconcile(ws);
        Ok(true)
    }

    pub fn update_path(&mut self, ws: &mut Workspace, id: &ElementId, update: PathUpdate) -> EditResult {
        ws.update_path(id, update)?;
        Ok(true)
    }

    pub fn update_area(&mut self, ws: &mut Workspace, id: &ElementId, update: AreaUpdate) -> EditResult {
        ws.update_area(id, update)?;
        Ok(true)
    }

    /// Remove the link from `from` to `to`.
    pub fn remove_link(&mut self, ws: &mut Workspace, from: &ElementId, to: &ElementId) -> EditResult {
        ws.remove_link(from, to)?;
        self.reconcile(ws);
        Ok(true)
    }

    /// Toggle a filter value; a selection it hides is cleared.
    pub fn set_filter(&mut self, ws: &mut Workspace, kind: FilterKind, key: &str, visible: bool) {
        ws.filters_mut().set(kind, key, visible);
        self.reconcile(ws);
    }

    /// Drop every reference to elements that no longer exist or are hidden.
    pub fn reconcile(&mut self, ws: &Workspace) {
        let view = FilterView::new(ws);

        if let Some(selection) = &self.selection {
            if !selection_visible(&view, ws, selection) {
                log::debug!("Selection {:?} no longer visible, clearing", selection);
                self.selection = None;
            }
        }

        if let Some(origin) = &self.linking {
            if !view.is_marker_visible(origin) {
                self.linking = None;
            }
        }

        match &mut self.tool {
            ToolState::Path(drawing) => {
                let gone = matches!(drawing, PathDrawing::Extending { path_id } if ws.path(path_id).is_none());
                if gone {
                    *drawing = PathDrawing::Idle;
                }
            }
            ToolState::Area(drawing) => {
                let gone = matches!(drawing, AreaDrawing::AwaitingRadius { id, .. } if ws.area(id).is_none());
                if gone {
                    *drawing = AreaDrawing::Idle;
                }
            }
            ToolState::Select { drag } => {
                let gone = drag.as_ref().is_some_and(|d| match d.element() {
                    (ElementKind::Marker, id) => ws.marker(id).is_none(),
                    (ElementKind::Path, id) => ws.path(id).is_none(),
                    (ElementKind::Area, id) => ws.area(id).is_none(),
                });
                if gone {
                    *drag = None;
                }
            }
            ToolState::Marker => {}
        }
    }
}

fn selection_visible(view: &FilterView<'_>, ws: &Workspace, selection: &Selection) -> bool {
    match selection {
        Selection::Marker(id) => view.is_marker_visible(id),
        Selection::Path(id) => view.is_path_visible(id),
        Selection::Area(id) => ws.area(id).is_some(),
    }
}

/// Whether `selection` names an element that exists and passes the filters.
fn is_shown(ws: &Workspace, selection: &Selection) -> bool {
    selection_visible(&FilterView::new(ws), ws, selection)
}
