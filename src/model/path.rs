//! Path data model: freehand polylines and marker links.

use serde::{Deserialize, Serialize};

use super::id::{ElementId, Entity};
use crate::geometry::Point;

/// The two markers a linked path connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerLink {
    pub start_id: ElementId,
    pub end_id: ElementId,
}

impl MarkerLink {
    pub fn new(start_id: ElementId, end_id: ElementId) -> Self {
        Self { start_id, end_id }
    }

    /// Whether either end references `marker`.
    pub fn involves(&self, marker: &ElementId) -> bool {
        &self.start_id == marker || &self.end_id == marker
    }
}

/// An ordered polyline, either freehand or pinned between two markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub id: ElementId,
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_markers: Option<MarkerLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Path {
    /// A single-point freehand path.
    pub fn freehand(id: ElementId, start: Point) -> Self {
        Self {
            id,
            points: vec![start],
            linked_markers: None,
            color: None,
        }
    }

    /// A two-point path pinned to the given markers.
    pub fn linked(id: ElementId, link: MarkerLink, start: Point, end: Point) -> Self {
        Self {
            id,
            points: vec![start, end],
            linked_markers: Some(link),
            color: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked_markers.is_some()
    }

    /// Whether the point at `index` is pinned to a marker and cannot be dragged.
    pub fn is_pinned(&self, index: usize) -> bool {
        self.is_linked() && (index == 0 || index + 1 == self.points.len())
    }

    /// Whether this path is the link from `from` to `to`.
    pub fn links(&self, from: &ElementId, to: &ElementId) -> bool {
        self.linked_markers
            .as_ref()
            .is_some_and(|link| &link.start_id == from && &link.end_id == to)
    }

    /// Pin the first and last points to the given positions.
    pub(crate) fn pin_endpoints(&mut self, start: Option<Point>, end: Option<Point>) {
        if let (Some(start), Some(first)) = (start, self.points.first_mut()) {
            *first = start;
        }
        if let (Some(end), Some(last)) = (end, self.points.last_mut()) {
            *last = end;
        }
    }
}

impl Entity for Path {
    fn id(&self) -> &ElementId {
        &self.id
    }
}

/// Partial update of a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathUpdate {
    pub points: Option<Vec<Point>>,
    pub color: Option<Option<String>>,
}

impl PathUpdate {
    pub fn points(points: Vec<Point>) -> Self {
        Self {
            points: Some(points),
            ..Self::default()
        }
    }

    pub fn color(color: Option<String>) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }
}
