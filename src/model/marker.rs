//! Marker data model: labeled points of interest.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::{ElementId, Entity};
use crate::geometry::Point;

/// Progress status of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// A labeled point annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: ElementId,
    pub name: String,
    /// Display label, usually a sequential number.
    #[serde(
        default,
        deserialize_with = "text_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    /// Free-text grouping tag. Not a reference to an [`Area`](super::Area).
    #[serde(
        default,
        deserialize_with = "text_tag",
        skip_serializing_if = "Option::is_none"
    )]
    pub area: Option<String>,
    pub position: Point,
    #[serde(default)]
    pub status: MarkerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Markers this one links to, in link order, without duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_marker_ids: Vec<ElementId>,
}

/// Tags may have been stored as numbers; read them back as text.
fn text_tag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number tag, found {}",
            other
        ))),
    }
}

impl Marker {
    pub fn new(id: ElementId, name: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            name: name.into(),
            number: None,
            area: None,
            position,
            status: MarkerStatus::Pending,
            color: None,
            linked_marker_ids: Vec::new(),
        }
    }

    /// Color to draw and filter with, falling back to `default` when unset.
    pub fn color_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.color.as_deref().unwrap_or(default)
    }

    /// Non-empty area tag, if any.
    pub fn area_tag(&self) -> Option<&str> {
        self.area.as_deref().filter(|s| !s.is_empty())
    }

    /// Non-empty number tag, if any.
    pub fn number_tag(&self) -> Option<&str> {
        self.number.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_linked_to(&self, other: &ElementId) -> bool {
        self.linked_marker_ids.contains(other)
    }
}

impl Entity for Marker {
    fn id(&self) -> &ElementId {
        &self.id
    }
}

/// Partial update of a marker's editable fields.
///
/// `None` leaves a field untouched; for optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerUpdate {
    pub name: Option<String>,
    pub number: Option<Option<String>>,
    pub area: Option<Option<String>>,
    pub position: Option<Point>,
    pub status: Option<MarkerStatus>,
    pub color: Option<Option<String>>,
}

impl MarkerUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_area(mut self, area: Option<String>) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_number(mut self, number: Option<String>) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_status(mut self, status: MarkerStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether applying this update changes the color set used by filters.
    pub fn touches_color(&self) -> bool {
        self.color.is_some()
    }

    pub(crate) fn apply_to(self, marker: &mut Marker) {
        if let Some(name) = self.name {
            marker.name = name;
        }
        if let Some(number) = self.number {
            marker.number = number;
        }
        if let Some(area) = self.area {
            marker.area = area;
        }
        if let Some(position) = self.position {
            marker.position = position;
        }
        if let Some(status) = self.status {
            marker.status = status;
        }
        if let Some(color) = self.color {
            marker.color = color;
        }
    }
}
