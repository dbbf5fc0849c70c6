//! Normalization of imported and persisted areas.
//!
//! Plan files written over time carry areas in three shapes: the current
//! circle form, an older bounding-box form, and the first polygon form.
//! Each raw entry is classified once into an [`AreaShape`] and then folded
//! into the canonical circle + box [`Area`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::constants::id_prefix;
use crate::geometry::{BoundingBox, Circle, ImageSize, Point};
use crate::model::{Area, ElementId};

/// Geometry detected on a raw area entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaShape {
    /// `center` + `radius`
    Circle { center: Point, radius: f64 },
    /// `topLeft` + `bottomRight`
    Box { top_left: Point, bottom_right: Point },
    /// Legacy `points` polygon with at least one vertex
    Polygon { points: Vec<Point> },
    Unrecognized,
}

impl AreaShape {
    /// Classify a raw entry. Circle wins over box, box over polygon.
    pub fn detect(entry: &Value) -> Self {
        let Some(obj) = entry.as_object() else {
            return AreaShape::Unrecognized;
        };

        if let (Some(center), Some(radius)) = (field::<Point>(obj, "center"), field::<f64>(obj, "radius")) {
            return AreaShape::Circle { center, radius };
        }
        if let (Some(top_left), Some(bottom_right)) = (
            field::<Point>(obj, "topLeft"),
            field::<Point>(obj, "bottomRight"),
        ) {
            return AreaShape::Box {
                top_left,
                bottom_right,
            };
        }
        match field::<Vec<Point>>(obj, "points") {
            Some(points) if !points.is_empty() => AreaShape::Polygon { points },
            _ => AreaShape::Unrecognized,
        }
    }

    /// The canonical circle for this shape, if it has one.
    pub fn to_circle(&self) -> Option<Circle> {
        match self {
            AreaShape::Circle { center, radius } => Some(Circle::new(*center, *radius)),
            AreaShape::Box {
                top_left,
                bottom_right,
            } => Some(Circle::from_bounds(&BoundingBox::from_corners(
                *top_left,
                *bottom_right,
            ))),
            AreaShape::Polygon { points } => Some(polygon_circle(points)),
            AreaShape::Unrecognized => None,
        }
    }
}

/// Circle centered on the vertex centroid, reaching the farthest vertex.
fn polygon_circle(points: &[Point]) -> Circle {
    let n = points.len().max(1) as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let centroid = Point::new(sum_x / n, sum_y / n);
    let radius = points
        .iter()
        .map(|p| centroid.distance_to(p))
        .fold(0.0, f64::max);
    Circle::new(centroid, radius)
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

/// Area tags may have been stored as numbers.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert heterogeneous raw area entries into canonical areas.
///
/// Entries matching no known shape are dropped. Missing ids are synthesized
/// and missing names fall back to `default_name`.
pub fn normalize_areas(raw: &[Value], default_name: &str, image: Option<ImageSize>) -> Vec<Area> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let shape = AreaShape::detect(entry);
            let Some(circle) = shape.to_circle() else {
                log::warn!("Dropping unrecognized area entry at index {}", index);
                return None;
            };
            let obj = entry.as_object()?;

            let id = field::<ElementId>(obj, "id")
                .unwrap_or_else(|| ElementId::generate(id_prefix::AREA));
            let name = text_field(obj, "name").unwrap_or_else(|| default_name.to_string());
            let mut area = Area::new(id, name, circle, image);
            area.number = text_field(obj, "number");
            Some(area)
        })
        .collect()
}
