//! Area data model: circular regions with a derived bounding box.

use serde::{Deserialize, Serialize};

use super::id::{ElementId, Entity};
use crate::geometry::{BoundingBox, Circle, ImageSize, Point};

/// A circular region of interest.
///
/// The circle (`center`, `radius`) is canonical. `top_left`/`bottom_right`
/// always hold the circle's bounding box clamped to the image; box edits are
/// folded back through the circle rather than stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub center: Point,
    pub radius: f64,
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Area {
    pub fn new(id: ElementId, name: impl Into<String>, circle: Circle, image: Option<ImageSize>) -> Self {
        let mut area = Self {
            id,
            name: name.into(),
            number: None,
            center: circle.center,
            radius: circle.radius,
            top_left: circle.center,
            bottom_right: circle.center,
        };
        area.set_circle(circle, image);
        area
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            top_left: self.top_left,
            bottom_right: self.bottom_right,
        }
    }

    /// Replace the circle and recompute the clamped box.
    pub(crate) fn set_circle(&mut self, circle: Circle, image: Option<ImageSize>) {
        let circle = Circle::new(circle.center, circle.radius);
        let bounds = circle.bounding_box(image);
        self.center = circle.center;
        self.radius = circle.radius;
        self.top_left = bounds.top_left;
        self.bottom_right = bounds.bottom_right;
    }

    /// Replace the geometry from a box edit: clamp, derive the circle, then
    /// recompute the box from that circle.
    pub(crate) fn set_bounds(&mut self, bounds: BoundingBox, image: Option<ImageSize>) {
        let clamped = bounds.clamped(image);
        self.set_circle(Circle::from_bounds(&clamped), image);
    }

    pub(crate) fn apply_update(&mut self, update: AreaUpdate, image: Option<ImageSize>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(number) = update.number {
            self.number = number;
        }

        if update.top_left.is_some() || update.bottom_right.is_some() {
            let top_left = update.top_left.unwrap_or(self.top_left);
            let bottom_right = update.bottom_right.unwrap_or(self.bottom_right);
            self.set_bounds(BoundingBox::from_corners(top_left, bottom_right), image);
        } else {
            let center = update.center.unwrap_or(self.center);
            let radius = update.radius.unwrap_or(self.radius);
            self.set_circle(Circle::new(center, radius), image);
        }
    }
}

impl Entity for Area {
    fn id(&self) -> &ElementId {
        &self.id
    }
}

/// Partial update of an area.
///
/// When either corner is present the update takes the box edit path and
/// `center`/`radius` are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaUpdate {
    pub name: Option<String>,
    pub number: Option<Option<String>>,
    pub center: Option<Point>,
    pub radius: Option<f64>,
    pub top_left: Option<Point>,
    pub bottom_right: Option<Point>,
}

impl AreaUpdate {
    pub fn center(center: Point) -> Self {
        Self {
            center: Some(center),
            ..Self::default()
        }
    }

    pub fn radius(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left: Some(top_left),
            bottom_right: Some(bottom_right),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_at(x: f64, y: f64, radius: f64) -> Area {
        Area::new(
            ElementId::from("a1"),
            "Zone",
            Circle::new(Point::new(x, y), radius),
            None,
        )
    }

    #[test]
    fn test_box_edit_goes_through_circle() {
        let mut area = area_at(50.0, 50.0, 10.0);
        area.apply_update(
            AreaUpdate::corners(Point::new(0.0, 0.0), Point::new(40.0, 20.0)),
            None,
        );
        assert_eq!(area.center, Point::new(20.0, 10.0));
        assert_eq!(area.radius, 20.0);
        // Non-square input is normalized to the circle's square box.
        assert_eq!(area.top_left, Point::new(0.0, -10.0));
        assert_eq!(area.bottom_right, Point::new(40.0, 30.0));
    }

    #[test]
    fn test_single_corner_edit_keeps_other_corner() {
        let mut area = area_at(50.0, 50.0, 10.0);
        area.apply_update(
            AreaUpdate {
                bottom_right: Some(Point::new(80.0, 80.0)),
                ..AreaUpdate::default()
            },
            None,
        );
        assert_eq!(area.center, Point::new(60.0, 60.0));
        assert_eq!(area.radius, 20.0);
    }

    #[test]
    fn test_box_edit_clamps_corners_first() {
        let mut area = area_at(50.0, 50.0, 10.0);
        area.apply_update(
            AreaUpdate::corners(Point::new(-20.0, 10.0), Point::new(20.0, 30.0)),
            Some(ImageSize::new(100, 100)),
        );
        // Corners clamp to (0,10)-(20,30) before the circle is derived.
        assert_eq!(area.center, Point::new(10.0, 20.0));
        assert_eq!(area.radius, 10.0);
        assert_eq!(area.top_left, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_radius_never_below_minimum() {
        let mut area = area_at(50.0, 50.0, 10.0);
        for proposed in [0.0, -5.0, f64::NAN, f64::NEG_INFINITY] {
            area.apply_update(AreaUpdate::radius(proposed), None);
            assert_eq!(area.radius, 1.0);
        }
    }
}
