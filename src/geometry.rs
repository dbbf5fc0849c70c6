//! Geometry utilities: points, circles, bounding boxes and smooth paths.
//!
//! Everything here is pure and stateless. Coordinates are image pixels.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::constants::MIN_AREA_RADIUS;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Approximate equality, for comparisons after floating-point arithmetic.
    pub fn approx_eq(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

/// Natural pixel dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clamp a point into `[0, width] x [0, height]`, each axis independently.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, f64::from(self.width)),
            point.y.clamp(0.0, f64::from(self.height)),
        )
    }
}

/// Clamp a radius up to the minimum, treating non-finite values as the minimum.
pub fn sanitize_radius(radius: f64) -> f64 {
    if radius.is_finite() && radius >= MIN_AREA_RADIUS {
        radius
    } else {
        MIN_AREA_RADIUS
    }
}

/// An axis-aligned box given by two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Create a box from two arbitrary corners, normalizing their order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            top_left: Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            bottom_right: Point::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    pub fn center(&self) -> Point {
        self.top_left.midpoint(&self.bottom_right)
    }

    /// Clamp both corners to the image, if its size is known.
    pub fn clamped(self, bounds: Option<ImageSize>) -> Self {
        match bounds {
            Some(size) => Self {
                top_left: size.clamp(self.top_left),
                bottom_right: size.clamp(self.bottom_right),
            },
            None => self,
        }
    }
}

/// A circle: the canonical representation of an area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Create a circle, raising the radius to the minimum if needed.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: sanitize_radius(radius),
        }
    }

    /// Derive the circle enclosed by a box: centered at its midpoint with the
    /// larger half-dimension as radius.
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let half_width = (bounds.width() / 2.0).abs();
        let half_height = (bounds.height() / 2.0).abs();
        Self::new(bounds.center(), half_width.max(half_height))
    }

    /// Bounding box of this circle, clamped to the image if its size is known.
    pub fn bounding_box(&self, image: Option<ImageSize>) -> BoundingBox {
        let r = self.radius;
        BoundingBox {
            top_left: Point::new(self.center.x - r, self.center.y - r),
            bottom_right: Point::new(self.center.x + r, self.center.y + r),
        }
        .clamped(image)
    }

    /// Position of the radius drag handle (east of the center).
    pub fn radius_handle(&self) -> Point {
        Point::new(self.center.x + self.radius, self.center.y)
    }
}

/// A drawing command of a smoothed polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `control` ending at `to`.
    QuadTo { control: Point, to: Point },
}

/// Smooth a polyline by curving through the midpoints of successive segments.
///
/// Every interior point becomes the control point of a quadratic curve that
/// ends at the midpoint of the following segment. The first and last points
/// are hit exactly.
pub fn smooth_path(points: &[Point]) -> Vec<PathSegment> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut segments = vec![PathSegment::MoveTo(*first)];
    if let Some((last, interior)) = rest.split_last() {
        for (i, control) in interior.iter().enumerate() {
            let next = interior.get(i + 1).unwrap_or(last);
            segments.push(PathSegment::QuadTo {
                control: *control,
                to: control.midpoint(next),
            });
        }
        segments.push(PathSegment::LineTo(*last));
    }
    segments
}

/// Render smoothed segments as SVG path data (`M`, `L`, `Q` commands).
pub fn to_svg_path_data(segments: &[PathSegment]) -> String {
    let mut data = String::new();
    for segment in segments {
        if !data.is_empty() {
            data.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = match segment {
            PathSegment::MoveTo(p) => write!(data, "M {} {}", p.x, p.y),
            PathSegment::LineTo(p) => write!(data, "L {} {}", p.x, p.y),
            PathSegment::QuadTo { control, to } => {
                write!(data, "Q {} {} {} {}", control.x, control.y, to.x, to.y)
            }
        };
    }
    data
}
