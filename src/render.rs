//! Flattened-image export.
//!
//! [`FlattenPlan::build`] turns the visible part of a workspace into an
//! ordered list of draw operations at the image's native resolution:
//! base image, then areas, then paths, then markers. Rasterizing the plan
//! is left to a [`Flattener`] supplied by the host (an offscreen canvas in
//! the browser).

use crate::constants::flatten as style;
use crate::error::ImageError;
use crate::filter::FilterView;
use crate::geometry::{PathSegment, Point, smooth_path};
use crate::workspace::Workspace;

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f32::from(v) / 255.0);
        match digits.len() {
            6 => Some(Self::new(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
                1.0,
            )),
            3 => {
                let short = |i: usize| -> Option<f32> {
                    let d = digits.get(i..i + 1)?;
                    channel(&d.repeat(2))
                };
                Some(Self::new(short(0)?, short(1)?, short(2)?, 1.0))
            }
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// A single drawing command in image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// The plan image, drawn at `(0, 0)` with its natural size
    Image { data_uri: String, width: u32, height: u32 },
    /// Filled and/or outlined circle
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Open smoothed polyline
    Path { segments: Vec<PathSegment>, stroke: Stroke },
    /// Text centered on `at`
    Label { text: String, at: Point, color: Color },
}

/// Stroke style. Joins and caps are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Ordered draw list for one flattened export.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenPlan {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl FlattenPlan {
    /// Build the draw list from the filtered view of `workspace`.
    ///
    /// Fails when the image size is unknown (the image never decoded).
    pub fn build(workspace: &Workspace, image: &str) -> Result<Self, ImageError> {
        let size = workspace.image_size().ok_or(ImageError::UnknownDimensions)?;
        let view = FilterView::new(workspace);
        let default_color = workspace.config().default_marker_color.as_str();
        let fallback = Color::from_hex(default_color).unwrap_or(Color::WHITE);
        let area_color = Color::from_hex(style::AREA_COLOR).unwrap_or(fallback);

        let mut ops = vec![DrawOp::Image {
            data_uri: image.to_string(),
            width: size.width,
            height: size.height,
        }];

        for area in workspace.areas() {
            ops.push(DrawOp::Circle {
                center: area.center,
                radius: area.radius,
                fill: Some(area_color.with_alpha(style::AREA_FILL_ALPHA)),
                stroke: Some(Stroke {
                    color: area_color,
                    width: style::AREA_STROKE_WIDTH,
                }),
            });
            if !area.name.is_empty() {
                ops.push(DrawOp::Label {
                    text: area.name.clone(),
                    at: area.center,
                    color: area_color,
                });
            }
        }

        for path in &view.paths {
            let color = path
                .color
                .as_deref()
                .and_then(Color::from_hex)
                .unwrap_or(fallback);
            ops.push(DrawOp::Path {
                segments: smooth_path(&path.points),
                stroke: Stroke {
                    color,
                    width: style::PATH_STROKE_WIDTH,
                },
            });
        }

        for marker in &view.markers {
            let color = Color::from_hex(marker.color_or(default_color)).unwrap_or(fallback);
            ops.push(DrawOp::Circle {
                center: marker.position,
                radius: style::MARKER_HALO_RADIUS,
                fill: Some(color.with_alpha(style::MARKER_HALO_ALPHA)),
                stroke: None,
            });
            ops.push(DrawOp::Circle {
                center: marker.position,
                radius: style::MARKER_CORE_RADIUS,
                fill: Some(color),
                stroke: Some(Stroke {
                    color: Color::WHITE,
                    width: 1.0,
                }),
            });
            if let Some(number) = marker.number_tag() {
                ops.push(DrawOp::Label {
                    text: number.to_string(),
                    at: Point::new(
                        marker.position.x,
                        marker.position.y - style::MARKER_LABEL_OFFSET,
                    ),
                    color,
                });
            }
        }

        log::debug!(
            "Flatten plan {}x{} with {} ops",
            size.width,
            size.height,
            ops.len()
        );
        Ok(Self {
            width: size.width,
            height: size.height,
            ops,
        })
    }
}

/// Rasterizes a [`FlattenPlan`] into an encoded image (PNG).
pub trait Flattener {
    type Error;

    fn flatten(&mut self, plan: &FlattenPlan) -> Result<Vec<u8>, Self::Error>;
}
