//! Global constants for the planmark annotation core

/// Color assigned to markers that carry no explicit color.
pub const DEFAULT_MARKER_COLOR: &str = "#10b981";

/// Placeholder name for freshly placed markers.
pub const DEFAULT_MARKER_NAME: &str = "New marker";

/// Placeholder name for freshly drawn areas.
pub const DEFAULT_AREA_NAME: &str = "New area";

/// Smallest radius an area may have (image pixels).
pub const MIN_AREA_RADIUS: f64 = 1.0;

/// Namespaced local-storage key holding the workspace snapshot.
pub const STORAGE_KEY: &str = "planmark.workspace";

/// Id prefixes used when synthesizing element ids.
pub mod id_prefix {
    pub const MARKER: &str = "marker";
    pub const PATH: &str = "path";
    pub const AREA: &str = "area";
}

/// Styling used when building a flattened export.
pub mod flatten {
    /// Opacity of the area fill layer.
    pub const AREA_FILL_ALPHA: f32 = 0.2;
    /// Outline width for areas.
    pub const AREA_STROKE_WIDTH: f64 = 2.0;
    /// Stroke width for paths.
    pub const PATH_STROKE_WIDTH: f64 = 3.0;
    /// Outer halo radius around markers.
    pub const MARKER_HALO_RADIUS: f64 = 10.0;
    /// Opacity of the marker halo.
    pub const MARKER_HALO_ALPHA: f32 = 0.35;
    /// Radius of the solid marker core.
    pub const MARKER_CORE_RADIUS: f64 = 6.0;
    /// Vertical offset of a marker label above its position.
    pub const MARKER_LABEL_OFFSET: f64 = 14.0;
    /// Color used for areas and for labels.
    pub const AREA_COLOR: &str = "#3b82f6";
}
