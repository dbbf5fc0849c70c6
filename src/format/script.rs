//! Script-table export.
//!
//! Emits the markers and areas as a Lua-style table literal for use in game
//! scripts:
//!
//! ```text
//! return {
//!   markers = {
//!     { name = "Gate", number = "1", area = "North", x = 100, y = 50 },
//!   },
//!   areas = {
//!     { name = "Hall", number = "1", x = 200, y = 200, radius = 50, left = 150, top = 150, right = 250, bottom = 250 },
//!   },
//! }
//! ```
//!
//! Coordinates are rounded to whole pixels. Output depends only on the
//! workspace contents and their order.

use crate::model::{Area, Marker};
use crate::workspace::Workspace;

/// Render the workspace as a script table.
pub fn script_table(workspace: &Workspace) -> String {
    let mut out = String::from("return {\n");

    out.push_str("  markers = {\n");
    for marker in workspace.markers() {
        out.push_str(&format!("    {{ {} }},\n", marker_fields(marker).join(", ")));
    }
    out.push_str("  },\n");

    out.push_str("  areas = {\n");
    for area in workspace.areas() {
        out.push_str(&format!("    {{ {} }},\n", area_fields(area).join(", ")));
    }
    out.push_str("  },\n");

    out.push_str("}\n");
    out
}

fn marker_fields(marker: &Marker) -> Vec<String> {
    let mut fields = vec![format!("name = {}", quote(&marker.name))];
    if let Some(number) = marker.number_tag() {
        fields.push(format!("number = {}", quote(number)));
    }
    if let Some(area) = marker.area_tag() {
        fields.push(format!("area = {}", quote(area)));
    }
    fields.push(format!("x = {}", round(marker.position.x)));
    fields.push(format!("y = {}", round(marker.position.y)));
    fields
}

fn area_fields(area: &Area) -> Vec<String> {
    let mut fields = vec![format!("name = {}", quote(&area.name))];
    if let Some(number) = area.number.as_deref().filter(|n| !n.is_empty()) {
        fields.push(format!("number = {}", quote(number)));
    }
    fields.extend([
        format!("x = {}", round(area.center.x)),
        format!("y = {}", round(area.center.y)),
        format!("radius = {}", round(area.radius)),
        format!("left = {}", round(area.top_left.x)),
        format!("top = {}", round(area.top_left.y)),
        format!("right = {}", round(area.bottom_right.x)),
        format!("bottom = {}", round(area.bottom_right.y)),
    ]);
    fields
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Double-quoted string literal with Lua escapes.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
