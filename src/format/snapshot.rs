//! JSON plan snapshot: the persisted and exported form of a workspace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EditorConfig;
use crate::error::ImportError;
use crate::image_info;
use crate::model::{Area, Marker, Path};
use crate::normalize::normalize_areas;
use crate::workspace::Workspace;

/// Complete plan data: the image plus all annotations.
///
/// This is both the local-storage payload and the exported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// Plan image as a `data:` URI.
    pub image: String,
    pub markers: Vec<Marker>,
    pub paths: Vec<Path>,
    pub areas: Vec<Area>,
}

impl PlanSnapshot {
    /// Snapshot the current workspace state.
    pub fn capture(workspace: &Workspace, image: &str) -> Self {
        Self {
            image: image.to_string(),
            markers: workspace.markers().cloned().collect(),
            paths: workspace.paths().cloned().collect(),
            areas: workspace.areas().cloned().collect(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A successfully imported plan, ready to replace the current one.
#[derive(Debug, Clone)]
pub struct ImportedPlan {
    pub image: String,
    pub workspace: Workspace,
}

/// Export the workspace together with its image.
pub fn export_json(workspace: &Workspace, image: &str) -> Result<String, serde_json::Error> {
    PlanSnapshot::capture(workspace, image).to_json()
}

/// Parse a plan file into a fresh workspace.
///
/// The image must be present and `markers`/`paths` must be lists. Markers
/// without a name get the configured default name. Areas may
/// use any legacy shape and are normalized; unrecognized areas are dropped.
/// Nothing is applied on error, the caller keeps its current state.
pub fn import_json(json: &str, config: &EditorConfig) -> Result<ImportedPlan, ImportError> {
    let root: Value = serde_json::from_str(json)?;

    let image = match root.get("image") {
        Some(Value::String(image)) if !image.is_empty() => image.clone(),
        _ => return Err(ImportError::MissingImage),
    };
    let markers: Vec<Marker> = parse_entries(&root, "markers", |entry| {
        if let Value::Object(obj) = entry
            && !matches!(obj.get("name"), Some(Value::String(_)))
        {
            obj.insert(
                "name".to_string(),
                Value::String(config.default_marker_name.clone()),
            );
        }
    })?;
    let paths: Vec<Path> = parse_entries(&root, "paths", |_| {})?;

    let raw_areas = match root.get("areas") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => return Err(ImportError::NotASequence { field: "areas" }),
    };

    let image_size = match image_info::image_dimensions(&image) {
        Ok(size) => Some(size),
        Err(e) => {
            log::warn!("Image size unknown, areas left unclamped: {}", e);
            None
        }
    };
    let areas = normalize_areas(raw_areas, &config.default_area_name, image_size);

    log::info!(
        "Imported plan: {} markers, {} paths, {} areas",
        markers.len(),
        paths.len(),
        areas.len()
    );
    let workspace = Workspace::from_parts(config.clone(), markers, paths, areas, image_size);
    Ok(ImportedPlan { image, workspace })
}

/// Deserialize every entry of the list `field`, after letting `prepare` fill
/// in defaults on the raw value.
fn parse_entries<T: serde::de::DeserializeOwned>(
    root: &Value,
    field: &'static str,
    prepare: impl Fn(&mut Value),
) -> Result<Vec<T>, ImportError> {
    let Some(Value::Array(entries)) = root.get(field) else {
        return Err(ImportError::NotASequence { field });
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut entry = entry.clone();
            prepare(&mut entry);
            T::deserialize(entry).map_err(|e| ImportError::InvalidEntry {
                field,
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
