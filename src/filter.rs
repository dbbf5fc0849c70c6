//! Filter engine: derives the visible markers and paths.
//!
//! Filters are three independent maps from a marker attribute value to a
//! visibility flag. A missing key means visible. A linked path is shown only
//! when both of its markers are shown; freehand paths are always shown.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::{ElementId, Marker, Path};
use crate::workspace::Workspace;

/// Which marker attribute a filter keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Color,
    Area,
    Number,
}

impl FilterKind {
    /// Get the display name for this filter.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Color => "Color",
            FilterKind::Area => "Area",
            FilterKind::Number => "Number",
        }
    }

    /// The value `marker` is filtered by under this kind, if it has one.
    ///
    /// Markers without a color use `default_color`; empty area/number tags
    /// are not subject to filtering.
    pub fn key_of<'a>(&self, marker: &'a Marker, default_color: &'a str) -> Option<&'a str> {
        match self {
            FilterKind::Color => Some(marker.color_or(default_color)),
            FilterKind::Area => marker.area_tag(),
            FilterKind::Number => marker.number_tag(),
        }
    }
}

/// Visibility toggles keyed by marker color, area tag and number tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    colors: BTreeMap<String, bool>,
    areas: BTreeMap<String, bool>,
    numbers: BTreeMap<String, bool>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: FilterKind) -> &BTreeMap<String, bool> {
        match kind {
            FilterKind::Color => &self.colors,
            FilterKind::Area => &self.areas,
            FilterKind::Number => &self.numbers,
        }
    }

    fn map_mut(&mut self, kind: FilterKind) -> &mut BTreeMap<String, bool> {
        match kind {
            FilterKind::Color => &mut self.colors,
            FilterKind::Area => &mut self.areas,
            FilterKind::Number => &mut self.numbers,
        }
    }

    /// Whether `key` is visible under the given filter (absent keys are).
    pub fn is_visible(&self, kind: FilterKind, key: &str) -> bool {
        self.map(kind).get(key).copied().unwrap_or(true)
    }

    /// Set the visibility flag for a key.
    pub fn set(&mut self, kind: FilterKind, key: impl Into<String>, visible: bool) {
        let key = key.into();
        log::debug!("Filter {} '{}' -> {}", kind.name(), key, visible);
        self.map_mut(kind).insert(key, visible);
    }

    /// Entries of one filter in key order.
    pub fn entries(&self, kind: FilterKind) -> impl Iterator<Item = (&str, bool)> {
        self.map(kind).iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Make every key of every filter visible again.
    pub fn reset(&mut self) {
        for visible in self
            .colors
            .values_mut()
            .chain(self.areas.values_mut())
            .chain(self.numbers.values_mut())
        {
            *visible = true;
        }
    }

    /// Synchronize the color filter with the live set of marker colors.
    ///
    /// New colors are added as visible, colors no longer used are dropped,
    /// and existing flags are kept.
    pub fn sync_colors<'a>(
        &mut self,
        markers: impl IntoIterator<Item = &'a Marker>,
        default_color: &str,
    ) {
        let live: BTreeSet<String> = markers
            .into_iter()
            .map(|m| m.color_or(default_color).to_string())
            .collect();

        self.colors.retain(|color, _| live.contains(color));
        for color in live {
            self.colors.entry(color).or_insert(true);
        }
    }

    /// Whether a marker passes all three filters.
    pub fn marker_passes(&self, marker: &Marker, default_color: &str) -> bool {
        [FilterKind::Color, FilterKind::Area, FilterKind::Number]
            .into_iter()
            .all(|kind| {
                kind.key_of(marker, default_color)
                    .is_none_or(|key| self.is_visible(kind, key))
            })
    }
}

/// Distinct values of one marker attribute, sorted, for building filter lists.
pub fn distinct_keys<'a>(
    markers: impl IntoIterator<Item = &'a Marker>,
    kind: FilterKind,
    default_color: &str,
) -> Vec<String> {
    markers
        .into_iter()
        .filter_map(|m| kind.key_of(m, default_color).map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The visible subset of a workspace, in model order.
#[derive(Debug)]
pub struct FilterView<'a> {
    pub markers: Vec<&'a Marker>,
    pub paths: Vec<&'a Path>,
    marker_ids: HashSet<&'a ElementId>,
}

impl<'a> FilterView<'a> {
    /// Apply the workspace's filters to its markers and paths.
    pub fn new(workspace: &'a Workspace) -> Self {
        let filters = workspace.filters();
        let default_color = workspace.config().default_marker_color.as_str();

        let markers: Vec<&Marker> = workspace
            .markers()
            .filter(|m| filters.marker_passes(m, default_color))
            .collect();
        let marker_ids: HashSet<&ElementId> = markers.iter().map(|&m| &m.id).collect();

        let paths = workspace
            .paths()
            .filter(|p| match &p.linked_markers {
                None => true,
                Some(link) => {
                    marker_ids.contains(&link.start_id) && marker_ids.contains(&link.end_id)
                }
            })
            .collect();

        Self {
            markers,
            paths,
            marker_ids,
        }
    }

    pub fn is_marker_visible(&self, id: &ElementId) -> bool {
        self.marker_ids.contains(id)
    }

    pub fn is_path_visible(&self, id: &ElementId) -> bool {
        self.paths.iter().any(|p| &p.id == id)
    }
}
