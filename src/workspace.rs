//! The annotation model: markers, paths, areas and their filters.
//!
//! [`Workspace`] owns every entity of a loaded plan and enforces the
//! consistency rules between them:
//! - a linked path's first and last points always sit on its two markers
//! - deleting a marker removes it from every link list and deletes the paths
//!   linked to it
//! - an area's box is always the clamped bounding box of its circle
//!
//! Every public operation validates ids before touching anything, so a failed
//! call leaves the workspace unchanged.

use crate::config::EditorConfig;
use crate::constants::id_prefix;
use crate::error::ModelError;
use crate::filter::Filters;
use crate::geometry::{Circle, ImageSize, Point};
use crate::model::{
    Area, AreaUpdate, ElementId, EntityMap, Marker, MarkerLink, MarkerUpdate, Path, PathUpdate,
};

/// Minimum number of points of a linked path (one per marker).
const MIN_LINKED_POINTS: usize = 2;

/// All annotation state of one loaded plan.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    config: EditorConfig,
    markers: EntityMap<Marker>,
    paths: EntityMap<Path>,
    areas: EntityMap<Area>,
    filters: Filters,
    /// Natural size of the plan image, when it has been decoded.
    image_size: Option<ImageSize>,
}

impl Workspace {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a workspace from loaded entities, repairing broken references.
    ///
    /// Dangling and duplicate link ids are dropped, as are linked paths whose
    /// markers are missing or that repeat an earlier link. Link lists and
    /// linked paths are then made to agree: a path restores its link id and a
    /// link id without a path gets one. Pinned endpoints are re-synced and
    /// area boxes are recomputed against the image size.
    pub fn from_parts(
        config: EditorConfig,
        markers: Vec<Marker>,
        paths: Vec<Path>,
        areas: Vec<Area>,
        image_size: Option<ImageSize>,
    ) -> Self {
        let mut workspace = Self {
            config,
            image_size,
            markers: markers.into_iter().collect(),
            ..Self::default()
        };

        let known: Vec<ElementId> = workspace.markers.iter().map(|m| m.id.clone()).collect();
        for marker in workspace.markers.iter_mut() {
            let before = marker.linked_marker_ids.len();
            let mut seen = Vec::with_capacity(before);
            for id in marker.linked_marker_ids.drain(..) {
                if known.contains(&id) && id != marker.id && !seen.contains(&id) {
                    seen.push(id);
                }
            }
            if seen.len() != before {
                log::warn!(
                    "Dropped {} invalid link(s) from marker {}",
                    before - seen.len(),
                    marker.id
                );
            }
            marker.linked_marker_ids = seen;
        }

        for mut path in paths {
            if path.points.is_empty() {
                log::warn!("Dropped path {} without points", path.id);
                continue;
            }
            if let Some(link) = &path.linked_markers {
                let (Some(start), Some(end)) = (
                    workspace.markers.get(&link.start_id),
                    workspace.markers.get(&link.end_id),
                ) else {
                    log::warn!("Dropped path {} linked to a missing marker", path.id);
                    continue;
                };
                if link.start_id == link.end_id
                    || workspace.paths.iter().any(|p| p.links(&link.start_id, &link.end_id))
                {
                    log::warn!("Dropped duplicate link path {}", path.id);
                    continue;
                }
                if path.points.len() < MIN_LINKED_POINTS {
                    path.points = vec![start.position, end.position];
                }
                path.pin_endpoints(Some(start.position), Some(end.position));
            }
            workspace.paths.insert(path);
        }

        // Every link id needs exactly one path behind it, and the other way round.
        let path_links: Vec<MarkerLink> = workspace
            .paths
            .iter()
            .filter_map(|p| p.linked_markers.clone())
            .collect();
        for link in path_links {
            if let Some(start) = workspace.markers.get_mut(&link.start_id)
                && !start.is_linked_to(&link.end_id)
            {
                log::warn!("Restored link {} -> {} from its path", link.start_id, link.end_id);
                start.linked_marker_ids.push(link.end_id);
            }
        }
        let missing: Vec<(ElementId, ElementId)> = workspace
            .markers
            .iter()
            .flat_map(|m| m.linked_marker_ids.iter().map(|to| (m.id.clone(), to.clone())))
            .filter(|(from, to)| !workspace.paths.iter().any(|p| p.links(from, to)))
            .collect();
        for (from, to) in missing {
            let (Some(source), Some(target)) =
                (workspace.markers.get(&from), workspace.markers.get(&to))
            else {
                continue;
            };
            let mut path = Path::linked(
                ElementId::generate(id_prefix::PATH),
                MarkerLink::new(from.clone(), to.clone()),
                source.position,
                target.position,
            );
            path.color = source.color.clone();
            log::warn!("Created missing path {} for link {} -> {}", path.id, from, to);
            workspace.paths.insert(path);
        }

        for mut area in areas {
            let circle = area.circle();
            area.set_circle(circle, image_size);
            workspace.areas.insert(area);
        }

        workspace.sync_filter_colors();
        workspace
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn marker(&self, id: &ElementId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn path(&self, id: &ElementId) -> Option<&Path> {
        self.paths.get(id)
    }

    pub fn area(&self, id: &ElementId) -> Option<&Area> {
        self.areas.get(id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    /// Set (or forget) the image size and re-clamp every area box.
    pub fn set_image_size(&mut self, image_size: Option<ImageSize>) {
        self.image_size = image_size;
        for area in self.areas.iter_mut() {
            let circle = area.circle();
            area.set_circle(circle, image_size);
        }
    }

    /// Recompute the color filter keys from the current markers.
    ///
    /// Call after any operation that adds, removes or recolors markers.
    pub fn sync_filter_colors(&mut self) {
        self.filters
            .sync_colors(self.markers.iter(), &self.config.default_marker_color);
    }

    fn marker_or_err(&self, id: &ElementId) -> Result<&Marker, ModelError> {
        self.markers
            .get(id)
            .ok_or_else(|| ModelError::UnknownMarker(id.clone()))
    }

    fn path_or_err(&self, id: &ElementId) -> Result<&Path, ModelError> {
        self.paths
            .get(id)
            .ok_or_else(|| ModelError::UnknownPath(id.clone()))
    }

    // ========================================================================
    // Markers
    // ========================================================================

    /// Place a new pending marker with the next sequential number.
    pub fn add_marker(&mut self, position: Point) -> &Marker {
        let id = ElementId::generate(id_prefix::MARKER);
        let mut marker = Marker::new(id.clone(), self.config.default_marker_name.clone(), position);
        marker.number = Some((self.markers.len() + 1).to_string());
        marker.color = Some(self.config.default_marker_color.clone());
        log::debug!("Added marker {} at ({:.1}, {:.1})", id, position.x, position.y);

        self.markers.insert(marker);
        &self.markers[&id]
    }

    /// Merge fields into a marker, re-syncing linked paths when it moves.
    pub fn update_marker(&mut self, id: &ElementId, update: MarkerUpdate) -> Result<(), ModelError> {
        let marker = self
            .markers
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownMarker(id.clone()))?;
        let moved = update.position.is_some();
        update.apply_to(marker);

        if moved {
            self.resync_linked_paths(id);
        }
        Ok(())
    }

    /// Pin the ends of every path linked to `marker_id` to its position.
    fn resync_linked_paths(&mut self, marker_id: &ElementId) {
        let Some(position) = self.markers.get(marker_id).map(|m| m.position) else {
            return;
        };
        for path in self.paths.iter_mut() {
            let Some(link) = &path.linked_markers else {
                continue;
            };
            let start = (&link.start_id == marker_id).then_some(position);
            let end = (&link.end_id == marker_id).then_some(position);
            if start.is_some() || end.is_some() {
                path.pin_endpoints(start, end);
            }
        }
    }

    /// Remove a marker, its incoming link references and all paths linked to it.
    pub fn delete_marker(&mut self, id: &ElementId) -> Result<Marker, ModelError> {
        let removed = self
            .markers
            .remove(id)
            .ok_or_else(|| ModelError::UnknownMarker(id.clone()))?;

        for marker in self.markers.iter_mut() {
            marker.linked_marker_ids.retain(|linked| linked != id);
        }
        let dropped = self.paths.remove_where(|p| {
            p.linked_markers
                .as_ref()
                .is_some_and(|link| link.involves(id))
        });
        log::debug!("Deleted marker {} and {} linked path(s)", id, dropped.len());
        Ok(removed)
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Link `from` to `to` with a new path seeded at both markers.
    ///
    /// Self links and links already present in `from`'s list are no-ops and
    /// return `Ok(None)`.
    pub fn link_markers(
        &mut self,
        from: &ElementId,
        to: &ElementId,
    ) -> Result<Option<ElementId>, ModelError> {
        let source = self.marker_or_err(from)?;
        let target = self.marker_or_err(to)?;
        if from == to || source.is_linked_to(to) {
            log::debug!("Ignoring link {} -> {}", from, to);
            return Ok(None);
        }

        let path_id = ElementId::generate(id_prefix::PATH);
        let mut path = Path::linked(
            path_id.clone(),
            MarkerLink::new(from.clone(), to.clone()),
            source.position,
            target.position,
        );
        path.color = source.color.clone();

        if let Some(source) = self.markers.get_mut(from) {
            source.linked_marker_ids.push(to.clone());
        }
        self.paths.insert(path);
        log::debug!("Linked marker {} -> {} with path {}", from, to, path_id);
        Ok(Some(path_id))
    }

    /// Remove the link from `from` to `to` and its path.
    pub fn remove_link(&mut self, from: &ElementId, to: &ElementId) -> Result<(), ModelError> {
        self.marker_or_err(from)?;
        self.marker_or_err(to)?;

        if let Some(source) = self.markers.get_mut(from) {
            source.linked_marker_ids.retain(|linked| linked != to);
        }
        self.paths.remove_where(|p| p.links(from, to));
        Ok(())
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Extend the active path with a point, or start a new freehand path.
    ///
    /// Returns the id of the path that received the point, which becomes the
    /// new active path.
    pub fn add_path_point(
        &mut self,
        active: Option<&ElementId>,
        point: Point,
    ) -> Result<ElementId, ModelError> {
        let Some(active) = active else {
            let id = ElementId::generate(id_prefix::PATH);
            self.paths.insert(Path::freehand(id.clone(), point));
            log::debug!("Started path {} at ({:.1}, {:.1})", id, point.x, point.y);
            return Ok(id);
        };

        let path = self
            .paths
            .get_mut(active)
            .ok_or_else(|| ModelError::UnknownPath(active.clone()))?;
        if path.is_linked() {
            return Err(ModelError::PinnedEndpoint {
                path: active.clone(),
                index: path.points.len().saturating_sub(1),
            });
        }
        path.points.push(point);
        Ok(active.clone())
    }

    /// Insert a bend at `index` of a path's points.
    ///
    /// `index` may equal the number of points (append). On linked paths the
    /// point must land strictly between the pinned endpoints.
    pub fn insert_path_point(
        &mut self,
        path_id: &ElementId,
        point: Point,
        index: usize,
    ) -> Result<(), ModelError> {
        let path = self
            .paths
            .get_mut(path_id)
            .ok_or_else(|| ModelError::UnknownPath(path_id.clone()))?;
        let len = path.points.len();
        if index > len {
            return Err(ModelError::IndexOutOfRange {
                path: path_id.clone(),
                index,
                len,
            });
        }
        if path.is_linked() && (index == 0 || index == len) {
            return Err(ModelError::PinnedEndpoint {
                path: path_id.clone(),
                index,
            });
        }
        path.points.insert(index, point);
        Ok(())
    }

    /// Move a single path point. Pinned endpoints of linked paths are rejected.
    pub fn move_path_point(
        &mut self,
        path_id: &ElementId,
        index: usize,
        point: Point,
    ) -> Result<(), ModelError> {
        let path = self
            .paths
            .get_mut(path_id)
            .ok_or_else(|| ModelError::UnknownPath(path_id.clone()))?;
        let len = path.points.len();
        if index >= len {
            return Err(ModelError::IndexOutOfRange {
                path: path_id.clone(),
                index,
                len,
            });
        }
        if path.is_pinned(index) {
            return Err(ModelError::PinnedEndpoint {
                path: path_id.clone(),
                index,
            });
        }
        path.points[index] = point;
        Ok(())
    }

    /// Merge fields into a path. New points on a linked path are re-pinned.
    pub fn update_path(&mut self, id: &ElementId, update: PathUpdate) -> Result<(), ModelError> {
        let path = self.path_or_err(id)?;
        let pins = match &path.linked_markers {
            Some(link) => Some((
                self.marker_or_err(&link.start_id)?.position,
                self.marker_or_err(&link.end_id)?.position,
            )),
            None => None,
        };
        if let Some(points) = &update.points {
            let min = if pins.is_some() { MIN_LINKED_POINTS } else { 1 };
            if points.len() < min {
                return Err(ModelError::TooFewPoints {
                    path: id.clone(),
                    min,
                });
            }
        }

        let path = self
            .paths
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownPath(id.clone()))?;
        if let Some(points) = update.points {
            path.points = points;
        }
        if let Some(color) = update.color {
            path.color = color;
        }
        if let Some((start, end)) = pins {
            path.pin_endpoints(Some(start), Some(end));
        }
        Ok(())
    }

    /// Remove a path; removing a linked path also drops the marker link.
    pub fn delete_path(&mut self, id: &ElementId) -> Result<Path, ModelError> {
        let removed = self
            .paths
            .remove(id)
            .ok_or_else(|| ModelError::UnknownPath(id.clone()))?;

        if let Some(link) = &removed.linked_markers {
            if let Some(source) = self.markers.get_mut(&link.start_id) {
                source.linked_marker_ids.retain(|linked| linked != &link.end_id);
            }
        }
        log::debug!("Deleted path {}", id);
        Ok(removed)
    }

    // ========================================================================
    // Areas
    // ========================================================================

    /// Start a new area of radius 1 at `center`.
    pub fn add_area(&mut self, center: Point) -> &Area {
        let id = ElementId::generate(id_prefix::AREA);
        let mut area = Area::new(
            id.clone(),
            self.config.default_area_name.clone(),
            Circle::new(center, 1.0),
            self.image_size,
        );
        area.number = Some((self.areas.len() + 1).to_string());
        log::debug!("Added area {} at ({:.1}, {:.1})", id, center.x, center.y);

        self.areas.insert(area);
        &self.areas[&id]
    }

    /// Merge fields into an area through its circle or box representation.
    pub fn update_area(&mut self, id: &ElementId, update: AreaUpdate) -> Result<(), ModelError> {
        let image_size = self.image_size;
        let area = self
            .areas
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownArea(id.clone()))?;
        area.apply_update(update, image_size);
        Ok(())
    }

    /// Remove an area. Marker area tags are free text and stay untouched.
    pub fn delete_area(&mut self, id: &ElementId) -> Result<Area, ModelError> {
        let removed = self
            .areas
            .remove(id)
            .ok_or_else(|| ModelError::UnknownArea(id.clone()))?;
        log::debug!("Deleted area {}", id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        Workspace::new(EditorConfig::default())
    }

    fn add_marker(ws: &mut Workspace, x: f64, y: f64) -> ElementId {
        ws.add_marker(Point::new(x, y)).id.clone()
    }

    #[test]
    fn test_add_marker_defaults() {
        let mut ws = workspace();
        let marker = ws.add_marker(Point::new(100.0, 50.0)).clone();
        assert_eq!(marker.position, Point::new(100.0, 50.0));
        assert_eq!(marker.number.as_deref(), Some("1"));
        assert_eq!(marker.color.as_deref(), Some("#10b981"));
        assert_eq!(marker.name, "New marker");
        assert!(marker.linked_marker_ids.is_empty());

        let second = ws.add_marker(Point::new(0.0, 0.0));
        assert_eq!(second.number.as_deref(), Some("2"));
    }

    #[test]
    fn test_link_markers_creates_seeded_path() {
        let mut ws = workspace();
        let m1 = add_marker(&mut ws, 10.0, 10.0);
        let m2 = add_marker(&mut ws, 90.0, 40.0);

        let path_id = ws.link_markers(&m1, &m2).unwrap().expect("link created");
        assert_eq!(ws.marker(&m1).unwrap().linked_marker_ids, vec![m2.clone()]);

        let path = ws.path(&path_id).unwrap();
        assert_eq!(path.linked_markers, Some(MarkerLink::new(m1.clone(), m2.clone())));
        assert_eq!(path.points, vec![Point::new(10.0, 10.0), Point::new(90.0, 40.0)]);
        assert_eq!(path.color.as_deref(), Some("#10b981"));
        assert_eq!(ws.path_count(), 1);
    }

    #[test]
    fn test_self_and_duplicate_links_are_noops() {
        let mut ws = workspace();
        let m1 = add_marker(&mut ws, 0.0, 0.0);
        let m2 = add_marker(&mut ws, 5.0, 5.0);

        assert_eq!(ws.link_markers(&m1, &m1).unwrap(), None);
        assert!(ws.link_markers(&m1, &m2).unwrap().is_some());
        assert_eq!(ws.link_markers(&m1, &m2).unwrap(), None);

        assert_eq!(ws.path_count(), 1);
        assert_eq!(ws.marker(&m1).unwrap().linked_marker_ids.len(), 1);
    }

    #[test]
    fn test_link_unknown_marker_fails_without_mutation() {
        let mut ws = workspace();
        let m1 = add_marker(&mut ws, 0.0, 0.0);
        let ghost = ElementId::from("ghost");
        assert_eq!(
            ws.link_markers(&m1, &ghost),
            Err(ModelError::UnknownMarker(ghost.clone()))
        );
        assert!(ws.marker(&m1).unwrap().linked_marker_ids.is_empty());
        assert_eq!(ws.path_count(), 0);
    }

    #[test]
    fn test_moving_marker_resyncs_both_ends() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        let c = add_marker(&mut ws, 20.0, 0.0);
        let ab = ws.link_markers(&a, &b).unwrap().unwrap();
        let bc = ws.link_markers(&b, &c).unwrap().unwrap();
        ws.insert_path_point(&ab, Point::new(5.0, 5.0), 1).unwrap();

        ws.update_marker(&b, MarkerUpdate::position(Point::new(12.0, 8.0)))
            .unwrap();

        let ab = ws.path(&ab).unwrap();
        assert_eq!(ab.points.last(), Some(&Point::new(12.0, 8.0)));
        assert_eq!(ab.points[1], Point::new(5.0, 5.0));
        assert_eq!(ws.path(&bc).unwrap().points[0], Point::new(12.0, 8.0));
    }

    #[test]
    fn test_delete_marker_cascades() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        let c = add_marker(&mut ws, 20.0, 0.0);
        ws.link_markers(&a, &b).unwrap();
        ws.link_markers(&b, &c).unwrap();
        ws.link_markers(&a, &c).unwrap();
        let freehand = ws.add_path_point(None, Point::new(1.0, 1.0)).unwrap();

        ws.delete_marker(&b).unwrap();

        assert_eq!(ws.marker(&a).unwrap().linked_marker_ids, vec![c.clone()]);
        assert!(ws.paths().all(|p| match &p.linked_markers {
            Some(link) => !link.involves(&b),
            None => true,
        }));
        assert_eq!(ws.path_count(), 2);
        assert!(ws.path(&freehand).is_some());
        assert_eq!(
            ws.delete_marker(&b).unwrap_err(),
            ModelError::UnknownMarker(b.clone())
        );
    }

    #[test]
    fn test_delete_linked_path_unlinks_source() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        let path = ws.link_markers(&a, &b).unwrap().unwrap();

        ws.delete_path(&path).unwrap();
        assert!(ws.marker(&a).unwrap().linked_marker_ids.is_empty());
        // The link can be made again afterwards.
        assert!(ws.link_markers(&a, &b).unwrap().is_some());
    }

    #[test]
    fn test_remove_link() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        ws.link_markers(&a, &b).unwrap();
        ws.link_markers(&b, &a).unwrap();

        ws.remove_link(&a, &b).unwrap();
        assert!(ws.marker(&a).unwrap().linked_marker_ids.is_empty());
        assert_eq!(ws.path_count(), 1);
        assert!(ws.paths().all(|p| p.links(&b, &a)));
    }

    #[test]
    fn test_freehand_path_grows() {
        let mut ws = workspace();
        let id = ws.add_path_point(None, Point::new(0.0, 0.0)).unwrap();
        let same = ws.add_path_point(Some(&id), Point::new(10.0, 0.0)).unwrap();
        assert_eq!(id, same);
        ws.insert_path_point(&id, Point::new(5.0, 3.0), 1).unwrap();

        let points = &ws.path(&id).unwrap().points;
        assert_eq!(
            points,
            &vec![Point::new(0.0, 0.0), Point::new(5.0, 3.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn test_insert_path_point_bounds() {
        let mut ws = workspace();
        let id = ws.add_path_point(None, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(
            ws.insert_path_point(&id, Point::new(1.0, 1.0), 5),
            Err(ModelError::IndexOutOfRange {
                path: id.clone(),
                index: 5,
                len: 1
            })
        );
        // Appending at len is allowed.
        ws.insert_path_point(&id, Point::new(1.0, 1.0), 1).unwrap();
        assert_eq!(ws.path(&id).unwrap().points.len(), 2);
    }

    #[test]
    fn test_linked_path_endpoints_are_pinned() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        let path = ws.link_markers(&a, &b).unwrap().unwrap();

        assert!(matches!(
            ws.insert_path_point(&path, Point::new(-1.0, 0.0), 0),
            Err(ModelError::PinnedEndpoint { index: 0, .. })
        ));
        assert!(matches!(
            ws.move_path_point(&path, 1, Point::new(3.0, 3.0)),
            Err(ModelError::PinnedEndpoint { index: 1, .. })
        ));
        assert!(matches!(
            ws.add_path_point(Some(&path), Point::new(3.0, 3.0)),
            Err(ModelError::PinnedEndpoint { .. })
        ));

        ws.insert_path_point(&path, Point::new(5.0, 5.0), 1).unwrap();
        ws.move_path_point(&path, 1, Point::new(6.0, 6.0)).unwrap();
        assert_eq!(ws.path(&path).unwrap().points[1], Point::new(6.0, 6.0));
    }

    #[test]
    fn test_update_path_repins_linked_points() {
        let mut ws = workspace();
        let a = add_marker(&mut ws, 0.0, 0.0);
        let b = add_marker(&mut ws, 10.0, 0.0);
        let path = ws.link_markers(&a, &b).unwrap().unwrap();

        ws.update_path(
            &path,
            PathUpdate::points(vec![
                Point::new(99.0, 99.0),
                Point::new(5.0, 2.0),
                Point::new(99.0, 99.0),
            ]),
        )
        .unwrap();
        assert_eq!(
            ws.path(&path).unwrap().points,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 2.0), Point::new(10.0, 0.0)]
        );

        assert_eq!(
            ws.update_path(&path, PathUpdate::points(vec![Point::new(0.0, 0.0)])),
            Err(ModelError::TooFewPoints {
                path: path.clone(),
                min: 2
            })
        );
    }

    #[test]
    fn test_add_area_defaults_and_clamping() {
        let mut ws = workspace();
        ws.set_image_size(Some(ImageSize::new(100, 100)));
        let area = ws.add_area(Point::new(0.5, 50.0)).clone();
        assert_eq!(area.radius, 1.0);
        assert_eq!(area.number.as_deref(), Some("1"));
        assert_eq!(area.name, "New area");
        assert_eq!(area.top_left, Point::new(0.0, 49.0));
        assert_eq!(area.bottom_right, Point::new(1.5, 51.0));
    }

    #[test]
    fn test_update_area_circle_and_box_paths() {
        let mut ws = workspace();
        let id = ws.add_area(Point::new(200.0, 200.0)).id.clone();

        ws.update_area(&id, AreaUpdate::radius(50.0)).unwrap();
        let area = ws.area(&id).unwrap();
        assert_eq!(area.top_left, Point::new(150.0, 150.0));
        assert_eq!(area.bottom_right, Point::new(250.0, 250.0));

        ws.update_area(
            &id,
            AreaUpdate::corners(Point::new(100.0, 100.0), Point::new(140.0, 120.0)),
        )
        .unwrap();
        let area = ws.area(&id).unwrap();
        assert_eq!(area.center, Point::new(120.0, 110.0));
        assert_eq!(area.radius, 20.0);

        ws.update_area(&id, AreaUpdate::radius(-3.0)).unwrap();
        assert_eq!(ws.area(&id).unwrap().radius, 1.0);
    }

    #[test]
    fn test_set_image_size_reclamps_areas() {
        let mut ws = workspace();
        let id = ws.add_area(Point::new(10.0, 10.0)).id.clone();
        ws.update_area(&id, AreaUpdate::radius(30.0)).unwrap();
        assert_eq!(ws.area(&id).unwrap().top_left, Point::new(-20.0, -20.0));

        ws.set_image_size(Some(ImageSize::new(50, 50)));
        let area = ws.area(&id).unwrap();
        assert_eq!(area.top_left, Point::new(0.0, 0.0));
        assert_eq!(area.bottom_right, Point::new(40.0, 40.0));
        assert_eq!(area.radius, 30.0);
    }

    #[test]
    fn test_delete_area_keeps_marker_tags() {
        let mut ws = workspace();
        let area = ws.add_area(Point::new(0.0, 0.0)).id.clone();
        ws.update_area(&area, AreaUpdate::default().with_name("Kitchen"))
            .unwrap();
        let m = add_marker(&mut ws, 1.0, 1.0);
        ws.update_marker(&m, MarkerUpdate::default().with_area(Some("Kitchen".into())))
            .unwrap();

        ws.delete_area(&area).unwrap();
        assert_eq!(ws.marker(&m).unwrap().area.as_deref(), Some("Kitchen"));
        assert!(ws.delete_area(&area).is_err());
    }

    #[test]
    fn test_from_parts_repairs_references() {
        let mut a = Marker::new(ElementId::from("a"), "A", Point::new(0.0, 0.0));
        a.linked_marker_ids = vec!["b".into(), "ghost".into(), "b".into(), "a".into()];
        let b = Marker::new(ElementId::from("b"), "B", Point::new(10.0, 10.0));

        let good = Path {
            id: "p1".into(),
            points: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            linked_markers: Some(MarkerLink::new("a".into(), "b".into())),
            color: None,
        };
        let dangling = Path {
            id: "p2".into(),
            points: vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            linked_markers: Some(MarkerLink::new("a".into(), "ghost".into())),
            color: None,
        };

        let ws = Workspace::from_parts(
            EditorConfig::default(),
            vec![a, b],
            vec![good, dangling],
            Vec::new(),
            None,
        );

        assert_eq!(
            ws.marker(&"a".into()).unwrap().linked_marker_ids,
            vec![ElementId::from("b")]
        );
        assert_eq!(ws.path_count(), 1);
        assert_eq!(
            ws.path(&"p1".into()).unwrap().points,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
        );
        assert!(ws.filters().is_visible(crate::filter::FilterKind::Color, "#10b981"));
    }

    #[test]
    fn test_from_parts_reconciles_links_with_paths() {
        let a = Marker::new(ElementId::from("a"), "A", Point::new(0.0, 0.0));
        let b = Marker::new(ElementId::from("b"), "B", Point::new(10.0, 0.0));
        let mut c = Marker::new(ElementId::from("c"), "C", Point::new(0.0, 10.0));
        c.color = Some("#ff0000".into());
        c.linked_marker_ids = vec!["a".into()];

        let linked = |id: &str| Path {
            id: id.into(),
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            linked_markers: Some(MarkerLink::new("a".into(), "b".into())),
            color: None,
        };

        let mut ws = Workspace::from_parts(
            EditorConfig::default(),
            vec![a, b, c],
            vec![linked("p1"), linked("p2")],
            Vec::new(),
            None,
        );

        // a -> b comes back from its path; the repeated path is dropped.
        assert_eq!(
            ws.marker(&"a".into()).unwrap().linked_marker_ids,
            vec![ElementId::from("b")]
        );
        assert!(ws.path(&"p1".into()).is_some());
        assert!(ws.path(&"p2".into()).is_none());

        // c -> a had no path, so one is created from the markers.
        let created = ws
            .paths()
            .find(|p| p.links(&"c".into(), &"a".into()))
            .unwrap();
        assert_eq!(
            created.points,
            vec![Point::new(0.0, 10.0), Point::new(0.0, 0.0)]
        );
        assert_eq!(created.color.as_deref(), Some("#ff0000"));
        assert_eq!(ws.path_count(), 2);

        assert_eq!(ws.link_markers(&"a".into(), &"b".into()).unwrap(), None);
        assert_eq!(ws.path_count(), 2);
    }
}
