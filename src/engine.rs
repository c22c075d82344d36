use crate::config::EngineConfig;
use crate::model::{GraphLine, GraphPoint, GridBounds, LineId, Shade, MAX_POINTS_PER_LINE};
use crate::region::{self, Region, RegionKey, RegionShape};
use crate::registry::RegionRegistry;
use crate::GraphError;

/// What a pointer press means. The interaction layer owns this flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    PlacePoint,
    ShadeRegion,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RegionChange {
    Added(RegionKey),
    Removed(RegionKey),
    /// Nothing to shade: no complete line, or the clicked region is degenerate.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    PointPlaced { line: LineId, index: usize },
    Region(RegionChange),
    Ignored,
}

/// The lines and shaded regions of one graph.
///
/// Every method is a complete update: when it returns, lines and regions are consistent again.
/// Invalid requests (a third point, a drag of a missing point, a degenerate region) leave the
/// state untouched.
#[derive(Debug, Default)]
pub struct GraphEngine {
    config: EngineConfig,
    /// Existing lines, sorted by id.
    lines: Vec<GraphLine>,
    regions: RegionRegistry,
}

impl GraphEngine {
    /// Creates an empty engine. Inverted grid bounds in `config` are reordered.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: EngineConfig {
                bounds: config.bounds.normalized(),
                ..config
            },
            lines: Vec::new(),
            regions: RegionRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bounds(&self) -> GridBounds {
        self.config.bounds
    }

    pub fn lines(&self) -> &[GraphLine] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&GraphLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    /// The line the next placed point goes to, `None` once both lines are complete.
    pub fn next_open_line(&self) -> Option<LineId> {
        LineId::ALL.into_iter()
            .find(|id| self.line(*id).map_or(true, |l| !l.is_complete()))
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut GraphLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    fn line_or_insert(&mut self, id: LineId) -> &mut GraphLine {
        let i = match self.lines.binary_search_by_key(&id, |l| l.id) {
            Ok(i) => i,
            Err(i) => {
                self.lines.insert(i, GraphLine::new(id));
                i
            }
        };
        &mut self.lines[i]
    }

    /// Places a point, snapped to the grid, on `line`.
    pub fn add_point(&mut self, line: LineId, x: f64, y: f64, is_open: bool) -> Result<(), GraphError> {
        if !x.is_finite() || !y.is_finite() {
            log::debug!("ignoring non-finite point ({}, {})", x, y);
            return Err(GraphError::NonFinite { x, y })
        }

        if self.line(line).map_or(false, |l| l.points.len() >= MAX_POINTS_PER_LINE) {
            log::debug!("{} is full, ignoring point ({}, {})", line, x, y);
            return Err(GraphError::CapacityExceeded { line })
        }

        let (x, y) = self.config.bounds.snap(x, y);
        let l = self.line_or_insert(line);
        l.points.push(GraphPoint::new(x, y, is_open));

        if l.is_complete() {
            log::debug!("{} complete through {:?}", line, l.points);
        } else {
            log::debug!("{} point at ({}, {})", line, x, y);
        }

        Ok(())
    }

    /// Drags a point to `(x, y)`, snapped to the grid.
    ///
    /// Regions referencing the line are rebuilt from their keys; those that can no longer be
    /// built are dropped. Returns whether the point moved.
    pub fn move_point(&mut self, line: LineId, index: usize, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false
        }

        let (x, y) = self.config.bounds.snap(x, y);

        let point = match self.line_mut(line).and_then(|l| l.points.get_mut(index)) {
            Some(point) => point,
            None => return false,
        };

        if point.x == x && point.y == y {
            return false
        }

        point.x = x;
        point.y = y;
        log::trace!("{} point {} moved to ({}, {})", line, index, x, y);

        self.revalidate(line);
        true
    }

    /// Deletes a line and every region that depends on it. Returns the number of removed regions.
    pub fn remove_line(&mut self, line: LineId) -> usize {
        let i = match self.lines.iter().position(|l| l.id == line) {
            Some(i) => i,
            None => return 0,
        };

        self.lines.remove(i);
        let removed = self.regions.remove_all_for_line(line).len();
        log::debug!("removed {} and {} dependent regions", line, removed);

        self.sync_shades();
        removed
    }

    pub fn toggle_dash(&mut self, line: LineId) {
        if let Some(l) = self.line_mut(line) {
            l.is_dashed = !l.is_dashed;
        }
    }

    /// Flips every point of `line` between filled and hollow.
    pub fn toggle_point_openness(&mut self, line: LineId) {
        if let Some(l) = self.line_mut(line) {
            for p in &mut l.points {
                p.is_open = !p.is_open;
            }
        }
    }

    /// Shades the region containing `(x, y)`, or unshades it if it is already shaded.
    pub fn resolve_region(&mut self, x: f64, y: f64) -> RegionChange {
        let lines = region::complete_lines(&self.lines);
        if lines.is_empty() || !x.is_finite() || !y.is_finite() {
            return RegionChange::Unchanged
        }

        let key = region::key_at(&lines, na::Point2::new(x, y));
        self.toggle_region(key)
    }

    /// Shades the region identified by `key`, or unshades it if it is already shaded.
    pub fn toggle_region(&mut self, key: RegionKey) -> RegionChange {
        if self.regions.remove_by_key(&key).is_some() {
            self.sync_shades();
            return RegionChange::Removed(key)
        }

        let lines = region::complete_lines(&self.lines);
        match region::build_shape(&lines, &key, &self.config) {
            Some(shape) => {
                self.regions.add(Region::new(key.clone(), shape));
                self.sync_shades();
                RegionChange::Added(key)
            }
            None => {
                log::debug!("no region constructible for {:?}", key);
                RegionChange::Unchanged
            }
        }
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64, mode: PointerMode) -> PointerOutcome {
        match mode {
            PointerMode::PlacePoint => {
                let line = match self.next_open_line() {
                    Some(line) => line,
                    None => return PointerOutcome::Ignored,
                };

                match self.add_point(line, x, y, false) {
                    Ok(()) => PointerOutcome::PointPlaced {
                        line,
                        index: self.line(line).map_or(0, |l| l.points.len() - 1),
                    },
                    Err(_) => PointerOutcome::Ignored,
                }
            }
            PointerMode::ShadeRegion => match self.resolve_region(x, y) {
                RegionChange::Unchanged => PointerOutcome::Ignored,
                change => PointerOutcome::Region(change),
            },
        }
    }

    pub fn on_drag_point(&mut self, line: LineId, index: usize, x: f64, y: f64) -> bool {
        self.move_point(line, index, x, y)
    }

    /// Removes all shading but keeps the lines.
    pub fn clear_regions(&mut self) -> usize {
        let removed = self.regions.clear_all();
        self.sync_shades();
        removed
    }

    /// Resets to the empty graph.
    pub fn clear_all(&mut self) {
        let removed = self.regions.clear_all();
        self.lines.clear();
        log::debug!("cleared graph ({} regions)", removed);
    }

    fn revalidate(&mut self, line: LineId) {
        let lines = region::complete_lines(&self.lines);
        let config = self.config;
        let (reshaped, removed) = self.regions
            .reshape_for_line(line, |key| region::build_shape(&lines, key, &config));

        if reshaped + removed > 0 {
            log::debug!("{}: reshaped {} regions, dropped {}", line, reshaped, removed);
        }
        self.sync_shades();
    }

    /// Mirrors the newest live region referencing each line into that line's `shade`.
    pub(crate) fn sync_shades(&mut self) {
        for line in &mut self.lines {
            let id = line.id;
            line.shade = self.regions.iter()
                .filter(|r| r.key.references(id))
                .last()
                .and_then(|r| match r.shape {
                    RegionShape::HalfPlane { shade, .. } => Some(shade),
                    RegionShape::Polygon(_) => r.key.side(id).map(Shade::from_side),
                });
        }
    }
}
