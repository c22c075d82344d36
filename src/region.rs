use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::{self, Line};
use crate::model::{GraphLine, LineId, Shade};
use crate::registry::AuxPointId;

/// The side of one line a region lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideAssignment {
    pub line: LineId,
    pub above: bool,
}

/// Identity of a region: one side assignment per line that was complete when it was created.
///
/// Assignments are always ordered by line id, `line1` before `line2`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(Vec<SideAssignment>);

impl RegionKey {
    pub fn new(mut sides: Vec<SideAssignment>) -> Self {
        sides.sort_by_key(|s| s.line);
        sides.dedup_by_key(|s| s.line);
        Self(sides)
    }

    pub fn sides(&self) -> &[SideAssignment] {
        &self.0
    }

    pub fn side(&self, line: LineId) -> Option<bool> {
        self.0.iter().find(|s| s.line == line).map(|s| s.above)
    }

    pub fn references(&self, line: LineId) -> bool {
        self.side(line).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RegionShape {
    /// Everything on one side of a single line.
    HalfPlane {
        line: LineId,
        shade: Shade,
    },
    /// A convex polygon bounded by two lines and the grid, counter clockwise.
    Polygon(Vec<na::Point2<f64>>),
}

impl RegionShape {
    pub fn vertices(&self) -> &[na::Point2<f64>] {
        match self {
            RegionShape::HalfPlane { .. } => &[],
            RegionShape::Polygon(vertices) => vertices,
        }
    }
}

/// A shaded area of the graph.
///
/// `aux_points` are the hidden construction points the registry handed out for the polygon
/// vertices, index aligned with [`RegionShape::vertices`].
#[derive(Clone, Debug)]
pub struct Region {
    pub key: RegionKey,
    pub shape: RegionShape,
    pub aux_points: Vec<AuxPointId>,
}

impl Region {
    pub fn new(key: RegionKey, shape: RegionShape) -> Self {
        Self {
            key,
            shape,
            aux_points: Vec::new(),
        }
    }

    pub fn is_half_plane(&self) -> bool {
        matches!(self.shape, RegionShape::HalfPlane { .. })
    }
}

/// The infinite lines of all complete lines, in line id order.
pub fn complete_lines(lines: &[GraphLine]) -> Vec<(LineId, Line)> {
    let mut complete: Vec<_> = lines.iter()
        .filter_map(|l| Some((l.id, l.geometry()?)))
        .collect();
    complete.sort_by_key(|(id, _)| *id);
    complete
}

/// The key of the region containing `p`.
pub fn key_at(lines: &[(LineId, Line)], p: na::Point2<f64>) -> RegionKey {
    RegionKey::new(lines.iter()
        .map(|(id, line)| SideAssignment {
            line: *id,
            above: line.side_of(p),
        })
        .collect())
}

/// Strict side test, points on the line satisfy neither side.
fn satisfies(line: &Line, above: bool, p: na::Point2<f64>) -> bool {
    let s = line.signed_side(p);
    if above { s > 0.0 } else { s < 0.0 }
}

/// Builds the shape for `key` from the current lines.
///
/// Returns `None` if a line the key refers to is not complete, or if no region with at least three
/// vertices and non-zero area can be built.
pub fn build_shape(lines: &[(LineId, Line)], key: &RegionKey, config: &EngineConfig) -> Option<RegionShape> {
    let sides = key.sides().iter()
        .map(|s| {
            let (_, line) = lines.iter().find(|(id, _)| *id == s.line)?;
            Some((*line, s.above))
        })
        .collect::<Option<Vec<_>>>()?;

    match sides.as_slice() {
        [] => None,
        [_] => {
            let side = key.sides()[0];
            Some(RegionShape::HalfPlane {
                line: side.line,
                shade: Shade::from_side(side.above),
            })
        }
        [a, b] => build_polygon(*a, *b, config).map(RegionShape::Polygon),
        _ => None,
    }
}

fn build_polygon((a, a_above): (Line, bool), (b, b_above): (Line, bool), config: &EngineConfig) -> Option<Vec<na::Point2<f64>>> {
    let bounds = config.bounds.rect();
    let padded = bounds.padded(config.padding);

    // Parallel and coincident lines bound no region.
    let x = match a.intersection_point_eps(&b, config.intersection_epsilon) {
        Some(x) => x,
        None => {
            log::trace!("lines are parallel, no region");
            return None
        }
    };

    let mut points = Vec::new();
    if padded.contains(x) {
        points.push(x);
    }

    points.extend(padded.corners().into_iter()
        .filter(|c| satisfies(&a, a_above, *c) && satisfies(&b, b_above, *c)));

    points.extend(a.box_intersections(&padded).into_iter()
        .filter(|p| satisfies(&b, b_above, *p)));
    points.extend(b.box_intersections(&padded).into_iter()
        .filter(|p| satisfies(&a, a_above, *p)));

    let mut points = geometry::dedup_points(&points, config.dedup_epsilon);
    if points.len() < 3 {
        log::trace!("region has only {} construction points", points.len());
        return None
    }

    geometry::order_by_angle(&mut points);

    let clipped = geometry::clip_polygon(&points, &bounds);
    let polygon = geometry::dedup_points(&clipped, config.dedup_epsilon);
    if polygon.len() < 3 || geometry::polygon_area(&polygon) < config.dedup_epsilon {
        log::trace!("region is degenerate after clipping");
        return None
    }

    Some(polygon)
}

/// The part of the grid on one side of `line`, for drawing a half-plane shade.
pub fn half_plane_polygon(line: &Line, shade: Shade, bounds: &geometry::Rect) -> Vec<na::Point2<f64>> {
    let above = shade.is_above();
    let mut points: Vec<_> = bounds.corners().into_iter()
        .filter(|c| satisfies(line, above, *c))
        .collect();
    points.extend(line.box_intersections(bounds));

    let mut points = geometry::dedup_points(&points, geometry::DEDUP_EPSILON);
    if points.len() < 3 {
        return Vec::new()
    }

    geometry::order_by_angle(&mut points);
    points
}
