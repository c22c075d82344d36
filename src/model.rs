use serde::{Deserialize, Serialize};

use crate::geometry;

/// Most points a single line can hold.
pub const MAX_POINTS_PER_LINE: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LineId {
    #[serde(rename = "line1")]
    Line1,
    #[serde(rename = "line2")]
    Line2,
}

impl LineId {
    pub const ALL: [LineId; 2] = [LineId::Line1, LineId::Line2];
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineId::Line1 => f.write_str("line1"),
            LineId::Line2 => f.write_str("line2"),
        }
    }
}

/// Which side of a line is shaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shade {
    Above,
    Below,
}

impl Shade {
    pub fn from_side(above: bool) -> Self {
        if above { Shade::Above } else { Shade::Below }
    }

    pub fn is_above(self) -> bool {
        self == Shade::Above
    }
}

/// A user placed point on the grid.
///
/// `is_open` draws the point hollow (strict inequality) and has no effect on geometry.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub is_open: bool,
}

impl GraphPoint {
    pub fn new(x: f64, y: f64, is_open: bool) -> Self {
        Self {
            x,
            y,
            is_open,
        }
    }

    pub fn position(&self) -> na::Point2<f64> {
        na::Point2::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLine {
    pub id: LineId,
    pub points: Vec<GraphPoint>,
    #[serde(default)]
    pub is_dashed: bool,
    #[serde(default)]
    pub shade: Option<Shade>,
}

impl GraphLine {
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            points: Vec::new(),
            is_dashed: false,
            shade: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == MAX_POINTS_PER_LINE
    }

    /// The infinite line through both points.
    ///
    /// `None` while the line is incomplete, or if both points were dragged onto each other.
    pub fn geometry(&self) -> Option<geometry::Line> {
        match self.points.as_slice() {
            [a, b] => geometry::Line::from_two_points(a.position(), b.position()),
            _ => None,
        }
    }
}

/// The fixed rectangular domain of the graph.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl GridBounds {
    pub fn rect(&self) -> geometry::Rect {
        geometry::Rect::new(
            na::Point2::new(self.x_min, self.y_min),
            na::Point2::new(self.x_max, self.y_max))
    }

    /// The same bounds with each axis ordered min to max.
    ///
    /// Bounds with a non-finite value fall back to the default grid.
    pub fn normalized(self) -> Self {
        let values = [self.x_min, self.x_max, self.y_min, self.y_max];
        if values.iter().any(|v| !v.is_finite()) {
            log::warn!("grid bounds {:?} are not finite, using the default grid", self);
            return Self::default()
        }

        Self {
            x_min: self.x_min.min(self.x_max),
            x_max: self.x_min.max(self.x_max),
            y_min: self.y_min.min(self.y_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    /// Rounds to the nearest grid intersection and clamps into the bounds.
    ///
    /// The bounds must be normalized, see [`GridBounds::normalized`].
    pub fn snap(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.rect().clamp(na::Point2::new(x.round(), y.round()));
        (p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_and_clamps() {
        let bounds = GridBounds::default();
        assert_eq!(bounds.snap(1.4, -2.6), (1.0, -3.0));
        assert_eq!(bounds.snap(14.0, -30.2), (10.0, -10.0));
    }

    #[test]
    fn inverted_bounds_are_reordered() {
        let bounds = GridBounds { x_min: 10.0, x_max: -10.0, y_min: 5.0, y_max: -5.0 }.normalized();
        assert_eq!(bounds, GridBounds { x_min: -10.0, x_max: 10.0, y_min: -5.0, y_max: 5.0 });
        assert_eq!(bounds.snap(12.0, 0.4), (10.0, 0.0));
    }

    #[test]
    fn non_finite_bounds_fall_back_to_default() {
        let bounds = GridBounds { x_min: f64::NAN, ..GridBounds::default() }.normalized();
        assert_eq!(bounds, GridBounds::default());
    }

    #[test]
    fn line_geometry_requires_two_distinct_points() {
        let mut line = GraphLine::new(LineId::Line1);
        assert!(line.geometry().is_none());

        line.points.push(GraphPoint::new(1.0, 1.0, false));
        assert!(!line.is_complete());
        assert!(line.geometry().is_none());

        line.points.push(GraphPoint::new(1.0, 1.0, true));
        assert!(line.is_complete());
        assert!(line.geometry().is_none());

        line.points[1].x = 3.0;
        assert!(line.geometry().is_some());
    }

    #[test]
    fn line_ids_serialize_as_names() {
        assert_eq!(serde_json::to_string(&LineId::Line2).unwrap(), "\"line2\"");
        assert_eq!(serde_json::to_string(&Shade::Below).unwrap(), "\"below\"");
        assert_eq!(LineId::Line1.to_string(), "line1");
    }
}
