/// Lines closer to parallel than this have no intersection.
pub const INTERSECTION_EPSILON: f64 = 1e-4;
/// Points closer than this are merged before a polygon is ordered.
pub const DEDUP_EPSILON: f64 = 0.01;

const CONTAINS_EPSILON: f64 = 1e-9;

/// An infinite line through two distinct points.
///
/// The defining points are stored in a canonical orientation: `p1` lies to the left of `p0`, or
/// above it if the line is vertical. With this orientation a positive [`Line::signed_side`] means
/// the point lies above the line (or to the right of a vertical line), no matter in which order
/// the points were given.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line {
    p0: na::Point2<f64>,
    p1: na::Point2<f64>,
}

impl Line {
    pub fn from_two_points(a: na::Point2<f64>, b: na::Point2<f64>) -> Option<Self> {
        if a == b {
            return None
        }

        let swap = b.x > a.x || (b.x == a.x && b.y < a.y);
        let (p0, p1) = if swap { (b, a) } else { (a, b) };

        Some(Self {
            p0,
            p1,
        })
    }

    pub fn dir(&self) -> na::Vector2<f64> {
        self.p1 - self.p0
    }

    /// Twice the signed area of the triangle `(p0, p1, p)`, positive on the "above" side.
    pub fn signed_side(&self, p: na::Point2<f64>) -> f64 {
        let (x1, y1) = (self.p0.x, self.p0.y);
        let (x2, y2) = (self.p1.x, self.p1.y);
        (y2 - y1) * (p.x - x1) - (x2 - x1) * (p.y - y1)
    }

    /// Whether `p` is on the above side of the line.
    ///
    /// Points exactly on the line are classified as not above. Callers building regions rely on
    /// this strict convention so that a boundary point never counts for both sides.
    pub fn side_of(&self, p: na::Point2<f64>) -> bool {
        self.signed_side(p) > 0.0
    }

    /// Computes the intersection point of this line with another.
    ///
    /// Returns `None` for parallel or coincident lines.
    pub fn intersection_point(&self, other: &Line) -> Option<na::Point2<f64>> {
        self.intersection_point_eps(other, INTERSECTION_EPSILON)
    }

    /// Like [`Self::intersection_point`] with a custom parallelism threshold on the determinant.
    pub fn intersection_point_eps(&self, other: &Line, eps: f64) -> Option<na::Point2<f64>> {
        let (x1, y1, x2, y2) = (self.p0.x, self.p0.y, self.p1.x, self.p1.y);
        let (x3, y3, x4, y4) = (other.p0.x, other.p0.y, other.p1.x, other.p1.y);

        let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if d.abs() < eps {
            return None
        }

        let a = x1 * y2 - y1 * x2;
        let b = x3 * y4 - y3 * x4;
        let x = (a * (x3 - x4) - (x1 - x2) * b) / d;
        let y = (a * (y3 - y4) - (y1 - y2) * b) / d;

        Some(na::Point2::new(x, y))
    }

    /// All points where this line crosses the edges of `rect`.
    ///
    /// A crossing that falls outside the extent of its edge is dropped. A line through a corner
    /// yields that corner twice, once per edge; use [`dedup_points`] if that matters.
    pub fn box_intersections(&self, rect: &Rect) -> Vec<na::Point2<f64>> {
        let d = self.dir();
        let mut xs = Vec::with_capacity(4);

        if d.x != 0.0 {
            for x in [rect.min.x, rect.max.x] {
                let t = (x - self.p0.x) / d.x;
                let y = self.p0.y + t * d.y;
                if y >= rect.min.y && y <= rect.max.y {
                    xs.push(na::Point2::new(x, y));
                }
            }
        }

        if d.y != 0.0 {
            for y in [rect.min.y, rect.max.y] {
                let t = (y - self.p0.y) / d.y;
                let x = self.p0.x + t * d.x;
                if x >= rect.min.x && x <= rect.max.x {
                    xs.push(na::Point2::new(x, y));
                }
            }
        }

        xs
    }
}

/// An axis aligned rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min: na::Point2<f64>,
    pub max: na::Point2<f64>,
}

impl Rect {
    pub fn new(min: na::Point2<f64>, max: na::Point2<f64>) -> Self {
        Self {
            min,
            max,
        }
    }

    pub fn padded(&self, amount: f64) -> Self {
        let pad = na::Vector2::repeat(amount);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Corners in counter clockwise order starting at the bottom left.
    pub fn corners(&self) -> [na::Point2<f64>; 4] {
        [
            self.min,
            na::Point2::new(self.max.x, self.min.y),
            self.max,
            na::Point2::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: na::Point2<f64>) -> bool {
        p.x >= self.min.x - CONTAINS_EPSILON
            && p.x <= self.max.x + CONTAINS_EPSILON
            && p.y >= self.min.y - CONTAINS_EPSILON
            && p.y <= self.max.y + CONTAINS_EPSILON
    }

    pub fn clamp(&self, p: na::Point2<f64>) -> na::Point2<f64> {
        na::Point2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }
}

/// Removes points lying within `eps` of an earlier point, keeping the first occurrence.
pub fn dedup_points(points: &[na::Point2<f64>], eps: f64) -> Vec<na::Point2<f64>> {
    let mut kept: Vec<na::Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if kept.iter().all(|k| (*k - *p).norm() >= eps) {
            kept.push(*p);
        }
    }
    kept
}

pub fn centroid(points: &[na::Point2<f64>]) -> Option<na::Point2<f64>> {
    if points.is_empty() {
        return None
    }

    let sum = points.iter().fold(na::Vector2::<f64>::zeros(), |acc, p| acc + p.coords);
    Some(na::Point2::from(sum / points.len() as f64))
}

/// Sorts points counter clockwise by their angle around the centroid.
///
/// For a convex point set this gives a simple polygon. Ties are broken by coordinates so the
/// result is deterministic.
pub fn order_by_angle(points: &mut [na::Point2<f64>]) {
    let c = match centroid(points) {
        Some(c) => c,
        None => return,
    };

    points.sort_by(|a, b| {
        let aa = (a.y - c.y).atan2(a.x - c.x);
        let bb = (b.y - c.y).atan2(b.x - c.x);
        aa.total_cmp(&bb).then(total_cmp_vec2(a.coords, b.coords))
    });
}

/// Absolute area of a simple polygon (shoelace formula).
pub fn polygon_area(polygon: &[na::Point2<f64>]) -> f64 {
    if polygon.len() < 3 {
        return 0.0
    }

    let twice: f64 = (0..polygon.len())
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            a.x * b.y - b.x * a.y
        })
        .sum();

    twice.abs() / 2.0
}

/// Clips a convex, angle ordered polygon to `rect` (Sutherland-Hodgman).
pub fn clip_polygon(polygon: &[na::Point2<f64>], rect: &Rect) -> Vec<na::Point2<f64>> {
    // Each edge as (axis, bound, keep_greater).
    let edges = [
        (0, rect.min.x, true),
        (0, rect.max.x, false),
        (1, rect.min.y, true),
        (1, rect.max.y, false),
    ];

    let mut output = polygon.to_vec();
    for (axis, bound, keep_greater) in edges {
        if output.is_empty() {
            break
        }

        let inside = |p: &na::Point2<f64>| {
            if keep_greater { p[axis] >= bound } else { p[axis] <= bound }
        };

        let input = std::mem::take(&mut output);
        for i in 0..input.len() {
            let cur = input[i];
            let prev = input[(i + input.len() - 1) % input.len()];

            if inside(&cur) {
                if !inside(&prev) {
                    output.push(crossing(prev, cur, axis, bound));
                }
                output.push(cur);
            } else if inside(&prev) {
                output.push(crossing(prev, cur, axis, bound));
            }
        }
    }

    output
}

fn crossing(a: na::Point2<f64>, b: na::Point2<f64>, axis: usize, bound: f64) -> na::Point2<f64> {
    let t = (bound - a[axis]) / (b[axis] - a[axis]);
    let mut p = a + (b - a) * t;
    // Pin exactly to the edge, interpolation drifts.
    p[axis] = bound;
    p
}

/// Computes a determenistic and stable ordering of two vectors.
///
/// This function is not supposed to compute a sensible ordering, but rather one that is both
/// numericaly stable and deterministic.
fn total_cmp_vec2(v1: na::Vector2<f64>, v2: na::Vector2<f64>) -> std::cmp::Ordering {
    v1.x.total_cmp(&v2.x).then(v1.y.total_cmp(&v2.y))
}
