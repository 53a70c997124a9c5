//! Closest points between reference shapes
//!
//! Analytic where the pair allows it (points, line/line), seeded alternating
//! projection for everything else. All paths are deterministic and bounded.

use glam::Vec3;

use super::{Curve, ElementGeometry, Surface};

/// Samples used to seed the alternating projection
const SEED_SAMPLES: usize = 8;
/// Alternating projection iterations
const REFINE_ITERATIONS: usize = 24;

/// A borrowed view of the geometry proximity works on
enum ShapeRef<'a> {
    Point(Vec3),
    Curve(&'a Curve, (f32, f32)),
    Surf(&'a Surface),
}

impl<'a> ShapeRef<'a> {
    fn of(element: &'a ElementGeometry) -> Self {
        match element {
            ElementGeometry::Vertex(p) => ShapeRef::Point(*p),
            ElementGeometry::Edge(e) => ShapeRef::Curve(&e.curve, e.range),
            ElementGeometry::Face(f) => ShapeRef::Surf(&f.surface),
            // A whole object is represented by its centroid
            ElementGeometry::Object(o) => ShapeRef::Point(o.props.centroid),
        }
    }

    /// Closest point on this shape to `point`
    fn closest_to(&self, point: Vec3) -> Vec3 {
        match self {
            ShapeRef::Point(p) => *p,
            ShapeRef::Curve(curve, range) => curve.point_at(curve.project(point, *range)),
            ShapeRef::Surf(surface) => surface.project(point),
        }
    }

    /// Seed points for the alternating projection
    fn seeds(&self) -> Vec<Vec3> {
        match self {
            ShapeRef::Point(p) => vec![*p],
            ShapeRef::Curve(curve, range) => (0..=SEED_SAMPLES)
                .map(|i| {
                    let t = range.0 + (range.1 - range.0) * (i as f32 / SEED_SAMPLES as f32);
                    curve.point_at(t)
                })
                .collect(),
            ShapeRef::Surf(surface) => vec![surface.anchor()],
        }
    }
}

/// Closest point pair between two reference shapes.
///
/// Returns (point on `a`, point on `b`).
pub fn closest_points(a: &ElementGeometry, b: &ElementGeometry) -> (Vec3, Vec3) {
    let sa = ShapeRef::of(a);
    let sb = ShapeRef::of(b);

    if let (ShapeRef::Curve(c1, r1), ShapeRef::Curve(c2, r2)) = (&sa, &sb)
        && let (Curve::Line { origin: o1, dir: d1 }, Curve::Line { origin: o2, dir: d2 }) =
            (c1, c2)
    {
        return line_line(*o1, *d1, *r1, *o2, *d2, *r2);
    }

    // Seed with samples from both sides, refine the best pair
    let mut best = (Vec3::ZERO, Vec3::ZERO);
    let mut best_dist = f32::MAX;
    for seed in sa.seeds().into_iter().chain(sb.seeds()) {
        let pa = sa.closest_to(seed);
        let pb = sb.closest_to(pa);
        let dist = (pa - pb).length_squared();
        if dist < best_dist {
            best_dist = dist;
            best = (pa, pb);
        }
    }

    let (mut pa, mut pb) = best;
    for _ in 0..REFINE_ITERATIONS {
        let next_a = sa.closest_to(pb);
        let next_b = sb.closest_to(next_a);
        if (next_a - pa).length_squared() < 1e-12 && (next_b - pb).length_squared() < 1e-12 {
            pa = next_a;
            pb = next_b;
            break;
        }
        pa = next_a;
        pb = next_b;
    }
    (pa, pb)
}

/// Closest points between two bounded lines (unit directions)
fn line_line(
    o1: Vec3,
    d1: Vec3,
    r1: (f32, f32),
    o2: Vec3,
    d2: Vec3,
    r2: (f32, f32),
) -> (Vec3, Vec3) {
    let w0 = o1 - o2;
    let b = d1.dot(d2);
    let d = d1.dot(w0);
    let e = d2.dot(w0);
    let denom = 1.0 - b * b;

    let (mut t1, mut t2) = if denom.abs() < 1e-9 {
        // Parallel: anchor on the first line's range start
        let t1 = r1.0;
        (t1, e + b * t1)
    } else {
        ((b * e - d) / denom, (e - b * d) / denom)
    };

    t1 = t1.clamp(r1.0.min(r1.1), r1.0.max(r1.1));
    t2 = t2.clamp(r2.0.min(r2.1), r2.0.max(r2.1));

    // One mutual re-projection honors the clamped ends
    let p2 = o2 + t2 * d2;
    t1 = (p2 - o1).dot(d1).clamp(r1.0.min(r1.1), r1.0.max(r1.1));
    let p1 = o1 + t1 * d1;
    t2 = (p1 - o2).dot(d2).clamp(r2.0.min(r2.1), r2.0.max(r2.1));

    (o1 + t1 * d1, o2 + t2 * d2)
}
