//! Analytic curves with exact derivatives
//!
//! Every curve kind evaluates its first and second derivative in closed form,
//! so curvature, Frenet frames and osculating centers come out of one generic
//! formula instead of per-kind special cases.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Convergence tolerance for closest-parameter projection
const PROJECT_TOLERANCE: f32 = 1e-5;
/// Maximum Newton iterations for closest-parameter projection
const PROJECT_MAX_ITERATIONS: usize = 32;
/// Seed sample count for closest-parameter projection
const PROJECT_SEEDS: usize = 16;

/// An analytic 3D curve.
///
/// `axis` is the unit normal of the curve's plane, `x_dir` the unit direction
/// of the major axis; the in-plane Y direction is `axis × x_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Line {
        origin: Vec3,
        dir: Vec3,
    },
    Circle {
        center: Vec3,
        axis: Vec3,
        x_dir: Vec3,
        radius: f32,
    },
    Ellipse {
        center: Vec3,
        axis: Vec3,
        x_dir: Vec3,
        major: f32,
        minor: f32,
    },
    /// Parametrized as `vertex + (t²/4f)·X + t·Y`; the focus sits at
    /// `vertex + f·X`.
    Parabola {
        vertex: Vec3,
        axis: Vec3,
        x_dir: Vec3,
        focal: f32,
    },
    /// Parametrized as `center + a·cosh(t)·X + b·sinh(t)·Y`
    Hyperbola {
        center: Vec3,
        axis: Vec3,
        x_dir: Vec3,
        major: f32,
        minor: f32,
    },
}

impl Curve {
    /// Create a line through `origin` along `dir`
    pub fn line(origin: Vec3, dir: Vec3) -> Self {
        Curve::Line {
            origin,
            dir: dir.normalize(),
        }
    }

    /// Create a circle; the in-plane X direction is chosen deterministically
    pub fn circle(center: Vec3, axis: Vec3, radius: f32) -> Self {
        let axis = axis.normalize();
        Curve::Circle {
            center,
            axis,
            x_dir: super::any_perpendicular(axis),
            radius,
        }
    }

    /// Create an ellipse; `major` must be >= `minor`
    pub fn ellipse(center: Vec3, axis: Vec3, x_dir: Vec3, major: f32, minor: f32) -> Self {
        let axis = axis.normalize();
        Curve::Ellipse {
            center,
            axis,
            x_dir: orthonormal_x(axis, x_dir),
            major,
            minor,
        }
    }

    /// Create a parabola from its vertex and focal distance
    pub fn parabola(vertex: Vec3, axis: Vec3, x_dir: Vec3, focal: f32) -> Self {
        let axis = axis.normalize();
        Curve::Parabola {
            vertex,
            axis,
            x_dir: orthonormal_x(axis, x_dir),
            focal,
        }
    }

    /// Create a hyperbola (one branch) from its semi-axes
    pub fn hyperbola(center: Vec3, axis: Vec3, x_dir: Vec3, major: f32, minor: f32) -> Self {
        let axis = axis.normalize();
        Curve::Hyperbola {
            center,
            axis,
            x_dir: orthonormal_x(axis, x_dir),
            major,
            minor,
        }
    }

    /// Short kind name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Curve::Line { .. } => "line",
            Curve::Circle { .. } => "circle",
            Curve::Ellipse { .. } => "ellipse",
            Curve::Parabola { .. } => "parabola",
            Curve::Hyperbola { .. } => "hyperbola",
        }
    }

    /// In-plane Y direction (undefined for lines)
    fn y_dir(&self) -> Vec3 {
        match self {
            Curve::Line { dir, .. } => super::any_perpendicular(*dir),
            Curve::Circle { axis, x_dir, .. }
            | Curve::Ellipse { axis, x_dir, .. }
            | Curve::Parabola { axis, x_dir, .. }
            | Curve::Hyperbola { axis, x_dir, .. } => axis.cross(*x_dir),
        }
    }

    /// The parameter range that covers the curve once
    pub fn natural_range(&self) -> (f32, f32) {
        match self {
            Curve::Line { .. } => (0.0, 1.0),
            Curve::Circle { .. } | Curve::Ellipse { .. } => (0.0, TAU),
            Curve::Parabola { .. } | Curve::Hyperbola { .. } => (-1.0, 1.0),
        }
    }

    /// Evaluate the curve at parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        match self {
            Curve::Line { origin, dir } => *origin + t * *dir,
            Curve::Circle {
                center,
                x_dir,
                radius,
                ..
            } => *center + *radius * (t.cos() * *x_dir + t.sin() * self.y_dir()),
            Curve::Ellipse {
                center,
                x_dir,
                major,
                minor,
                ..
            } => *center + *major * t.cos() * *x_dir + *minor * t.sin() * self.y_dir(),
            Curve::Parabola {
                vertex,
                x_dir,
                focal,
                ..
            } => *vertex + (t * t / (4.0 * *focal)) * *x_dir + t * self.y_dir(),
            Curve::Hyperbola {
                center,
                x_dir,
                major,
                minor,
                ..
            } => *center + *major * t.cosh() * *x_dir + *minor * t.sinh() * self.y_dir(),
        }
    }

    /// First derivative at `t`
    pub fn d1(&self, t: f32) -> Vec3 {
        match self {
            Curve::Line { dir, .. } => *dir,
            Curve::Circle { x_dir, radius, .. } => {
                *radius * (-t.sin() * *x_dir + t.cos() * self.y_dir())
            }
            Curve::Ellipse {
                x_dir,
                major,
                minor,
                ..
            } => -*major * t.sin() * *x_dir + *minor * t.cos() * self.y_dir(),
            Curve::Parabola { x_dir, focal, .. } => {
                (t / (2.0 * *focal)) * *x_dir + self.y_dir()
            }
            Curve::Hyperbola {
                x_dir,
                major,
                minor,
                ..
            } => *major * t.sinh() * *x_dir + *minor * t.cosh() * self.y_dir(),
        }
    }

    /// Second derivative at `t`
    pub fn d2(&self, t: f32) -> Vec3 {
        match self {
            Curve::Line { .. } => Vec3::ZERO,
            Curve::Circle { x_dir, radius, .. } => {
                -*radius * (t.cos() * *x_dir + t.sin() * self.y_dir())
            }
            Curve::Ellipse {
                x_dir,
                major,
                minor,
                ..
            } => -*major * t.cos() * *x_dir - *minor * t.sin() * self.y_dir(),
            Curve::Parabola { x_dir, focal, .. } => (1.0 / (2.0 * *focal)) * *x_dir,
            Curve::Hyperbola {
                x_dir,
                major,
                minor,
                ..
            } => *major * t.cosh() * *x_dir + *minor * t.sinh() * self.y_dir(),
        }
    }

    /// Curvature at `t` (0 for straight curves)
    pub fn curvature(&self, t: f32) -> f32 {
        let d1 = self.d1(t);
        let d2 = self.d2(t);
        let speed = d1.length();
        if speed < 1e-9 {
            return 0.0;
        }
        d1.cross(d2).length() / (speed * speed * speed)
    }

    /// Frenet frame (tangent, normal, binormal) at `t`.
    ///
    /// None when the curve has no curvature at `t`.
    pub fn frenet(&self, t: f32) -> Option<(Vec3, Vec3, Vec3)> {
        let d1 = self.d1(t);
        let d2 = self.d2(t);
        let binormal = d1.cross(d2);
        if binormal.length_squared() < 1e-12 {
            return None;
        }
        let tangent = d1.normalize();
        let binormal = binormal.normalize();
        let normal = binormal.cross(tangent);
        Some((tangent, normal, binormal))
    }

    /// Center of the osculating circle at `t`.
    ///
    /// None when the curve has no curvature at `t`.
    pub fn center_of_curvature(&self, t: f32) -> Option<Vec3> {
        let kappa = self.curvature(t);
        if kappa < 1e-9 {
            return None;
        }
        let (_, normal, _) = self.frenet(t)?;
        Some(self.point_at(t) + normal / kappa)
    }

    /// Foci of a conic: one focus, plus the second where the conic has two.
    ///
    /// A circle's focus is its center; a line has none.
    pub fn foci(&self) -> Option<(Vec3, Option<Vec3>)> {
        match self {
            Curve::Line { .. } => None,
            Curve::Circle { center, .. } => Some((*center, None)),
            Curve::Ellipse {
                center,
                x_dir,
                major,
                minor,
                ..
            } => {
                let c = (major * major - minor * minor).max(0.0).sqrt();
                Some((*center + c * *x_dir, Some(*center - c * *x_dir)))
            }
            Curve::Parabola {
                vertex,
                x_dir,
                focal,
                ..
            } => Some((*vertex + *focal * *x_dir, None)),
            Curve::Hyperbola {
                center,
                x_dir,
                major,
                minor,
                ..
            } => {
                let c = (major * major + minor * minor).sqrt();
                Some((*center + c * *x_dir, Some(*center - c * *x_dir)))
            }
        }
    }

    /// Directrix lines of a conic as (origin, direction) pairs.
    ///
    /// None for lines and circles (a circle's directrix is at infinity).
    pub fn directrices(&self) -> Option<((Vec3, Vec3), Option<(Vec3, Vec3)>)> {
        let y = self.y_dir();
        match self {
            Curve::Line { .. } | Curve::Circle { .. } => None,
            Curve::Ellipse {
                center,
                x_dir,
                major,
                minor,
                ..
            } => {
                let c = (major * major - minor * minor).max(0.0).sqrt();
                if c < 1e-9 {
                    return None;
                }
                let d = major * major / c;
                Some((
                    (*center + d * *x_dir, y),
                    Some((*center - d * *x_dir, y)),
                ))
            }
            Curve::Parabola {
                vertex,
                x_dir,
                focal,
                ..
            } => Some(((*vertex - *focal * *x_dir, y), None)),
            Curve::Hyperbola {
                center,
                x_dir,
                major,
                minor,
                ..
            } => {
                let c = (major * major + minor * minor).sqrt();
                let d = major * major / c;
                Some((
                    (*center + d * *x_dir, y),
                    Some((*center - d * *x_dir, y)),
                ))
            }
        }
    }

    /// Asymptote lines of a hyperbola as (origin, direction) pairs
    pub fn asymptotes(&self) -> Option<[(Vec3, Vec3); 2]> {
        match self {
            Curve::Hyperbola {
                center,
                x_dir,
                major,
                minor,
                ..
            } => {
                let y = self.y_dir();
                let a1 = (*major * *x_dir + *minor * y).normalize();
                let a2 = (*major * *x_dir - *minor * y).normalize();
                Some([(*center, a1), (*center, a2)])
            }
            _ => None,
        }
    }

    /// Map a normalized fraction in [0, 1] into a parameter within `range`
    pub fn param_at_fraction(range: (f32, f32), fraction: f32) -> f32 {
        let u = fraction.clamp(0.0, 1.0);
        range.0 + u * (range.1 - range.0)
    }

    /// Closest parameter to `point` within `range`.
    ///
    /// Analytic for lines and circles; seeded damped Newton otherwise.
    pub fn project(&self, point: Vec3, range: (f32, f32)) -> f32 {
        match self {
            Curve::Line { origin, dir } => {
                let t = (point - *origin).dot(*dir);
                t.clamp(range.0.min(range.1), range.0.max(range.1))
            }
            Curve::Circle {
                center, axis, x_dir, ..
            } => {
                let v = point - *center;
                let vx = v.dot(*x_dir);
                let vy = v.dot(axis.cross(*x_dir));
                let mut t = vy.atan2(vx);
                // Wrap into the range start before clamping
                while t < range.0 {
                    t += TAU;
                }
                while t > range.0 + TAU {
                    t -= TAU;
                }
                t.clamp(range.0, range.1)
            }
            _ => self.project_newton(point, range),
        }
    }

    /// Minimize |p(t) - point| by damped Newton on the stationarity equation
    /// g(t) = (p(t) - point) · d1(t) = 0, seeded from uniform samples.
    fn project_newton(&self, point: Vec3, range: (f32, f32)) -> f32 {
        let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
        let mut best = lo;
        let mut best_dist = f32::MAX;
        for i in 0..=PROJECT_SEEDS {
            let t = lo + (hi - lo) * (i as f32 / PROJECT_SEEDS as f32);
            let d = (self.point_at(t) - point).length_squared();
            if d < best_dist {
                best_dist = d;
                best = t;
            }
        }

        let mut t = best;
        for _ in 0..PROJECT_MAX_ITERATIONS {
            let diff = self.point_at(t) - point;
            let d1 = self.d1(t);
            let g = diff.dot(d1);
            let dg = d1.length_squared() + diff.dot(self.d2(t));
            if dg.abs() < 1e-9 {
                break;
            }
            let step = g / dg;
            t = (t - step).clamp(lo, hi);
            if step.abs() < PROJECT_TOLERANCE {
                break;
            }
        }
        t
    }
}

/// Project `x_dir` into the plane normal to `axis` and normalize
fn orthonormal_x(axis: Vec3, x_dir: Vec3) -> Vec3 {
    let projected = x_dir - x_dir.dot(axis) * axis;
    if projected.length_squared() < 1e-12 {
        super::any_perpendicular(axis)
    } else {
        projected.normalize()
    }
}
