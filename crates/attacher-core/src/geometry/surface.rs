//! Analytic surfaces
//!
//! Supports the surface queries the attachment modes need: closest-point
//! projection, outward normals and U/V tangent directions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An analytic surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Plane {
        origin: Vec3,
        normal: Vec3,
        x_dir: Vec3,
    },
    Cylinder {
        origin: Vec3,
        axis: Vec3,
        x_dir: Vec3,
        radius: f32,
    },
    Sphere {
        center: Vec3,
        radius: f32,
    },
}

impl Surface {
    /// Create a plane; the in-plane X direction is chosen deterministically
    pub fn plane(origin: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Surface::Plane {
            origin,
            normal,
            x_dir: super::any_perpendicular(normal),
        }
    }

    /// Create a plane with an explicit in-plane X direction
    pub fn plane_with_x(origin: Vec3, normal: Vec3, x_dir: Vec3) -> Self {
        let normal = normal.normalize();
        let projected = x_dir - x_dir.dot(normal) * normal;
        let x_dir = if projected.length_squared() < 1e-12 {
            super::any_perpendicular(normal)
        } else {
            projected.normalize()
        };
        Surface::Plane {
            origin,
            normal,
            x_dir,
        }
    }

    /// Create a cylinder around `axis` through `origin`
    pub fn cylinder(origin: Vec3, axis: Vec3, radius: f32) -> Self {
        let axis = axis.normalize();
        Surface::Cylinder {
            origin,
            axis,
            x_dir: super::any_perpendicular(axis),
            radius,
        }
    }

    /// Create a sphere
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Surface::Sphere { center, radius }
    }

    /// Short kind name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Surface::Plane { .. } => "plane",
            Surface::Cylinder { .. } => "cylinder",
            Surface::Sphere { .. } => "sphere",
        }
    }

    /// A representative point on the surface
    pub fn anchor(&self) -> Vec3 {
        match self {
            Surface::Plane { origin, .. } => *origin,
            Surface::Cylinder {
                origin,
                x_dir,
                radius,
                ..
            } => *origin + *radius * *x_dir,
            Surface::Sphere { center, radius } => *center + *radius * Vec3::X,
        }
    }

    /// The plane data if this surface is planar
    pub fn as_plane(&self) -> Option<(Vec3, Vec3, Vec3)> {
        match self {
            Surface::Plane {
                origin,
                normal,
                x_dir,
            } => Some((*origin, *normal, *x_dir)),
            _ => None,
        }
    }

    /// Closest point on the surface to `point`
    pub fn project(&self, point: Vec3) -> Vec3 {
        match self {
            Surface::Plane { origin, normal, .. } => {
                point - (point - *origin).dot(*normal) * *normal
            }
            Surface::Cylinder {
                origin,
                axis,
                x_dir,
                radius,
            } => {
                let foot = *origin + (point - *origin).dot(*axis) * *axis;
                let radial = point - foot;
                if radial.length_squared() < 1e-12 {
                    foot + *radius * *x_dir
                } else {
                    foot + *radius * radial.normalize()
                }
            }
            Surface::Sphere { center, radius } => {
                let radial = point - *center;
                if radial.length_squared() < 1e-12 {
                    *center + *radius * Vec3::X
                } else {
                    *center + *radius * radial.normalize()
                }
            }
        }
    }

    /// Outward unit normal at the point of the surface closest to `point`
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Surface::Plane { normal, .. } => *normal,
            Surface::Cylinder { origin, axis, x_dir, .. } => {
                let foot = *origin + (point - *origin).dot(*axis) * *axis;
                let radial = point - foot;
                if radial.length_squared() < 1e-12 {
                    *x_dir
                } else {
                    radial.normalize()
                }
            }
            Surface::Sphere { center, .. } => {
                let radial = point - *center;
                if radial.length_squared() < 1e-12 {
                    Vec3::X
                } else {
                    radial.normalize()
                }
            }
        }
    }

    /// U and V tangent directions at the point of the surface closest to
    /// `point`.
    ///
    /// For a plane these are the in-plane axes; for a cylinder U runs around
    /// the circumference and V along the axis; for a sphere U runs along the
    /// parallel and V along the meridian.
    pub fn tangents_at(&self, point: Vec3) -> (Vec3, Vec3) {
        match self {
            Surface::Plane { normal, x_dir, .. } => (*x_dir, normal.cross(*x_dir)),
            Surface::Cylinder { axis, .. } => {
                let normal = self.normal_at(point);
                (axis.cross(normal), *axis)
            }
            Surface::Sphere { .. } => {
                let normal = self.normal_at(point);
                let east = Vec3::Z.cross(normal);
                let east = if east.length_squared() < 1e-12 {
                    super::any_perpendicular(normal)
                } else {
                    east.normalize()
                };
                (east, normal.cross(east))
            }
        }
    }
}
