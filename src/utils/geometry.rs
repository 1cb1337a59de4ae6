// src/utils/geometry.rs

use nalgebra::{Point2 as NaPoint, Rotation2};

pub type Point2 = [f64; 2];

/// Rotates `p` about `pivot` by `angle_deg` degrees, counterclockwise.
///
/// This is the only place angles are applied to points; the axis, the
/// parallels, the horizon and the person icon all go through it.
pub fn rotate(p: Point2, pivot: Point2, angle_deg: f64) -> Point2 {
    let rot = Rotation2::new(angle_deg.to_radians());
    let pivot = NaPoint::from(pivot);
    let out = pivot + rot * (NaPoint::from(p) - pivot);
    [out.x, out.y]
}

/// Point at `radius` from `center`, `angle_deg` counterclockwise from +x.
pub fn polar(center: Point2, radius: f64, angle_deg: f64) -> Point2 {
    let (s, c) = angle_deg.to_radians().sin_cos();
    [center[0] + radius * c, center[1] + radius * s]
}

pub fn translate(p: Point2, by: Point2) -> Point2 {
    [p[0] + by[0], p[1] + by[1]]
}

// Measurement helpers for the geometry checks in tests.

#[cfg(test)]
pub fn distance(a: Point2, b: Point2) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[cfg(test)]
pub fn dot(a: Point2, b: Point2) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[cfg(test)]
pub fn sub(a: Point2, b: Point2) -> Point2 {
    [a[0] - b[0], a[1] - b[1]]
}

#[cfg(test)]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
}
