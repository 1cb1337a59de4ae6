// src/model/earth.rs

use crate::utils::geometry::{polar, rotate, translate, Point2};
use serde::{Deserialize, Serialize};

/// A tilted globe seen edge-on, with the Sun off to +x.
///
/// Angles are in degrees, counterclockwise from +x. A negative tilt leans the
/// north pole toward the Sun, which is the northern summer solstice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Earth {
    /// Observer latitude.
    pub latitude: f64,
    pub axial_tilt: f64,
    /// Height of the person icon.
    pub person_scale: f64,
    pub radius: f64,
    pub center: Point2,
}

// The storyboard globe.
impl Default for Earth {
    fn default() -> Self {
        Self {
            latitude: 42.0,
            axial_tilt: -23.5,
            person_scale: 1.5,
            radius: 10.0,
            center: [0.0, 0.0],
        }
    }
}

impl Earth {
    pub fn new(latitude: f64, axial_tilt: f64) -> Self {
        Self {
            latitude,
            axial_tilt,
            ..Default::default()
        }
    }

    /// Chord of the parallel at latitude `l` on the untilted globe, west end
    /// first.
    pub fn parallel_chord(&self, l: f64) -> (Point2, Point2) {
        let [x0, y0] = self.center;
        let (s, c) = l.to_radians().sin_cos();
        let start = [x0 - self.radius * c, y0 + self.radius * s];
        let end = [x0 + self.radius * c, y0 + self.radius * s];
        (start, end)
    }

    /// The same chord after the globe is tilted.
    pub fn parallel_endpoints(&self, l: f64) -> (Point2, Point2) {
        let (start, end) = self.parallel_chord(l);
        (
            rotate(start, self.center, self.axial_tilt),
            rotate(end, self.center, self.axial_tilt),
        )
    }

    /// Rotation axis, south end first, overhanging the surface by `overhang`
    /// radii.
    pub fn axis_endpoints(&self, overhang: f64) -> (Point2, Point2) {
        let [x0, y0] = self.center;
        let south = [x0, y0 - overhang * self.radius];
        let north = [x0, y0 + overhang * self.radius];
        (
            rotate(south, self.center, self.axial_tilt),
            rotate(north, self.center, self.axial_tilt),
        )
    }

    /// Direction of the observer as drawn: latitude measured from the tilted
    /// equator.
    pub fn observer_angle(&self) -> f64 {
        self.latitude + self.axial_tilt
    }

    /// Where the observer stands.
    pub fn surface_point(&self) -> Point2 {
        polar(self.center, self.radius, self.observer_angle())
    }

    /// Tangent to the globe at the observer, `half_length` either side of the
    /// surface point.
    pub fn horizon_endpoints(&self, half_length: f64) -> (Point2, Point2) {
        let angle = self.observer_angle();
        let sc = self.surface_point();
        let ts = rotate([-half_length, 0.0], [0.0, 0.0], 90.0 + angle);
        let te = rotate([half_length, 0.0], [0.0, 0.0], 90.0 + angle);
        (translate(sc, ts), translate(sc, te))
    }

    /// Latitudes of the tropics (north, south).
    pub fn tropic_latitudes(&self) -> (f64, f64) {
        let t = self.axial_tilt.abs();
        (t, -t)
    }

    /// Latitudes of the arctic and antarctic circles.
    pub fn polar_circle_latitudes(&self) -> (f64, f64) {
        let t = 90.0 - self.axial_tilt.abs();
        (t, -t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::geometry::{distance, dot, midpoint, sub};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_is_storyboard_globe() {
        let e = Earth::default();
        assert_eq!((e.latitude, e.axial_tilt), (42.0, -23.5));
        assert_eq!((e.person_scale, e.radius), (1.5, 10.0));
        assert_eq!(e.center, [0.0, 0.0]);
    }

    #[test]
    fn test_equator_chord_symmetric_before_tilt() {
        let e = Earth {
            center: [3.0, -1.0],
            ..Earth::new(42.0, -23.5)
        };
        let (s, t) = e.parallel_chord(0.0);
        assert!((s[1] - t[1]).abs() < EPS);
        assert!(((s[0] - 3.0) + (t[0] - 3.0)).abs() < EPS);
        assert!((t[0] - s[0] - 2.0 * e.radius).abs() < EPS);
    }

    #[test]
    fn test_parallel_endpoints_stay_on_globe() {
        let e = Earth::new(42.0, -23.5);
        for l in [-66.5, -23.5, 0.0, 10.0, 89.0] {
            let (s, t) = e.parallel_endpoints(l);
            assert!((distance(s, e.center) - e.radius).abs() < EPS);
            assert!((distance(t, e.center) - e.radius).abs() < EPS);
        }
    }

    #[test]
    fn test_untilted_degenerate_parallels() {
        let e = Earth::new(42.0, 0.0);
        assert_eq!(e.tropic_latitudes(), (0.0, -0.0));
        assert_eq!(e.polar_circle_latitudes(), (90.0, -90.0));

        // At the poles the chord collapses to a point.
        let (s, t) = e.parallel_endpoints(90.0);
        assert!(distance(s, t) < EPS);
        assert!(distance(s, [0.0, e.radius]) < EPS);
    }

    #[test]
    fn test_tilt_sign_does_not_move_tropics() {
        let north = Earth::new(42.0, 23.5);
        let south = Earth::new(42.0, -23.5);
        assert_eq!(north.tropic_latitudes(), south.tropic_latitudes());
        assert_eq!(north.polar_circle_latitudes(), (66.5, -66.5));
    }

    #[test]
    fn test_axis_leans_by_tilt() {
        let e = Earth::new(42.0, -23.5);
        let (_, north) = e.axis_endpoints(1.2);
        let lean = north[1].atan2(north[0]).to_degrees();
        assert!((lean - 66.5).abs() < EPS);
        assert!((distance(north, e.center) - 12.0).abs() < EPS);
    }

    #[test]
    fn test_horizon_is_tangent_at_observer() {
        let e = Earth::new(42.0, -23.5);
        let sc = e.surface_point();
        let (s, t) = e.horizon_endpoints(0.75 * e.radius);

        assert!(distance(midpoint(s, t), sc) < EPS);
        assert!((distance(s, t) - 1.5 * e.radius).abs() < EPS);

        let radial = sub(sc, e.center);
        let along = sub(t, s);
        assert!(dot(radial, along).abs() < EPS);
    }

    #[test]
    fn test_observer_angle_adds_tilt() {
        let e = Earth::new(42.0, -23.5);
        assert!((e.observer_angle() - 18.5).abs() < EPS);
        let sc = e.surface_point();
        assert!((distance(sc, e.center) - e.radius).abs() < EPS);
    }
}
