// src/rendering/primitives.rs

use super::canvas::{Canvas, LineStyle, Rgb, Z_LINE};
use crate::utils::geometry::{polar, rotate, translate, Point2};
use std::f64::consts::PI;

/// Inner radius of a star marker relative to its tips.
const STAR_INNER: f64 = 0.381966;

pub fn circle(center: Point2, radius: f64, samples: usize) -> Vec<Point2> {
    let n = samples.max(3);
    (0..=n)
        .map(|i| polar(center, radius, 360.0 * i as f64 / n as f64))
        .collect()
}

/// Unit star with `n` tips, first tip straight up.
pub fn star(n: usize) -> Vec<Point2> {
    let n = n.max(2);
    (0..2 * n)
        .map(|i| {
            let r = if i % 2 == 0 { 1.0 } else { STAR_INNER };
            let theta = PI / 2.0 + PI * i as f64 / n as f64;
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}

/// Circular arc with an arrow head at `theta_end`. Angles in degrees; the arc
/// runs whichever way leads from start to end.
#[derive(Debug, Clone, Copy)]
pub struct ArcArrow {
    pub center: Point2,
    pub radius: f64,
    pub theta_start: f64,
    pub theta_end: f64,
}

impl ArcArrow {
    pub fn new(center: Point2, radius: f64, theta_start: f64, theta_end: f64) -> Self {
        Self {
            center,
            radius,
            theta_start,
            theta_end,
        }
    }

    pub fn sweep(&self) -> f64 {
        self.theta_end - self.theta_start
    }

    pub fn arc_points(&self) -> Vec<Point2> {
        let sweep = self.sweep();
        let n = (sweep.abs().ceil() as usize).max(1);
        (0..=n)
            .map(|i| {
                let t = self.theta_start + sweep * i as f64 / n as f64;
                polar(self.center, self.radius, t)
            })
            .collect()
    }

    /// Triangle with its tip on the arc end, opening back along the arc.
    pub fn head(&self) -> [Point2; 3] {
        let length = 0.15 * self.radius;
        let half_width = 0.4 * length;
        let tip = polar(self.center, self.radius, self.theta_end);

        // Direction of travel at the tip.
        let turn = if self.sweep() >= 0.0 { 90.0 } else { -90.0 };
        let back = rotate([-length, 0.0], [0.0, 0.0], self.theta_end + turn);
        let side = rotate([half_width, 0.0], [0.0, 0.0], self.theta_end);

        let base = translate(tip, back);
        [
            tip,
            translate(base, side),
            translate(base, [-side[0], -side[1]]),
        ]
    }

    pub fn draw(&self, canvas: &mut Canvas, color: Rgb) {
        if self.sweep().abs() < 1e-9 || self.radius <= 0.0 {
            return;
        }
        canvas.plot(self.arc_points(), color, LineStyle::Solid);
        canvas.fill(self.head().to_vec(), color, Z_LINE);
    }
}

/// Stick figure of height `scale`, standing on its local -y, turned by
/// `angle_deg` about `center`.
pub fn person(center: Point2, scale: f64, angle_deg: f64) -> Vec<Vec<Point2>> {
    let l = scale;
    let local: Vec<Vec<Point2>> = vec![
        circle([0.0, 0.38 * l], 0.12 * l, 24),
        vec![[0.0, 0.26 * l], [0.0, -0.1 * l]],
        vec![[-0.2 * l, 0.02 * l], [0.0, 0.16 * l], [0.2 * l, 0.02 * l]],
        vec![[-0.15 * l, -0.5 * l], [0.0, -0.1 * l], [0.15 * l, -0.5 * l]],
    ];

    local
        .into_iter()
        .map(|part| {
            part.into_iter()
                .map(|p| translate(rotate(p, [0.0, 0.0], angle_deg), center))
                .collect()
        })
        .collect()
}

pub fn draw_person(canvas: &mut Canvas, center: Point2, scale: f64, angle_deg: f64, color: Rgb) {
    for part in person(center, scale, angle_deg) {
        canvas.plot(part, color, LineStyle::Solid);
    }
}
