// src/rendering/painter.rs
// Earth features, one draw call per concept. Everything is recorded on the
// canvas in data coordinates (globe radius R, Sun toward +x).

use super::canvas::*;
use super::primitives::{circle, draw_person, star, ArcArrow};
use crate::model::Earth;
use crate::utils::geometry::polar;

/// Sun marker area in points squared (outer ring, inner fill).
const SUN_OUTER: f64 = 2000.0;
const SUN_INNER: f64 = 1900.0;
const SUN_TIPS: usize = 16;
const Z_NIGHT: i32 = -1;
const Z_SUN: i32 = 100;

impl Earth {
    pub fn draw_earth(&self, canvas: &mut Canvas) {
        canvas.plot(circle(self.center, self.radius, 360), BLUE, LineStyle::Solid);
    }

    /// Shade the half facing away from the Sun.
    pub fn draw_day_night(&self, canvas: &mut Canvas) {
        let mut night: Vec<_> = (90..=270)
            .map(|deg| polar(self.center, self.radius, deg as f64))
            .collect();
        night.push(night[0]);
        canvas.fill(night, GREY, Z_NIGHT);
    }

    pub fn draw_ecliptic(&self, canvas: &mut Canvas) {
        let [x0, y0] = self.center;
        let r = self.radius;
        let far = 5.0;

        canvas.plot(vec![[x0 - 1.2 * r, y0], [x0 + far * r, y0]], BLACK, LineStyle::Dotted);
        canvas.plot(vec![[x0, y0 - r], [x0, y0 + r]], BLACK, LineStyle::Dotted);

        canvas.text(
            TextMark::new("ecliptic", Anchor::Data([x0 + far * r, y0 + 0.1 * r]))
                .halign(HAlign::Right),
        );
    }

    pub fn draw_rot_axis(&self, canvas: &mut Canvas) {
        let (south, north) = self.axis_endpoints(1.2);
        canvas.plot(vec![south, north], BLUE, LineStyle::Solid);

        ArcArrow::new(self.center, 0.5 * self.radius, 90.0 + self.axial_tilt, 90.0)
            .draw(canvas, BLUE);

        let mid = 0.5 * (90.0 + self.axial_tilt + 90.0);
        canvas.text(
            TextMark::new("α", Anchor::Data(polar(self.center, 0.51 * self.radius, mid)))
                .color(BLUE)
                .halign(HAlign::Left),
        );
    }

    /// Line of latitude `l`, with an optional label hanging off its west end.
    pub fn draw_parallel(&self, canvas: &mut Canvas, l: f64, color: Rgb, style: LineStyle, label: Option<&str>) {
        let (start, end) = self.parallel_endpoints(l);
        canvas.plot(vec![start, end], color, style);

        if let Some(label) = label {
            canvas.text(
                TextMark::new(label, Anchor::Data([start[0] - 0.01 * self.radius, start[1]]))
                    .color(color)
                    .halign(HAlign::Right)
                    .valign(parallel_label_valign(l)),
            );
        }
    }

    pub fn draw_equator(&self, canvas: &mut Canvas) {
        self.draw_parallel(canvas, 0.0, BLUE, LineStyle::Solid, Some("equator"));
    }

    pub fn draw_sun(&self, canvas: &mut Canvas) {
        let at = [self.center[0] + 4.5 * self.radius, self.center[1]];
        canvas.scatter(at, star(SUN_TIPS), SUN_OUTER, BLACK, Z_SUN);
        canvas.scatter(at, star(SUN_TIPS), SUN_INNER, YELLOW, Z_SUN);
    }

    pub fn draw_tropics(&self, canvas: &mut Canvas) {
        let (cancer, capricorn) = self.tropic_latitudes();
        self.draw_parallel(canvas, cancer, GREEN, LineStyle::Dashed, Some("tropic of cancer"));
        self.draw_parallel(canvas, capricorn, GREEN, LineStyle::Dashed, Some("tropic of capricorn"));
    }

    pub fn draw_arctic_circles(&self, canvas: &mut Canvas) {
        let (arctic, antarctic) = self.polar_circle_latitudes();
        self.draw_parallel(canvas, arctic, GREEN, LineStyle::Dashed, Some("arctic circle"));
        self.draw_parallel(canvas, antarctic, GREEN, LineStyle::Dashed, Some("antarctic circle"));
    }

    /// Observer icon, the radius to it and the latitude arc from the equator.
    pub fn draw_my_latitude(&self, canvas: &mut Canvas) {
        let angle = self.observer_angle();
        let l = self.person_scale;

        let icon_center = polar(self.center, self.radius + 0.5 * l, angle);
        draw_person(canvas, icon_center, l, angle - 90.0, RED);

        canvas.plot(vec![self.center, self.surface_point()], RED, LineStyle::Solid);

        let equator = self.axial_tilt;
        ArcArrow::new(self.center, 0.5 * self.radius, equator, angle).draw(canvas, RED);

        let mid = 0.5 * (equator + angle);
        canvas.text(
            TextMark::new("l", Anchor::Data(polar(self.center, 0.51 * self.radius, mid)))
                .color(RED)
                .halign(HAlign::Left),
        );
    }

    pub fn draw_zenith(&self, canvas: &mut Canvas) {
        let tip = polar(self.center, 3.0 * self.radius, self.observer_angle());
        canvas.plot(vec![self.center, tip], RED, LineStyle::Dotted);
        canvas.text(TextMark::new("zenith", Anchor::Data(tip)).color(RED).halign(HAlign::Left));
    }

    pub fn draw_horizon(&self, canvas: &mut Canvas) {
        let (start, end) = self.horizon_endpoints(0.75 * self.radius);
        canvas.plot(vec![start, end], CYAN, LineStyle::Solid);
        canvas.text(
            TextMark::new("local horizon", Anchor::Data(start))
                .color(CYAN)
                .halign(HAlign::Left)
                .valign(VAlign::Top)
                .rotation(270.0 + self.observer_angle()),
        );
    }
}

/// Labels north of the equator sit on their line, southern ones hang below.
pub fn parallel_label_valign(l: f64) -> VAlign {
    if l > 0.0 {
        VAlign::Bottom
    } else if l == 0.0 {
        VAlign::Center
    } else {
        VAlign::Top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigureStyle;
    use crate::utils::geometry::distance;

    fn canvas() -> Canvas {
        let mut c = Canvas::new(FigureStyle::default());
        c.begin_layer("test");
        c
    }

    fn texts(c: &Canvas) -> Vec<TextMark> {
        c.paint_order()
            .into_iter()
            .filter_map(|m| match &m.kind {
                MarkKind::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_label_alignment_follows_latitude_sign() {
        assert_eq!(parallel_label_valign(23.5), VAlign::Bottom);
        assert_eq!(parallel_label_valign(0.0), VAlign::Center);
        assert_eq!(parallel_label_valign(-0.0), VAlign::Center);
        assert_eq!(parallel_label_valign(-66.5), VAlign::Top);
    }

    #[test]
    fn test_tropics_are_labelled() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_tropics(&mut c);

        let labels = texts(&c);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "tropic of cancer");
        assert_eq!(labels[0].valign, VAlign::Bottom);
        assert_eq!(labels[1].text, "tropic of capricorn");
        assert_eq!(labels[1].valign, VAlign::Top);
        assert!(labels.iter().all(|t| t.color == GREEN && t.halign == HAlign::Right));
    }

    #[test]
    fn test_parallel_label_sits_left_of_line() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_equator(&mut c);

        let (start, _) = e.parallel_endpoints(0.0);
        let label = &texts(&c)[0];
        match label.at {
            Anchor::Data(p) => {
                assert!((p[0] - (start[0] - 0.1)).abs() < 1e-9);
                assert!((p[1] - start[1]).abs() < 1e-9);
            }
            Anchor::Figure(_) => panic!("label should be in data space"),
        }
    }

    #[test]
    fn test_night_is_behind_everything() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_earth(&mut c);
        e.draw_day_night(&mut c);

        let first = c.paint_order()[0];
        match &first.kind {
            MarkKind::Fill { points, color } => {
                assert_eq!(*color, GREY);
                assert_eq!(points.first(), points.last());
                assert!(points.iter().all(|p| p[0] <= 1e-9));
            }
            other => panic!("expected night fill first, got {:?}", other),
        }
    }

    #[test]
    fn test_sun_is_on_top_and_doubled() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_sun(&mut c);
        e.draw_earth(&mut c);

        let order = c.paint_order();
        let markers: Vec<_> = order
            .iter()
            .filter_map(|m| match &m.kind {
                MarkKind::Marker { at, area, color, .. } => Some((*at, *area, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec![([45.0, 0.0], 2000.0, BLACK), ([45.0, 0.0], 1900.0, YELLOW)]);
        assert_eq!(order.last().map(|m| m.z), Some(Z_SUN));
    }

    #[test]
    fn test_zenith_ray_length() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_zenith(&mut c);

        match &c.layers()[0].marks[0].kind {
            MarkKind::Polyline { points, style, .. } => {
                assert_eq!(*style, LineStyle::Dotted);
                assert!((distance(points[1], e.center) - 30.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_horizon_label_follows_tangent() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_horizon(&mut c);

        let label = &texts(&c)[0];
        assert_eq!(label.text, "local horizon");
        assert!((label.rotation - 288.5).abs() < 1e-9);
    }

    #[test]
    fn test_my_latitude_parts() {
        let e = Earth::new(42.0, -23.5);
        let mut c = canvas();
        e.draw_my_latitude(&mut c);

        // 4 person strokes, radius line, arc, arc head, label
        assert_eq!(c.mark_count(), 8);
        assert_eq!(texts(&c)[0].text, "l");
    }
}
