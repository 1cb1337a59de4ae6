// src/rendering/export.rs

use super::canvas::{Anchor, Canvas, HAlign, LineStyle, Mark, MarkKind, TextMark, VAlign, View};
use crate::config::ExportFormat;
use crate::utils::geometry::Point2;
use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface, LineCap, LineJoin, PdfSurface, SvgSurface};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while writing a frame.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("PNG write error: {0}")]
    Png(#[from] cairo::IoError),
    #[error("Invalid figure size: {0}x{1}")]
    InvalidSize(i32, i32),
}

/// Picks the format from the extension of `path`. Paths without a known
/// extension get `default` (PNG if none) and its extension appended.
pub fn resolve_output(path: &Path, default: Option<ExportFormat>) -> (PathBuf, ExportFormat) {
    if let Some(format) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::from_extension)
    {
        return (path.to_path_buf(), format);
    }

    let format = default.unwrap_or(ExportFormat::Png);
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    (PathBuf::from(name), format)
}

// --- File Export Entry Point ---
pub fn export(canvas: &Canvas, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    let started = Instant::now();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        ExportFormat::Png => {
            let (width, height) = canvas.style.pixel_size();
            if width <= 0 || height <= 0 {
                return Err(ExportError::InvalidSize(width, height));
            }
            let surface = ImageSurface::create(Format::ARgb32, width, height)?;
            {
                let cr = Context::new(&surface)?;
                paint(&cr, canvas, width as f64, height as f64, canvas.style.dpi / 72.0)?;
            }

            let mut file = BufWriter::new(File::create(path)?);
            surface.write_to_png(&mut file)?;
            file.flush()?;
        }
        ExportFormat::Pdf => {
            let (width, height) = canvas.style.page_size();
            let surface = PdfSurface::new(width, height, path)?;
            {
                let cr = Context::new(&surface)?;
                paint(&cr, canvas, width, height, 1.0)?;
            }
            surface.finish();
        }
        ExportFormat::Svg => {
            let (width, height) = canvas.style.page_size();
            let surface = SvgSurface::new(width, height, Some(path))?;
            {
                let cr = Context::new(&surface)?;
                paint(&cr, canvas, width, height, 1.0)?;
            }
            surface.finish();
        }
    }

    log::debug!("Exported {:?} in {:?}", path, started.elapsed());
    Ok(())
}

/// Data to device mapping. Device y grows downward.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    pub view: View,
    pub width: f64,
    pub height: f64,
    /// Device units per data unit.
    pub scale: f64,
    /// Device units per typographic point.
    pub units_per_pt: f64,
}

impl Device {
    pub fn new(canvas: &Canvas, width: f64, height: f64, units_per_pt: f64) -> Self {
        let view = canvas.view(width, height);
        Self {
            view,
            width,
            height,
            scale: width / view.width(),
            units_per_pt,
        }
    }

    pub fn data(&self, p: Point2) -> (f64, f64) {
        (
            (p[0] - self.view.x.0) * self.scale,
            self.height - (p[1] - self.view.y.0) * self.scale,
        )
    }

    pub fn figure(&self, f: Point2) -> (f64, f64) {
        (f[0] * self.width, (1.0 - f[1]) * self.height)
    }

    fn anchor(&self, at: Anchor) -> (f64, f64) {
        match at {
            Anchor::Data(p) => self.data(p),
            Anchor::Figure(f) => self.figure(f),
        }
    }
}

fn paint(cr: &Context, canvas: &Canvas, width: f64, height: f64, units_per_pt: f64) -> Result<(), ExportError> {
    let (r, g, b) = canvas.style.background;
    cr.set_source_rgb(r, g, b);
    cr.paint()?;

    let device = Device::new(canvas, width, height, units_per_pt);

    cr.select_font_face("sans-serif", FontSlant::Normal, FontWeight::Normal);
    cr.set_font_size(canvas.style.font_size * units_per_pt);
    cr.set_line_join(LineJoin::Round);

    for mark in canvas.paint_order() {
        paint_mark(cr, &device, mark)?;
    }

    // Caption last, over the plot.
    if let Some(caption) = canvas.caption() {
        paint_text(cr, &device, caption)?;
    }
    Ok(())
}

fn trace(cr: &Context, device: &Device, points: &[Point2]) {
    for (i, p) in points.iter().enumerate() {
        let (x, y) = device.data(*p);
        if i == 0 {
            cr.move_to(x, y);
        } else {
            cr.line_to(x, y);
        }
    }
}

fn paint_mark(cr: &Context, device: &Device, mark: &Mark) -> Result<(), ExportError> {
    match &mark.kind {
        MarkKind::Polyline {
            points,
            color,
            style,
            width,
        } => {
            let lw = width * device.units_per_pt;
            let dashes: Vec<f64> = style.dash_pattern().iter().map(|d| d * lw).collect();

            cr.set_source_rgb(color.0, color.1, color.2);
            cr.set_line_width(lw);
            cr.set_dash(&dashes, 0.0);
            cr.set_line_cap(match style {
                LineStyle::Dotted => LineCap::Round,
                LineStyle::Solid | LineStyle::Dashed => LineCap::Butt,
            });

            trace(cr, device, points);
            cr.stroke()?;
            cr.set_dash(&[], 0.0);
        }
        MarkKind::Fill { points, color } => {
            cr.set_source_rgb(color.0, color.1, color.2);
            trace(cr, device, points);
            cr.close_path();
            cr.fill()?;
        }
        MarkKind::Marker {
            at,
            shape,
            area,
            color,
        } => {
            if shape.is_empty() {
                return Ok(());
            }
            // Area is the square of the marker's size in points.
            let r = 0.5 * area.max(0.0).sqrt() * device.units_per_pt;
            let (cx, cy) = device.data(*at);

            cr.set_source_rgb(color.0, color.1, color.2);
            for (i, p) in shape.iter().enumerate() {
                let (x, y) = (cx + p[0] * r, cy - p[1] * r);
                if i == 0 {
                    cr.move_to(x, y);
                } else {
                    cr.line_to(x, y);
                }
            }
            cr.close_path();
            cr.fill()?;
        }
        MarkKind::Text(text) => paint_text(cr, device, text)?,
    }
    Ok(())
}

/// Offset of the first baseline from the anchor, for a block of `lines`.
pub fn first_baseline(valign: VAlign, ascent: f64, descent: f64, line_height: f64, lines: usize) -> f64 {
    let block = ascent + descent + line_height * lines.saturating_sub(1) as f64;
    match valign {
        VAlign::Top => ascent,
        VAlign::Center => ascent - 0.5 * block,
        VAlign::Bottom => ascent - block,
        VAlign::Baseline => 0.0,
    }
}

pub fn line_offset(halign: HAlign, advance: f64) -> f64 {
    match halign {
        HAlign::Left => 0.0,
        HAlign::Center => -0.5 * advance,
        HAlign::Right => -advance,
    }
}

fn paint_text(cr: &Context, device: &Device, text: &TextMark) -> Result<(), ExportError> {
    let lines: Vec<&str> = text.text.lines().collect();
    if lines.is_empty() {
        return Ok(());
    }

    let (ax, ay) = device.anchor(text.at);
    let fe = cr.font_extents()?;
    let line_height = fe.height();
    let baseline = first_baseline(text.valign, fe.ascent(), fe.descent(), line_height, lines.len());

    cr.save()?;
    cr.translate(ax, ay);
    cr.rotate(-text.rotation.to_radians());
    cr.set_source_rgb(text.color.0, text.color.1, text.color.2);

    for (i, line) in lines.iter().enumerate() {
        let advance = cr.text_extents(line)?.x_advance();
        cr.move_to(line_offset(text.halign, advance), baseline + i as f64 * line_height);
        cr.show_text(line)?;
    }

    cr.restore()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigureStyle;
    use crate::rendering::canvas::BLUE;

    fn sample() -> Canvas {
        let mut c = Canvas::new(FigureStyle {
            width_in: 3.2,
            height_in: 1.8,
            dpi: 50.0,
            ..FigureStyle::default()
        });
        c.begin_layer("line");
        c.plot(vec![[-1.0, 0.0], [1.0, 0.0]], BLUE, LineStyle::Dotted);
        c.text(TextMark::new("two\nlines", Anchor::Data([0.0, 0.0])).rotation(30.0));
        c.set_caption("caption");
        c
    }

    #[test]
    fn test_resolve_output_appends_extension() {
        let (p, f) = resolve_output(Path::new("out/earth_03"), None);
        assert_eq!(p, PathBuf::from("out/earth_03.png"));
        assert_eq!(f, ExportFormat::Png);

        let (p, f) = resolve_output(Path::new("earth_03"), Some(ExportFormat::Pdf));
        assert_eq!(p, PathBuf::from("earth_03.pdf"));
        assert_eq!(f, ExportFormat::Pdf);

        let (p, f) = resolve_output(Path::new("slide.svg"), Some(ExportFormat::Png));
        assert_eq!(p, PathBuf::from("slide.svg"));
        assert_eq!(f, ExportFormat::Svg);
    }

    #[test]
    fn test_device_mapping_flips_y() {
        let mut c = Canvas::new(FigureStyle::default());
        c.set_limits(Some((0.0, 16.0)), Some((0.0, 9.0)));
        let d = Device::new(&c, 1600.0, 900.0, 1.0);
        let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9;
        assert!(close(d.data([0.0, 0.0]), (0.0, 900.0)));
        assert!(close(d.data([16.0, 9.0]), (1600.0, 0.0)));
        assert!(close(d.figure([0.025, 0.05]), (40.0, 855.0)));
    }

    #[test]
    fn test_first_baseline_alignment() {
        // ascent 8, descent 2, line height 12
        assert_eq!(first_baseline(VAlign::Top, 8.0, 2.0, 12.0, 1), 8.0);
        assert_eq!(first_baseline(VAlign::Bottom, 8.0, 2.0, 12.0, 1), -2.0);
        assert_eq!(first_baseline(VAlign::Center, 8.0, 2.0, 12.0, 1), 3.0);
        assert_eq!(first_baseline(VAlign::Baseline, 8.0, 2.0, 12.0, 3), 0.0);
        // Bottom of a three line block: last descent on the anchor.
        assert_eq!(first_baseline(VAlign::Bottom, 8.0, 2.0, 12.0, 3), -26.0);
    }

    #[test]
    fn test_line_offset() {
        assert_eq!(line_offset(HAlign::Left, 40.0), 0.0);
        assert_eq!(line_offset(HAlign::Center, 40.0), -20.0);
        assert_eq!(line_offset(HAlign::Right, 40.0), -40.0);
    }

    #[test]
    fn test_png_has_figure_pixel_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames").join("small.png");
        export(&sample(), &path, ExportFormat::Png).unwrap();

        let mut file = File::open(&path).unwrap();
        let png = ImageSurface::create_from_png(&mut file).unwrap();
        assert_eq!((png.width(), png.height()), (160, 90));
    }

    #[test]
    fn test_vector_formats_write_files() {
        let dir = tempfile::tempdir().unwrap();
        for format in [ExportFormat::Pdf, ExportFormat::Svg] {
            let (path, _) = resolve_output(&dir.path().join("frame"), Some(format));
            export(&sample(), &path, format).unwrap();
            assert!(path.metadata().unwrap().len() > 0, "{:?} is empty", path);
        }
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut c = sample();
        c.style.dpi = 0.0;
        let dir = tempfile::tempdir().unwrap();
        let err = export(&c, &dir.path().join("x.png"), ExportFormat::Png).unwrap_err();
        assert!(matches!(err, ExportError::InvalidSize(0, 0)));
    }
}
