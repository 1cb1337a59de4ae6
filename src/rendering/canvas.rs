// src/rendering/canvas.rs

use crate::config::FigureStyle;
use crate::utils::geometry::Point2;

pub type Rgb = (f64, f64, f64);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const BLUE: Rgb = (0.0, 0.0, 1.0);
pub const GREEN: Rgb = (0.0, 0.5, 0.0);
pub const RED: Rgb = (1.0, 0.0, 0.0);
pub const CYAN: Rgb = (0.0, 0.75, 0.75);
pub const YELLOW: Rgb = (1.0, 1.0, 0.0);
pub const GREY: Rgb = (0.75, 0.75, 0.75);

pub const Z_LINE: i32 = 2;
pub const Z_TEXT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
  Solid,
  Dashed,
  Dotted,
}

impl LineStyle {
  /// Dash pattern in multiples of the line width.
  pub fn dash_pattern(self) -> &'static [f64] {
    match self {
      LineStyle::Solid => &[],
      LineStyle::Dashed => &[3.7, 1.6],
      LineStyle::Dotted => &[1.0, 1.65],
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
  Left,
  Center,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
  Top,
  Center,
  Bottom,
  Baseline,
}

/// Where a text mark is pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
  /// Data coordinates.
  Data(Point2),
  /// Fractions of the figure, origin bottom-left.
  Figure(Point2),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
  pub text: String,
  pub at: Anchor,
  pub color: Rgb,
  pub halign: HAlign,
  pub valign: VAlign,
  /// Degrees, counterclockwise.
  pub rotation: f64,
}

impl TextMark {
  pub fn new(text: impl Into<String>, at: Anchor) -> Self {
    Self {
      text: text.into(),
      at,
      color: BLACK,
      halign: HAlign::Left,
      valign: VAlign::Baseline,
      rotation: 0.0,
    }
  }

  pub fn color(mut self, color: Rgb) -> Self {
    self.color = color;
    self
  }

  pub fn halign(mut self, halign: HAlign) -> Self {
    self.halign = halign;
    self
  }

  pub fn valign(mut self, valign: VAlign) -> Self {
    self.valign = valign;
    self
  }

  pub fn rotation(mut self, degrees: f64) -> Self {
    self.rotation = degrees;
    self
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkKind {
  Polyline {
    points: Vec<Point2>,
    color: Rgb,
    style: LineStyle,
    /// Points.
    width: f64,
  },
  Fill {
    points: Vec<Point2>,
    color: Rgb,
  },
  /// A unit outline scaled to `area` (points squared) around `at`.
  Marker {
    at: Point2,
    shape: Vec<Point2>,
    area: f64,
    color: Rgb,
  },
  Text(TextMark),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
  pub kind: MarkKind,
  pub z: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Layer {
  pub name: String,
  pub marks: Vec<Mark>,
}

/// Axis-aligned data window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
  pub x: (f64, f64),
  pub y: (f64, f64),
}

impl View {
  pub fn width(&self) -> f64 {
    self.x.1 - self.x.0
  }

  pub fn height(&self) -> f64 {
    self.y.1 - self.y.0
  }

  /// Moves one axis about its centre until the data aspect matches
  /// `width / height` of the device, in the manner of an equal-aspect
  /// "datalim" fit. The axis is shrunk when the geometry in `data` still fits
  /// the shrunk window, otherwise the other axis is grown.
  pub fn fit_equal_aspect(self, width: f64, height: f64, data: Option<View>) -> View {
    let mut view = self;
    if view.width() <= 0.0 {
      let c = view.x.0;
      view.x = (c - 0.5, c + 0.5);
    }
    if view.height() <= 0.0 {
      let c = view.y.0;
      view.y = (c - 0.5, c + 0.5);
    }
    if width <= 0.0 || height <= 0.0 {
      return view;
    }

    let ratio = height / width;
    let (xsize, ysize) = (view.width(), view.height());
    let y_expander = ratio * xsize / ysize - 1.0;
    if y_expander.abs() < 1e-9 {
      return view;
    }

    // Without geometry, treat the window itself as the data; this always grows.
    let data = data.unwrap_or(view);
    let xr = 1.05 * data.width();
    let yr = 1.05 * data.height();
    let target_y = ratio * xsize;
    let target_x = ysize / ratio;

    let adjust_y = if xsize - xr > 0.0 && ysize - yr > 0.0 {
      (target_y - yr > 0.0 && y_expander < 0.0) || (target_x - xr < 0.0 && y_expander > 0.0)
    } else {
      y_expander > 0.0
    };

    if adjust_y {
      let c = 0.5 * (view.y.0 + view.y.1);
      view.y = (c - 0.5 * target_y, c + 0.5 * target_y);
    } else {
      let c = 0.5 * (view.x.0 + view.x.1);
      view.x = (c - 0.5 * target_x, c + 0.5 * target_x);
    }
    view
  }
}

/// Explicit drawing context. Draw calls record marks here; nothing touches a
/// surface until the canvas is exported.
#[derive(Debug, Clone)]
pub struct Canvas {
  layers: Vec<Layer>,
  caption: Option<TextMark>,
  xlim: Option<(f64, f64)>,
  ylim: Option<(f64, f64)>,
  pub style: FigureStyle,
}

impl Canvas {
  pub fn new(style: FigureStyle) -> Self {
    Self {
      layers: Vec::new(),
      caption: None,
      xlim: None,
      ylim: None,
      style,
    }
  }

  /// Starts a new group; subsequent marks land in it.
  pub fn begin_layer(&mut self, name: impl Into<String>) {
    self.layers.push(Layer {
      name: name.into(),
      marks: Vec::new(),
    });
  }

  fn push(&mut self, kind: MarkKind, z: i32) {
    if self.layers.is_empty() {
      self.begin_layer("main");
    }
    if let Some(layer) = self.layers.last_mut() {
      layer.marks.push(Mark { kind, z });
    }
  }

  pub fn plot(&mut self, points: Vec<Point2>, color: Rgb, style: LineStyle) {
    let width = self.style.line_width;
    self.plot_with_width(points, color, style, width);
  }

  pub fn plot_with_width(&mut self, points: Vec<Point2>, color: Rgb, style: LineStyle, width: f64) {
    if points.len() < 2 {
      return;
    }
    self.push(
      MarkKind::Polyline {
        points,
        color,
        style,
        width,
      },
      Z_LINE,
    );
  }

  pub fn fill(&mut self, points: Vec<Point2>, color: Rgb, z: i32) {
    if points.len() < 3 {
      return;
    }
    self.push(MarkKind::Fill { points, color }, z);
  }

  pub fn scatter(&mut self, at: Point2, shape: Vec<Point2>, area: f64, color: Rgb, z: i32) {
    self.push(
      MarkKind::Marker {
        at,
        shape,
        area,
        color,
      },
      z,
    );
  }

  pub fn text(&mut self, mark: TextMark) {
    self.push(MarkKind::Text(mark), Z_TEXT);
  }

  pub fn set_caption(&mut self, text: &str) {
    self.caption = Some(
      TextMark::new(text, Anchor::Figure([0.025, 0.05]))
        .halign(HAlign::Left)
        .valign(VAlign::Bottom),
    );
  }

  pub fn caption(&self) -> Option<&TextMark> {
    self.caption.as_ref()
  }

  pub fn set_limits(&mut self, xlim: Option<(f64, f64)>, ylim: Option<(f64, f64)>) {
    self.xlim = xlim;
    self.ylim = ylim;
  }

  pub fn layers(&self) -> &[Layer] {
    &self.layers
  }

  pub fn mark_count(&self) -> usize {
    self.layers.iter().map(|l| l.marks.len()).sum()
  }

  /// All marks in paint order: ascending z, ties in recording order.
  pub fn paint_order(&self) -> Vec<&Mark> {
    let mut marks: Vec<&Mark> = self.layers.iter().flat_map(|l| l.marks.iter()).collect();
    marks.sort_by_key(|m| m.z);
    marks
  }

  /// Extent of the geometry, ignoring text.
  pub fn data_bounds(&self) -> Option<View> {
    let mut min_x = f64::MAX;
    let mut max_x = f64::MIN;
    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;
    let mut any = false;

    let mut take = |p: &Point2| {
      min_x = min_x.min(p[0]);
      max_x = max_x.max(p[0]);
      min_y = min_y.min(p[1]);
      max_y = max_y.max(p[1]);
      any = true;
    };

    for layer in &self.layers {
      for mark in &layer.marks {
        match &mark.kind {
          MarkKind::Polyline { points, .. } | MarkKind::Fill { points, .. } => {
            points.iter().for_each(&mut take)
          }
          MarkKind::Marker { at, .. } => take(at),
          MarkKind::Text(_) => {}
        }
      }
    }

    if any {
      Some(View {
        x: (min_x, max_x),
        y: (min_y, max_y),
      })
    } else {
      None
    }
  }

  /// The window to render: fixed limits where set, otherwise the data extent
  /// padded by 5%, then fitted to the device aspect.
  pub fn view(&self, width: f64, height: f64) -> View {
    let auto = self.data_bounds().unwrap_or(View {
      x: (0.0, 1.0),
      y: (0.0, 1.0),
    });
    let pad = |(lo, hi): (f64, f64)| {
      let m = 0.05 * (hi - lo);
      (lo - m, hi + m)
    };

    let view = View {
      x: self.xlim.unwrap_or_else(|| pad(auto.x)),
      y: self.ylim.unwrap_or_else(|| pad(auto.y)),
    };
    view.fit_equal_aspect(width, height, self.data_bounds())
  }
}
