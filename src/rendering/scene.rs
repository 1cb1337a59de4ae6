// src/rendering/scene.rs

use super::canvas::Canvas;
use super::export::{self, ExportError};
use crate::config::FigureStyle;
use std::path::{Path, PathBuf};

/// One deferred drawing operation.
pub type DrawStep = Box<dyn Fn(&mut Canvas) + Send + Sync>;

// Steps are only ever appended. Every draw replays all of them, so each image
// holds everything added so far.
pub struct Scene {
  steps: Vec<(String, DrawStep)>,
  xlim: Option<(f64, f64)>,
  ylim: Option<(f64, f64)>,
  style: FigureStyle,
}

impl Scene {
  pub fn new(style: FigureStyle) -> Self {
    Self {
      steps: Vec::new(),
      xlim: None,
      ylim: None,
      style,
    }
  }

  pub fn with_limits(mut self, xlim: Option<(f64, f64)>, ylim: Option<(f64, f64)>) -> Self {
    self.xlim = xlim;
    self.ylim = ylim;
    self
  }

  pub fn addto<F>(&mut self, name: impl Into<String>, step: F)
  where
    F: Fn(&mut Canvas) + Send + Sync + 'static,
  {
    self.steps.push((name.into(), Box::new(step)));
  }

  /// Replays every step onto a fresh canvas, one layer per step, then applies
  /// the caption and limits.
  pub fn compose(&self, description: Option<&str>) -> Canvas {
    let mut canvas = Canvas::new(self.style.clone());

    for (name, step) in &self.steps {
      canvas.begin_layer(name.as_str());
      step(&mut canvas);
    }

    if let Some(text) = description {
      canvas.set_caption(text);
    }
    canvas.set_limits(self.xlim, self.ylim);

    log::debug!(
      "Composed {} layers, {} marks",
      canvas.layers().len(),
      canvas.mark_count()
    );
    canvas
  }

  /// Composes and writes one image. The format follows the file extension;
  /// without one, PNG is written and `.png` appended.
  pub fn draw(&self, description: Option<&str>, path: &Path) -> Result<PathBuf, ExportError> {
    let canvas = self.compose(description);
    let (path, format) = export::resolve_output(path, None);
    export::export(&canvas, &path, format)?;
    Ok(path)
  }
}
