// src/storyboard.rs
// The slide sequence: one globe, features added one at a time, a captioned
// frame after each addition.

use crate::config::{ExportFormat, FigureStyle, OutputConfig};
use crate::model::Earth;
use crate::rendering::{export, resolve_output, Canvas, ExportError, Scene};
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Could not start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A composed slide, ready to be written.
pub struct Frame {
    pub number: usize,
    pub caption: String,
    pub canvas: Canvas,
}

/// The finished scene with every feature, and the frames snapped along the way.
pub struct Storyboard {
    pub scene: Scene,
    pub frames: Vec<Frame>,
}

impl Storyboard {
    fn add<F>(&mut self, name: &str, step: F)
    where
        F: Fn(&mut Canvas) + Send + Sync + 'static,
    {
        self.scene.addto(name, step);
    }

    fn snap(&mut self, caption: String) {
        let canvas = self.scene.compose(Some(&caption));
        self.frames.push(Frame {
            number: self.frames.len(),
            caption,
            canvas,
        });
    }
}

/// Builds every frame. Each frame carries all features of the frames before it.
pub fn compose(earth: Earth, style: &FigureStyle) -> Storyboard {
    let r = earth.radius;
    let x0 = earth.center[0];
    let y0 = earth.center[1];
    let scene = Scene::new(style.clone()).with_limits(
        Some((x0 - 2.0 * r, x0 + 5.0 * r)),
        Some((y0 - 2.0 * r, y0 + 2.0 * r)),
    );
    let mut sb = Storyboard {
        scene,
        frames: Vec::new(),
    };
    let alpha = earth.axial_tilt.abs();

    sb.add("earth", move |c| earth.draw_earth(c));
    sb.add("ecliptic", move |c| earth.draw_ecliptic(c));
    sb.add("sun", move |c| earth.draw_sun(c));
    sb.snap(
        "Earth and the ecliptic:\n\
         the ecliptic is the orbital plane, connecting the Earth and the Sun"
            .into(),
    );

    sb.add("day/night", move |c| earth.draw_day_night(c));
    sb.snap(
        "the day/night line:\n\
         night is the hemisphere pointed away from the Sun"
            .into(),
    );

    sb.add("rotation axis", move |c| earth.draw_rot_axis(c));
    sb.snap(format!(
        "Earth's axial tilt:\n\
         Earth's rotation axis is tilted by an angle α = {}° with respect to the ecliptic",
        alpha
    ));

    sb.add("equator", move |c| earth.draw_equator(c));
    sb.snap(
        "Earth's equator:\n\
         the equator is perpendicular to the rotation axis"
            .into(),
    );

    sb.snap(
        "the Sun:\n\
         the Sun is on the ecliptic (not shown to scale)\n\
         here Earth's North Pole is maximally pointed toward the Sun -- this is the day of the summer solstice"
            .into(),
    );

    sb.add("my latitude", move |c| earth.draw_my_latitude(c));
    sb.snap(
        "latitude on Earth:\n\
         latitude is just the angle above or below the equator.  Here is an observer at a latitude l"
            .into(),
    );

    sb.add("zenith", move |c| earth.draw_zenith(c));
    sb.snap(
        "your zenith:\n\
         down is the direction connecting you to the center of the Earth (the direction gravity points)\n\
         up is opposite down -- here the zenith is shown as the point directly above us"
            .into(),
    );

    sb.add("tropics", move |c| earth.draw_tropics(c));
    sb.snap(
        "the tropics:\n\
         the tropic lines are ±α in latitude -- note that the Sun is directly overhead for an observer \
         on the Tropic of Cancer on the summer solstice"
            .into(),
    );

    sb.add("arctic circles", move |c| earth.draw_arctic_circles(c));
    sb.snap(
        "the arctic and antarctic circles:\n\
         on the summer solstice the Sun never sets between the arctic circle and North Pole -- \
         note how everything is in daylight at these high latitudes\n\
         the opposite is true between the antarctic circle and the South Pole -- \
         the Sun is never above the horizon (always night)\n\
         these latitudes are just ±(90° − α)"
            .into(),
    );

    sb.add("horizon", move |c| earth.draw_horizon(c));
    sb.snap(
        "horizon:\n\
         your local horizon is tangent to the surface of the Earth where you are standing"
            .into(),
    );

    sb
}

/// `<dir>/<prefix>_NN.<ext>`
pub fn frame_path(output: &OutputConfig, number: usize) -> (PathBuf, ExportFormat) {
    let stem = output.dir.join(format!("{}_{:02}", output.prefix, number));
    resolve_output(&stem, Some(output.format))
}

/// Writes the frames, on `jobs` worker threads when more than one.
pub fn render(frames: &[Frame], output: &OutputConfig, jobs: usize) -> Result<Vec<PathBuf>, RenderError> {
    let write = |frame: &Frame| -> Result<PathBuf, ExportError> {
        let (path, format) = frame_path(output, frame.number);
        export(&frame.canvas, &path, format)?;
        log::info!("Wrote {} ({})", path.display(), frame.caption.lines().next().unwrap_or(""));
        Ok(path)
    };

    if jobs <= 1 {
        Ok(frames.iter().map(write).collect::<Result<Vec<_>, _>>()?)
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        let paths = pool.install(|| frames.par_iter().map(write).collect::<Result<Vec<_>, _>>())?;
        Ok(paths)
    }
}
