//! earthtilt - renders the axial tilt / latitude / horizon slide sequence.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

pub mod config;
pub mod model;
pub mod rendering;
pub mod storyboard;
pub mod utils;

use config::{Config, ConfigError, ExportFormat};

/// Render educational slides on Earth's axial tilt, latitude and horizon.
#[derive(Parser, Debug)]
#[command(name = "earthtilt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output directory for the frames.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// File name prefix; frames are written as <prefix>_NN.
    #[arg(short, long)]
    prefix: Option<String>,

    /// Image format.
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Observer latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Axial tilt in degrees; negative puts the north pole toward the Sun.
    #[arg(long, allow_hyphen_values = true)]
    tilt: Option<f64>,

    /// Raster resolution (100 for 720p, 150 for 1080p).
    #[arg(long)]
    dpi: Option<f64>,

    /// Worker threads for writing frames.
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Also write the finished diagram, uncaptioned, to this file.
    #[arg(long)]
    overview: Option<PathBuf>,

    /// Settings file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    save_config: bool,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) -> Result<(), ConfigError> {
        if let Some(dir) = &self.out_dir {
            cfg.output.dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            cfg.output.prefix = prefix.clone();
        }
        if let Some(format) = self.format {
            cfg.output.format = format;
        }
        if let Some(latitude) = self.latitude {
            cfg.earth.latitude = latitude;
        }
        if let Some(tilt) = self.tilt {
            cfg.earth.axial_tilt = tilt;
        }
        if let Some(dpi) = self.dpi {
            cfg.style.dpi = dpi;
        }
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("--jobs must be at least 1".into()));
        }
        cfg.validate()
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (mut cfg, msg) = Config::load(cli.config.as_deref());
    match msg {
        Ok(msg) => log::info!("{}", msg),
        Err(msg) => log::warn!("{}", msg),
    }

    cli.apply(&mut cfg)?;

    if cli.save_config {
        let path = cfg.save(cli.config.as_deref())?;
        log::info!("Config saved to {:?}", path);
    }

    log::debug!("{:?}", cfg.earth);

    let started = Instant::now();
    let board = storyboard::compose(cfg.earth, &cfg.style);
    let written = storyboard::render(&board.frames, &cfg.output, cli.jobs)?;

    if let Some(path) = &cli.overview {
        let path = board.scene.draw(None, path)?;
        log::info!("Wrote overview {}", path.display());
    }

    log::info!(
        "{} frames written to {} in {:.2?}",
        written.len(),
        cfg.output.dir.display(),
        started.elapsed()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = utils::logger::init(cli.verbose, cli.quiet) {
        eprintln!("Logger init failed: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
