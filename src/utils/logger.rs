// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: TermLogger = TermLogger;

struct TermLogger;

/// Installs the terminal logger. `verbose` and `quiet` come straight from the
/// command line counters.
pub fn init(verbose: u8, quiet: bool) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level_for(verbose, quiet)))
}

pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
  if quiet {
    return LevelFilter::Error;
  }
  match verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

fn tag(level: Level) -> (&'static str, &'static str) {
  // ANSI colour, label
  match level {
    Level::Error => ("\x1b[1;31m", "error"),
    Level::Warn => ("\x1b[33m", "warn"),
    Level::Info => ("\x1b[34m", "info"),
    Level::Debug => ("\x1b[90m", "debug"),
    Level::Trace => ("\x1b[90m", "trace"),
  }
}

impl log::Log for TermLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let (color, label) = tag(record.level());

      // Format: "[info ] wrote earth_00.png"
      let msg = format!("{}[{:<5}]\x1b[0m {}\n", color, label, record.args());

      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      let _ = handle.write_all(msg.as_bytes());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
