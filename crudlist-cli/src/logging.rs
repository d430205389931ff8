//! Logger setup

use std::fs;
use std::fs::File;

use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::paths;

/// Logs to `latest.log` in the cache directory, and to stderr when `verbose`.
///
/// The file is skipped when no home directory can be determined.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    paths::rotate_logs();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if let Some(path) = paths::log_file() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(path)?));
    }
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
