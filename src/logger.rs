use log::{Level, LevelFilter};
use env_logger::Builder;
use std::fmt::Display;
use std::io::Write;
use chrono::Local;

fn render(timestamp: impl Display, level: Level, msg: impl Display) -> String {
    format!("{} [{}] - {}", timestamp, level, msg)
}

/// 0 = errors only, 1 = warnings, 2+ = info.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        _ => LevelFilter::Info,
    }
}

/// Installs the global logger. `RUST_LOG`, when set, overrides `verbosity`.
pub fn init(verbosity: u8) {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf, "{}", render(Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.args()))
        })
        .filter(None, level_for(verbosity))
        .parse_default_env();

    // A second init (e.g. from tests) keeps the first logger.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized.");
    }
}
