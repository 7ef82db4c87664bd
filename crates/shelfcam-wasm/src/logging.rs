//! Browser console backend for the `log` facade.
//!
//! The core crate only emits records through `log`; this module routes them
//! to `console.error` / `warn` / `info` / `log` / `debug` so they show up
//! with the matching severity in devtools.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

/// Level used until JavaScript calls [`set_log_level`].
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record.level(), record.target(), &record.args().to_string()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug => console::log_1(&line),
            Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Calling it again only changes the level.
pub fn init_with_level(level: LevelFilter) {
    // set_logger fails once a logger is installed; the level still applies
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    log::debug!("Logger initialized with level: {}", level);
}

/// Change the console log level.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`
/// (case-insensitive).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    log::set_max_level(filter);
    Ok(())
}

pub(crate) fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level: {}", level))
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    let target = target.strip_prefix("shelfcam_core::").unwrap_or(target);
    format!("[shelfcam {:<5} {}] {}", level, target, message)
}
