// Formatting helpers and the browser console logger.
use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

pub fn format_time(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{:01}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{:02}:{:02}", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Countdown text; partial seconds round up so "0s" only shows at the end.
pub fn format_countdown(remaining_secs: f64) -> String {
    format_time(remaining_secs.max(0.0).ceil() as u64)
}

pub fn format_balance(amount: f64) -> String {
    format!("{:.8}", amount)
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(10_800), "3:00:00");
        assert_eq!(format_time(3_725), "1:02:05");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(9), "9s");
    }

    #[test]
    fn test_format_countdown_rounds_up() {
        assert_eq!(format_countdown(59.2), "01:00");
        assert_eq!(format_countdown(0.0), "0s");
        assert_eq!(format_countdown(-3.0), "0s");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(0.03), "0.03000000");
        assert_eq!(format_balance(0.0), "0.00000000");
    }
}
