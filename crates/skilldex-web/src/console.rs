use skilldex_core::logging::LogSink;
use tracing::Level;
use wasm_bindgen::JsValue;

/// Writes log lines to the browser developer console at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BrowserConsoleSink;

impl LogSink for BrowserConsoleSink {
    fn write_line(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
        }
    }
}
