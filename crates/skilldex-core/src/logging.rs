#![forbid(unsafe_code)]

//! Tracing layer that formats events as single lines for a [`LogSink`].
//!
//! The browser host routes lines to the developer console; tests capture them
//! with [`CaptureSink`]. Nothing here writes to stdout or stderr directly.
//!
//! # Quick Start
//!
//! ```
//! use skilldex_core::logging::{CaptureSink, ConsoleLayer};
//! use tracing_subscriber::prelude::*;
//!
//! let sink = CaptureSink::new();
//! let layer = ConsoleLayer::new(sink.clone()).show_time(false);
//! let dispatch = tracing::Dispatch::new(tracing_subscriber::registry().with(layer));
//!
//! tracing::dispatcher::with_default(&dispatch, || tracing::info!(count = 3, "loaded"));
//! assert!(sink.contains("loaded count=3"));
//! ```

use std::fmt::{self, Write as FmtWrite};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

// ============================================================================
// Sinks
// ============================================================================

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, level: Level, line: &str);
}

/// Keeps every line in memory.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut lines) => lines.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for CaptureSink {
    fn write_line(&self, _level: Level, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(l) => l,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_owned());
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Which parts of an event end up in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFormat {
    /// `HH:MM:SS` prefix. Default: true.
    pub show_time: bool,
    /// Default: true.
    pub show_level: bool,
    /// Module path of the event. Default: true.
    pub show_target: bool,
    /// Structured fields beyond `message`. Default: true.
    pub show_fields: bool,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            show_time: true,
            show_level: true,
            show_target: true,
            show_fields: true,
        }
    }
}

/// Fixed-width level name.
fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

// ============================================================================
// Event Visitor
// ============================================================================

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        self.push(field, strip_debug_quotes(&rendered));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

fn strip_debug_quotes(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_owned()
    } else {
        s.to_owned()
    }
}

/// UTC `HH:MM:SS`; `web_time` keeps this working on wasm32.
fn timestamp_now() -> String {
    let since_epoch = web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = since_epoch.as_secs();
    let h = (secs / 3600) % 24;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

// ============================================================================
// ConsoleLayer
// ============================================================================

/// A `tracing_subscriber::Layer` writing one line per event to a [`LogSink`].
pub struct ConsoleLayer {
    sink: Box<dyn LogSink>,
    format: LogFormat,
}

impl ConsoleLayer {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self::with_format(sink, LogFormat::default())
    }

    pub fn with_format(sink: impl LogSink + 'static, format: LogFormat) -> Self {
        Self {
            sink: Box::new(sink),
            format,
        }
    }

    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.format.show_time = show;
        self
    }

    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.format.show_target = show;
        self
    }

    #[must_use]
    pub fn show_fields(mut self, show: bool) -> Self {
        self.format.show_fields = show;
        self
    }

    fn format_event(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.format.show_time {
            line.push_str(&timestamp_now());
            line.push(' ');
        }
        if self.format.show_level {
            line.push_str(level_str(*metadata.level()));
            line.push(' ');
        }
        if self.format.show_target {
            line.push_str(metadata.target());
            line.push_str(": ");
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        if self.format.show_fields {
            for (k, v) in &visitor.fields {
                let _ = write!(line, " {k}={v}");
            }
        }
        line
    }
}

impl fmt::Debug for ConsoleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLayer")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let line = self.format_event(event);
        self.sink.write_line(*event.metadata().level(), &line);
    }
}

/// Install a global subscriber writing to `sink` at `level` and above.
///
/// Returns `false` if a global subscriber was already set; the earlier one
/// stays in place.
pub fn init_logging(sink: impl LogSink + 'static, level: Level) -> bool {
    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::new(sink))
        .with(LevelFilter::from_level(level));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn capture(format: LogFormat, filter: LevelFilter, f: impl FnOnce()) -> Vec<String> {
        let sink = CaptureSink::new();
        let subscriber = tracing_subscriber::registry()
            .with(ConsoleLayer::with_format(sink.clone(), format))
            .with(filter);
        let dispatch = tracing::Dispatch::new(subscriber);
        tracing::dispatcher::with_default(&dispatch, f);
        sink.lines()
    }

    fn untimed() -> LogFormat {
        LogFormat {
            show_time: false,
            ..LogFormat::default()
        }
    }

    #[test]
    fn formats_level_target_message_and_fields() {
        let lines = capture(untimed(), LevelFilter::TRACE, || {
            tracing::warn!(key = "value", count = 3, ok = true, "cache miss");
        });
        assert_eq!(
            lines,
            vec!["WARN  skilldex_core::logging::tests: cache miss key=value count=3 ok=true".to_string()]
        );
    }

    #[test]
    fn display_fields_are_unquoted() {
        let err = "boom";
        let lines = capture(untimed(), LevelFilter::TRACE, || {
            tracing::error!(error = %err, path = ?"skills.json", "failed");
        });
        assert!(lines[0].ends_with("failed error=boom path=skills.json"), "{lines:?}");
    }

    #[test]
    fn respects_level_filter() {
        let lines = capture(untimed(), LevelFilter::INFO, || {
            tracing::debug!("debug drop");
            tracing::info!("info keep");
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("info keep"));
    }

    #[test]
    fn minimal_format_is_message_only() {
        let format = LogFormat {
            show_time: false,
            show_level: false,
            show_target: false,
            show_fields: false,
        };
        let lines = capture(format, LevelFilter::TRACE, || {
            tracing::info!(count = 1, "just this");
        });
        assert_eq!(lines, vec!["just this".to_string()]);
    }

    #[test]
    fn timestamp_prefix_is_hh_mm_ss() {
        let lines = capture(LogFormat::default(), LevelFilter::TRACE, || {
            tracing::info!("timed");
        });
        let ts = &lines[0][..8];
        assert_eq!(ts.len(), 8);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[5..6], ":");
        assert!(ts.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn strip_debug_quotes_basic() {
        assert_eq!(strip_debug_quotes("\"hello\""), "hello");
        assert_eq!(strip_debug_quotes("42"), "42");
        assert_eq!(strip_debug_quotes("\""), "\"");
    }

    #[test]
    fn capture_sink_clear() {
        let sink = CaptureSink::new();
        sink.write_line(Level::INFO, "one");
        assert!(sink.contains("one"));
        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn layer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleLayer>();
    }
}
