//! Optional structured logging setup.
//!
//! A library should never install a global subscriber behind its embedder's
//! back, so nothing here runs automatically. Call [`init`] (typically once,
//! from an application's `main`) to get human-readable worker diagnostics.
//! Trimmed to the one concern this crate needs: coloring a log line by
//! severity with no timestamp/target clutter, since the worker loops already
//! name themselves (`mq-pusher-<name>`, `mq-puller-<name>`) via their thread
//! name.

use std::fmt;

use colored::Colorize;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Install a `tracing_subscriber` global subscriber with the colorized
/// formatter, honoring `RUST_LOG` (defaulting to `info`) for filtering.
///
/// `tracing` only allows one global default subscriber per process, so a
/// second call (e.g. from a test harness running many cases) fails silently
/// rather than panicking.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .event_format(ColorizedFormatter)
        .with_env_filter(filter)
        .try_init();
}

/// A `tracing` event formatter that colors the whole line by severity and
/// otherwise prints only the formatted fields, with no timestamp or target.
pub struct ColorizedFormatter;

impl<S, N> FormatEvent<S, N> for ColorizedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut buffer = String::new();
        let mut buf_writer = Writer::new(&mut buffer);
        ctx.format_fields(buf_writer.by_ref(), event)?;

        let colored_output = match *event.metadata().level() {
            Level::ERROR => buffer.red(),
            Level::WARN => buffer.yellow(),
            Level::INFO => buffer.white(),
            Level::DEBUG => buffer.blue(),
            Level::TRACE => buffer.purple(),
        };

        writeln!(writer, "{colored_output}")
    }
}
