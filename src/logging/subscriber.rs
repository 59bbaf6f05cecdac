//! Tracing subscriber setup: console formatter and initialisation.
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Target of stage headers.
pub(super) const STAGE_TARGET: &str = "node_tools::stage";
/// Target of dry-run action lines.
pub(super) const DRY_RUN_TARGET: &str = "node_tools::dry_run";

/// The `message` field of an event; other fields are ignored.
#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Console line style.
///
/// ```text
/// ==> Loading configuration
///     prefix: /usr/local
///     [dry run] would install /usr/local/bin/node
/// warning: ...
/// error: install npm: failed to walk deps/npm: ...
/// ```
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = Message::default();
        event.record(&mut message);
        let text = message.0;
        let meta = event.metadata();

        match (*meta.level(), meta.target()) {
            (Level::ERROR, _) => writeln!(writer, "\x1b[1;31merror\x1b[0m: {text}"),
            (Level::WARN, _) => writeln!(writer, "\x1b[1;33mwarning\x1b[0m: {text}"),
            (Level::INFO, STAGE_TARGET) => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{text}\x1b[0m"),
            (Level::INFO, DRY_RUN_TARGET) => writeln!(writer, "    \x1b[33m[dry run]\x1b[0m {text}"),
            (Level::INFO, _) => writeln!(writer, "    {text}"),
            _ => writeln!(writer, "    \x1b[2m{text}\x1b[0m"),
        }
    }
}

/// Where console output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    /// Warnings and errors to stderr, everything else to stdout.
    Split,
    /// Everything to stderr, keeping stdout free for program output.
    Stderr,
}

/// Initialise the global [`tracing`] subscriber.
///
/// Call once at program startup. `verbose` lowers the console threshold from
/// `INFO` to `DEBUG`.
pub fn init_subscriber(verbose: bool, console: Console) {
    use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt as _};
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let threshold = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let writer = match console {
        Console::Split => BoxMakeWriter::new(
            std::io::stderr
                .with_max_level(Level::WARN)
                .and(std::io::stdout.with_min_level(Level::INFO)),
        ),
        Console::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(threshold);

    tracing_subscriber::registry().with(layer).init();
}
