//! Logging setup: console layer on stderr plus the append-only record file.
//!
//! Record lines look like `2026-10-19 14:03:11,207 - INFO - Created student with ID 1`.

use std::fmt;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::{self, FmtSpan, FormatEvent, FormatFields};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

const NOISY_MODULES: [&str; 1] = ["config"];

/// `<timestamp> - <LEVEL> - <message>` event format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormat;

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(
            writer,
            "{} - {} - ",
            now,
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Shared by both sinks: drop events from dependency modules that flood the output.
fn is_quiet_module(metadata: &Metadata<'_>) -> bool {
    !NOISY_MODULES
        .iter()
        .any(|name| metadata.target().starts_with(name))
}

/// Layer writing [`RecordFormat`] lines at DEBUG and above to `writer`.
pub fn record_layer<S, W>(writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(RecordFormat)
        .with_writer(writer)
        .with_filter(LevelFilter::DEBUG)
        .with_filter(filter_fn(is_quiet_module))
        .boxed()
}

/// Appender for the record file: never rotated, opened in append mode.
///
/// Missing parent directories are created first.
pub fn record_appender(fs: &dyn FileSystem, path: &Path) -> InfraResult<RollingFileAppender> {
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
    let file_name = path.file_name().ok_or_else(|| InfraError::Logging {
        message: format!("record file {} has no file name", path.display()),
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)
        .map_err(|e| InfraError::Logging {
            message: format!("open record file {}: {}", path.display(), e),
        })
}

/// Map `-d` repetitions to a console level.
pub fn console_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// Record lines are written by a background worker. Keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_logging(
    verbosity: u8,
    record_file: Option<&Path>,
    fs: &dyn FileSystem,
) -> InfraResult<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(console_level(verbosity))
        .with_filter(filter_fn(is_quiet_module));

    let (file_layer, guard) = match record_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(record_appender(fs, path)?);
            (Some(record_layer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| InfraError::Logging {
            message: e.to_string(),
        })?;

    match console_level(verbosity) {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
    Ok(guard)
}
