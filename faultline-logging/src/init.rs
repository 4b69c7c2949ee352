use anyhow::{Context, Result};
use faultline_config::{LogFormat, LogTarget, LoggingConfig};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize logging from configuration
///
/// `override_level` (typically from the command line) wins over the
/// configured level. The returned guard must be held for the life of the
/// process when logging to a file, otherwise buffered lines are lost.
pub fn init_logging_from_config(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<Option<WorkerGuard>> {
    let level = override_level.unwrap_or(config.level.as_str());
    let env_filter = build_env_filter(level);

    let (writer, ansi, guard) = match &config.target {
        LogTarget::Console => (BoxMakeWriter::new(std::io::stderr), true, None),
        LogTarget::File { path } => {
            let (non_blocking, guard) = file_writer(Path::new(path))?;
            (BoxMakeWriter::new(non_blocking), false, Some(guard))
        }
    };

    let layer = fmt_layer(config.format, writer, ansi, config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(guard)
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = build_env_filter(log_level);

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Filter for `level`, falling back to `RUST_LOG` and then to `info`
pub fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fmt_layer<S>(
    format: LogFormat,
    writer: BoxMakeWriter,
    ansi: bool,
    include_location: bool,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(include_location)
        .with_line_number(include_location);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;

    std::fs::create_dir_all(directory).with_context(|| {
        format!("Failed to create log directory: {}", directory.display())
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_env_filter() {
        assert_eq!(build_env_filter("debug").to_string(), "debug");
        assert_eq!(
            build_env_filter("faultline_engine=trace,warn").to_string(),
            "faultline_engine=trace,warn"
        );
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("faultline.log");

        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(temp_dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_writer_rejects_directory_path() {
        assert!(file_writer(Path::new("/")).is_err());
    }

    #[test]
    fn test_init_from_config_returns_guard_for_file_target() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            format: LogFormat::Json,
            target: LogTarget::File {
                path: temp_dir
                    .path()
                    .join("run.log")
                    .to_string_lossy()
                    .into_owned(),
            },
            ..Default::default()
        };

        let guard = init_logging_from_config(&config, Some("debug")).unwrap();
        assert!(guard.is_some());

        // A second initialization is tolerated
        assert!(init_simple_tracing("info").is_ok());
    }
}
