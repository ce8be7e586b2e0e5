//! Logging and tracing initialization.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Only the first
/// call installs anything; later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (writer, to_file) = log_writer(config.file.as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Append to `file` when it can be opened, stdout otherwise.
/// The flag reports whether the file was used.
fn log_writer(file: Option<&Path>) -> (BoxMakeWriter, bool) {
    let Some(path) = file else {
        return (BoxMakeWriter::new(std::io::stdout), false);
    };
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), true),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            (BoxMakeWriter::new(std::io::stdout), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpacap.log");

        let (_, to_file) = log_writer(Some(&path));

        assert!(to_file);
        assert!(path.is_file());
    }

    #[test]
    fn unopenable_log_file_falls_back_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("gpacap.log");

        let (_, to_file) = log_writer(Some(&path));

        assert!(!to_file);
        assert!(!path.exists());
    }

    #[test]
    fn no_file_means_stdout() {
        assert!(!log_writer(None).1);
    }
}
