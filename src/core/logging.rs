//! File-based logging setup.
//!
//! Everything goes to a daily-rolling JSON appender under the app data
//! directory; a stdout layer would corrupt the terminal while ratatui
//! holds it in raw/alternate-screen mode. Events emitted through the
//! `log` facade are bridged into `tracing`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "askdoc.log";

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("askdoc").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the tracing subscriber and the `log` bridge.
///
/// The returned `WorkerGuard` must live for the duration of the process so
/// buffered records get flushed on shutdown.
pub fn init() -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create logs directory: {e}");
    }

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {e}");
    }

    // Gzip yesterday's rolled-over files off the hot path
    let compress_dir = dir.clone();
    std::thread::spawn(move || compress_old_logs(compress_dir));

    log::info!("Logging to {:?} (daily rolling)", dir.join(LOG_FILE_PREFIX));

    guard
}

/// Compress rolled-over log files from previous days.
fn compress_old_logs(dir: PathBuf) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let rolled_prefix = format!("{LOG_FILE_PREFIX}.");

    let Ok(entries) = fs::read_dir(&dir) else {
        return;
    };

    for path in entries.flatten().map(|e| e.path()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(&rolled_prefix) || name.ends_with(&today) || name.ends_with(".gz") {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {path:?}"),
            Err(e) => log::warn!("Failed to compress old log {path:?}: {e}"),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_file_creates_gz_and_removes_original() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("askdoc.log.2024-01-01");
        fs::write(&log_path, "old log line\n").unwrap();

        compress_file(&log_path).unwrap();

        assert!(!log_path.exists());
        assert!(dir.path().join("askdoc.log.2024-01-01.gz").exists());
    }

    #[test]
    fn test_compress_file_skips_when_gz_exists() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("askdoc.log.2024-01-02");
        fs::write(&log_path, "line").unwrap();
        fs::write(dir.path().join("askdoc.log.2024-01-02.gz"), "done").unwrap();

        compress_file(&log_path).unwrap();

        // Original is left in place when a compressed copy already exists
        assert!(log_path.exists());
    }

    #[test]
    fn test_compress_old_logs_leaves_todays_log() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let todays_log = dir.path().join(format!("askdoc.log.{today}"));
        fs::write(&todays_log, "current").unwrap();

        compress_old_logs(dir.path().to_path_buf());

        assert!(todays_log.exists());
    }
}
