//! Tracing subscriber setup.
//!
//! One-shot commands log to stderr. The chat loop owns the terminal in raw
//! mode and redraws its own prompt, so chat sessions log to
//! `<data_dir>/logs/chat.log` instead.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const CHAT_LOG_FILE: &str = "chat.log";

/// Default directive for a verbosity level. `RUST_LOG` wins when set.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,forkful=debug",
        _ => "trace",
    }
}

pub fn chat_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("logs").join(CHAT_LOG_FILE)
}

fn open_chat_log(data_dir: &Path) -> io::Result<File> {
    let path = chat_log_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Where log lines go. Never stderr while chatting; if the log file cannot
/// be opened, chat logs are discarded.
pub fn log_writer(chat: bool, data_dir: &Path) -> BoxMakeWriter {
    if !chat {
        return BoxMakeWriter::new(io::stderr);
    }
    match open_chat_log(data_dir) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(io::sink),
    }
}

/// Install the global subscriber.
pub fn init(verbose: u8, quiet: bool, chat: bool, data_dir: &Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(!chat)
        .with_writer(log_writer(chat, data_dir))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_directives() {
        assert_eq!(default_directive(0, true), "error");
        assert_eq!(default_directive(0, false), "warn");
        assert_eq!(default_directive(1, false), "info,forkful=debug");
        assert_eq!(default_directive(3, true), "trace");
    }

    #[test]
    fn chat_warnings_land_in_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(log_writer(true, dir.path()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(error = "backend request timed out", "Chat send failed");
        });

        let log = std::fs::read_to_string(chat_log_path(dir.path())).unwrap();
        assert!(log.contains("WARN"));
        assert!(log.contains("Chat send failed"));
    }

    #[test]
    fn chat_log_appends_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        for line in ["first session", "second session"] {
            let subscriber = tracing_subscriber::fmt()
                .with_ansi(false)
                .with_writer(log_writer(true, dir.path()))
                .finish();
            tracing::subscriber::with_default(subscriber, || tracing::warn!("{line}"));
        }

        let log = std::fs::read_to_string(chat_log_path(dir.path())).unwrap();
        assert!(log.contains("first session"));
        assert!(log.contains("second session"));
    }

    #[test]
    fn unwritable_data_dir_discards_chat_logs() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the logs directory should be.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(log_writer(true, &blocked))
            .finish();
        tracing::subscriber::with_default(subscriber, || tracing::warn!("dropped"));
        assert!(!chat_log_path(&blocked).exists());
    }
}
