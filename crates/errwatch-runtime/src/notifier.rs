//! Notification delivery.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use errwatch_core::error::{Result, WatchError};
use errwatch_core::formatting::escape_html;

// ── NotificationSink ──────────────────────────────────────────────────────────

/// Destination for a rendered subject and HTML body.
pub trait NotificationSink {
    fn send(&mut self, subject: &str, body: &str) -> Result<()>;
}

impl<N: NotificationSink + ?Sized> NotificationSink for &mut N {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        (**self).send(subject, body)
    }
}

impl<N: NotificationSink + ?Sized> NotificationSink for Box<N> {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        (**self).send(subject, body)
    }
}

// ── WriterSink ────────────────────────────────────────────────────────────────

/// Writes `Subject: ...`, a blank line and the body to any writer.
pub struct WriterSink<W> {
    writer: W,
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> NotificationSink for WriterSink<W> {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        write!(self.writer, "Subject: {}\n\n{}\n", subject, body)
            .and_then(|()| self.writer.flush())
            .map_err(|e| WatchError::Notification(format!("failed to write notification: {e}")))
    }
}

// ── FileSink ──────────────────────────────────────────────────────────────────

/// Writes each notification as a standalone HTML document at `path`,
/// replacing the previous one.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("html.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl NotificationSink for FileSink {
    fn send(&mut self, subject: &str, body: &str) -> Result<()> {
        let document = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(subject),
            body
        );

        self.write_atomic(&document).map_err(|e| {
            WatchError::Notification(format!("failed to write {}: {e}", self.path.display()))
        })?;

        tracing::info!(path = %self.path.display(), subject = %subject, "notification written");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
