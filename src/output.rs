//! Finished documents and what happens to them.
//!
//! A [`LabelDocument`] is either saved under the download filename or handed
//! to the system viewer for printing through a short-lived temporary file.

use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::compose::LabelPlan;
use crate::error::LabelError;

/// An item that was drawn with a placeholder instead of its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item_id: String,
    pub message: String,
}

/// A composed PDF plus what went into it.
#[derive(Debug, Clone)]
pub struct LabelDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Page layouts, in page order.
    pub plans: Vec<LabelPlan>,
    pub failures: Vec<ItemFailure>,
    /// Summary for the user, when the export produces one.
    pub message: Option<String>,
}

impl LabelDocument {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write the document into `dir` under the download filename for `date`.
    pub fn save(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, LabelError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(default_filename(date));
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), pages = self.page_count, "saved label document");
        Ok(path)
    }

    /// Open the document with the system viewer for printing. The temporary
    /// file is removed after `cleanup_delay`, on the current Tokio runtime;
    /// calling this outside one is a [`LabelError::Document`].
    pub fn print(&self, cleanup_delay: Duration) -> Result<PrintHandoff, LabelError> {
        self.print_with(cleanup_delay, open_with_system_viewer)
    }

    /// Like [`print`](Self::print), with a custom opener.
    pub fn print_with<F>(&self, cleanup_delay: Duration, opener: F) -> Result<PrintHandoff, LabelError>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LabelError::Document(format!("Print cleanup needs a Tokio runtime: {}", e)))?;

        let path = std::env::temp_dir().join(format!("estock-labels-{}.pdf", uuid::Uuid::new_v4()));
        std::fs::write(&path, &self.bytes)?;

        if let Err(e) = opener(&path) {
            let _ = std::fs::remove_file(&path);
            return Err(LabelError::Document(format!("Failed to open print view: {}", e)));
        }
        tracing::debug!(path = %path.display(), "print view opened");

        let cleanup_path = path.clone();
        let cleanup = runtime.spawn(async move {
            tokio::time::sleep(cleanup_delay).await;
            if let Err(e) = tokio::fs::remove_file(&cleanup_path).await {
                tracing::warn!(path = %cleanup_path.display(), error = %e, "failed to remove print file");
            }
        });

        Ok(PrintHandoff { path, cleanup })
    }
}

/// A document handed to the viewer, with its pending cleanup.
#[derive(Debug)]
pub struct PrintHandoff {
    pub path: PathBuf,
    cleanup: JoinHandle<()>,
}

impl PrintHandoff {
    /// Wait for the temporary file to be removed.
    pub async fn finish(self) {
        let _ = self.cleanup.await;
    }
}

/// `estock-labels-<YYYY-MM-DD>.pdf`
pub fn default_filename(date: NaiveDate) -> String {
    format!("estock-labels-{}.pdf", date.format("%Y-%m-%d"))
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn open_with_system_viewer(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(path).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> LabelDocument {
        LabelDocument {
            bytes: b"%PDF-1.3 test".to_vec(),
            page_count: 1,
            plans: Vec::new(),
            failures: Vec::new(),
            message: None,
        }
    }

    #[test]
    fn test_default_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(default_filename(date), "estock-labels-2026-01-05.pdf");
    }

    #[test]
    fn test_save_writes_bytes() {
        let dir = std::env::temp_dir().join(format!("estock-save-{}", uuid::Uuid::new_v4()));
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let path = document().save(&dir, date).unwrap();
        assert_eq!(path.file_name().unwrap(), "estock-labels-2026-10-19.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3 test");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_print_handoff_cleans_up() {
        let handoff = document()
            .print_with(Duration::from_millis(10), |p| {
                assert!(p.exists());
                Ok(())
            })
            .unwrap();
        let path = handoff.path.clone();
        assert!(path.exists());
        handoff.finish().await;
        assert!(!path.exists());
    }

    #[test]
    fn test_print_outside_runtime_is_an_error() {
        let mut opened = false;
        let err = document()
            .print_with(Duration::from_millis(1), |_| {
                opened = true;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, LabelError::Document(_)));
        assert!(!opened);
    }

    #[tokio::test]
    async fn test_print_opener_failure_removes_file() {
        let mut seen = None;
        let err = document()
            .print_with(Duration::from_millis(10), |p| {
                seen = Some(p.to_path_buf());
                Err(io::Error::new(io::ErrorKind::NotFound, "no viewer"))
            })
            .unwrap_err();
        assert!(matches!(err, LabelError::Document(_)));
        assert!(!seen.unwrap().exists());
    }
}
