use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to write the output page: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Something that can hold rich HTML with a plain-text alternative.
pub trait Clipboard {
    fn copy_html(&mut self, html: &str, alt_text: &str) -> Result<(), PublishError>;
}

/// The operating system clipboard.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy_html(&mut self, html: &str, alt_text: &str) -> Result<(), PublishError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_html(html, Some(alt_text))?;
        Ok(())
    }
}

/// What happened to the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// On the clipboard. The file, if it could be written, stays around for reference.
    Copied(Option<PathBuf>),
    /// Only written to disk; open it and copy by hand.
    Manual(PathBuf),
    /// Neither the file nor the clipboard worked.
    Failed,
}

/// The HTML page the document is written to.
///
/// The file is created up front but deleted again on drop unless the document
/// is written to it, so failed runs leave nothing behind.
#[derive(Debug)]
pub struct Page {
    file: Option<NamedTempFile>,
}

impl Page {
    /// Create a `pr-list-*.html` file in the temp directory.
    /// A failure is logged and leaves a page that can only reach the clipboard.
    pub async fn open() -> Page {
        let created = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new()
                .prefix("pr-list-")
                .suffix(".html")
                .tempfile()
        })
        .await;

        let file = match created {
            Ok(Ok(file)) => {
                debug!(path = %file.path().display(), "created output page");
                Some(file)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "could not create output page");
                None
            }
            Err(e) => {
                warn!(error = %e, "output page task failed");
                None
            }
        };
        Page { file }
    }

    /// Write `html` to the page and copy it to `clipboard`.
    /// Failures are logged and downgrade the outcome; nothing here is fatal.
    pub fn publish(self, html: &str, alt_text: &str, clipboard: &mut dyn Clipboard) -> PublishOutcome {
        let written = self.write_logged(html);
        match clipboard.copy_html(html, alt_text) {
            Ok(()) => {
                info!("copied pull requests to clipboard");
                PublishOutcome::Copied(written)
            }
            Err(e) => {
                warn!(error = %e, "could not copy to clipboard");
                match written {
                    Some(path) => PublishOutcome::Manual(path),
                    None => PublishOutcome::Failed,
                }
            }
        }
    }

    /// Write `html` to the page without touching the clipboard.
    pub fn write_only(self, html: &str) -> PublishOutcome {
        match self.write_logged(html) {
            Some(path) => PublishOutcome::Manual(path),
            None => PublishOutcome::Failed,
        }
    }

    fn write_logged(self, html: &str) -> Option<PathBuf> {
        match self.write(html) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "could not write output page");
                None
            }
        }
    }

    /// Write the document and keep the file past the end of the process.
    fn write(self, html: &str) -> Result<PathBuf, PublishError> {
        let mut file = self.file.ok_or_else(|| {
            PublishError::Io(io::Error::new(io::ErrorKind::NotFound, "no output page was created"))
        })?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        debug!(path = %path.display(), "kept output page");
        Ok(path)
    }
}
