// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop hosts for builds without a user agent.
//
// `DirectoryDownloads` saves triggered downloads into a directory and
// `SpoolPrintHost` spools print documents as HTML files for a system viewer
// or print queue to pick up.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::types::PrintDocument;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::traits::*;

/// Reject anything that is not a bare file name so a download can never
/// escape its directory.
fn plain_file_name(name: &str) -> Result<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| *n == name)
        .ok_or_else(|| ReportwerkError::Download(format!("not a plain file name: {name:?}")))
}

// -- Downloads ----------------------------------------------------------------

/// Writes downloads into a fixed directory.
///
/// Object URLs are `blob:<uuid>` handles whose bytes stay in memory until
/// revoked.
pub struct DirectoryDownloads {
    dir: PathBuf,
    blobs: Mutex<HashMap<String, Blob>>,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of object URLs not yet revoked.
    pub fn live_urls(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }
}

impl DownloadHost for DirectoryDownloads {
    fn create_object_url(&self, blob: Blob) -> Result<String> {
        let url = format!("blob:{}", Uuid::new_v4());
        self.blobs
            .lock()
            .map_err(|_| ReportwerkError::Download("blob registry poisoned".into()))?
            .insert(url.clone(), blob);
        Ok(url)
    }

    fn trigger_download(&self, url: &str, filename: &str) -> Result<()> {
        let name = plain_file_name(filename)?;
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| ReportwerkError::Download("blob registry poisoned".into()))?;
        let blob = blobs
            .get(url)
            .ok_or_else(|| ReportwerkError::Download(format!("unknown object URL {url}")))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, &blob.bytes)?;
        info!(
            path = %path.display(),
            mime = blob.mime_type,
            bytes = blob.bytes.len(),
            "download saved"
        );
        Ok(())
    }

    fn revoke_object_url(&self, url: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.remove(url);
        }
    }
}

// -- Print spooling -----------------------------------------------------------

/// Opens print contexts that spool their document into a directory.
///
/// A missing spool directory is treated like a blocked popup: the host
/// declines to open a context.
pub struct SpoolPrintHost {
    spool_dir: PathBuf,
}

impl SpoolPrintHost {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
        }
    }
}

impl PrintHost for SpoolPrintHost {
    type Context = SpoolContext;

    fn open_secondary(&self) -> Result<Option<SpoolContext>> {
        if !self.spool_dir.is_dir() {
            warn!(dir = %self.spool_dir.display(), "spool directory missing, refusing print context");
            return Ok(None);
        }
        debug!(dir = %self.spool_dir.display(), "print context opened");
        Ok(Some(SpoolContext {
            spool_dir: self.spool_dir.clone(),
            document: None,
            spooled: None,
            closed: false,
        }))
    }
}

/// A print context backed by a spool directory.
pub struct SpoolContext {
    spool_dir: PathBuf,
    document: Option<PrintDocument>,
    spooled: Option<PathBuf>,
    closed: bool,
}

impl SpoolContext {
    /// Path of the spooled document, once printed.
    pub fn spooled_path(&self) -> Option<&Path> {
        self.spooled.as_deref()
    }

    fn settle_source(&self, source: &str) -> ImageSettle {
        if source.starts_with("data:")
            || source.starts_with("http://")
            || source.starts_with("https://")
        {
            // Inline or remote: resolved by whatever opens the spooled file.
            return ImageSettle::Loaded;
        }
        let local = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(local);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.spool_dir.join(path)
        };
        if path.exists() {
            ImageSettle::Loaded
        } else {
            ImageSettle::Failed
        }
    }
}

impl SecondaryContext for SpoolContext {
    fn write_document(&mut self, document: &PrintDocument) -> Result<()> {
        if self.closed {
            return Err(ReportwerkError::Print("print context already closed".into()));
        }
        self.document = Some(document.clone());
        Ok(())
    }

    fn image_loads(&mut self) -> Vec<ImageLoad> {
        let Some(document) = &self.document else {
            return Vec::new();
        };
        document
            .image_sources
            .iter()
            .map(|src| {
                let settle = self.settle_source(src);
                Box::pin(std::future::ready(settle)) as ImageLoad
            })
            .collect()
    }

    fn print(&mut self) -> Result<()> {
        if self.closed {
            return Err(ReportwerkError::Print("print context already closed".into()));
        }
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| ReportwerkError::Print("nothing written to print context".into()))?;

        let stem = plain_file_name(&document.title)
            .map_err(|_| ReportwerkError::Print(format!("unusable title {:?}", document.title)))?;
        let path = self.spool_dir.join(format!("{stem}.html"));
        std::fs::write(&path, &document.html)?;
        info!(path = %path.display(), "print document spooled");
        self.spooled = Some(path);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.document = None;
            debug!("print context closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::deliver;

    fn document(title: &str, images: &[&str]) -> PrintDocument {
        PrintDocument {
            title: title.into(),
            html: "<html><body>report</body></html>".into(),
            image_sources: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn download_lands_in_directory_and_url_is_released() {
        let dir = tempfile::tempdir().expect("tempdir");
        let downloads = DirectoryDownloads::new(dir.path());

        deliver(&downloads, b"%PDF-1.7".to_vec(), "application/pdf", "report.pdf")
            .expect("deliver");

        let saved = std::fs::read(dir.path().join("report.pdf")).expect("read back");
        assert_eq!(saved, b"%PDF-1.7");
        assert_eq!(downloads.live_urls(), 0);
    }

    #[test]
    fn download_rejects_path_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let downloads = DirectoryDownloads::new(dir.path());
        let result = deliver(&downloads, vec![0], "image/png", "../escape.png");
        assert!(matches!(result, Err(ReportwerkError::Download(_))));
        assert_eq!(downloads.live_urls(), 0);
    }

    #[test]
    fn missing_spool_dir_blocks_the_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = SpoolPrintHost::new(dir.path().join("absent"));
        assert!(host.open_secondary().expect("open").is_none());
    }

    #[tokio::test]
    async fn images_settle_by_existence() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("logo.png"), b"png").expect("write");

        let host = SpoolPrintHost::new(dir.path());
        let mut ctx = host.open_secondary().expect("open").expect("context");
        ctx.write_document(&document("r", &["logo.png", "missing.png", "data:image/png;base64,AA"]))
            .expect("write");

        let mut settled = Vec::new();
        for load in ctx.image_loads() {
            settled.push(load.await);
        }
        assert_eq!(
            settled,
            vec![ImageSettle::Loaded, ImageSettle::Failed, ImageSettle::Loaded]
        );
    }

    #[test]
    fn print_spools_html_named_after_title() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = SpoolPrintHost::new(dir.path());
        let mut ctx = host.open_secondary().expect("open").expect("context");

        ctx.write_document(&document("Work_Order_WO1", &[])).expect("write");
        ctx.print().expect("print");
        ctx.close();
        ctx.close();

        assert!(ctx.is_closed());
        let spooled = dir.path().join("Work_Order_WO1.html");
        assert_eq!(ctx.spooled_path(), Some(spooled.as_path()));
        assert!(spooled.exists());
        assert!(ctx.print().is_err());
    }
}
