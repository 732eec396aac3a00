// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped object URLs. A URL is revoked when its guard drops, so the blob is
// released on every exit path, including a failed download.

use reportwerk_core::error::Result;
use tracing::{debug, instrument};

use crate::traits::{Blob, DownloadHost};

/// An object URL registered with a `DownloadHost`, revoked on drop.
pub struct ObjectUrl<'h, H: DownloadHost + ?Sized> {
    host: &'h H,
    url: String,
}

impl<'h, H: DownloadHost + ?Sized> ObjectUrl<'h, H> {
    pub fn create(host: &'h H, blob: Blob) -> Result<Self> {
        let url = host.create_object_url(blob)?;
        debug!(%url, "object URL created");
        Ok(Self { host, url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn download(&self, filename: &str) -> Result<()> {
        self.host.trigger_download(&self.url, filename)
    }
}

impl<H: DownloadHost + ?Sized> Drop for ObjectUrl<'_, H> {
    fn drop(&mut self) {
        self.host.revoke_object_url(&self.url);
        debug!(url = %self.url, "object URL revoked");
    }
}

/// Save `bytes` under `filename` through a transient object URL.
#[instrument(skip(host, bytes), fields(bytes_len = bytes.len()))]
pub fn deliver<H: DownloadHost + ?Sized>(
    host: &H,
    bytes: Vec<u8>,
    mime_type: &'static str,
    filename: &str,
) -> Result<()> {
    let url = ObjectUrl::create(host, Blob { bytes, mime_type })?;
    url.download(filename)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reportwerk_core::ReportwerkError;

    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        created: Mutex<Vec<String>>,
        revoked: Mutex<Vec<String>>,
        fail_download: bool,
    }

    impl DownloadHost for RecordingHost {
        fn create_object_url(&self, _blob: Blob) -> Result<String> {
            let mut created = self.created.lock().expect("lock");
            let url = format!("blob:test-{}", created.len());
            created.push(url.clone());
            Ok(url)
        }

        fn trigger_download(&self, _url: &str, _filename: &str) -> Result<()> {
            if self.fail_download {
                Err(ReportwerkError::Download("disk full".into()))
            } else {
                Ok(())
            }
        }

        fn revoke_object_url(&self, url: &str) {
            self.revoked.lock().expect("lock").push(url.to_string());
        }
    }

    #[test]
    fn url_is_revoked_after_delivery() {
        let host = RecordingHost::default();
        deliver(&host, vec![1, 2, 3], "image/png", "a.png").expect("deliver");
        assert_eq!(*host.created.lock().unwrap(), vec!["blob:test-0"]);
        assert_eq!(*host.revoked.lock().unwrap(), vec!["blob:test-0"]);
    }

    #[test]
    fn url_is_revoked_when_download_fails() {
        let host = RecordingHost {
            fail_download: true,
            ..Default::default()
        };
        let result = deliver(&host, vec![1], "image/png", "a.png");
        assert!(matches!(result, Err(ReportwerkError::Download(_))));
        assert_eq!(host.revoked.lock().unwrap().len(), 1);
    }
}
