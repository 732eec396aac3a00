// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory print host and surface shared by this crate's tests.

use std::sync::{Arc, Mutex, MutexGuard};

use reportwerk_bridge::traits::{ImageLoad, ImageSettle, PrintHost, SecondaryContext, VisualSurface};
use reportwerk_core::error::{ReportwerkError, Result};
use reportwerk_core::types::{PrintDocument, StyleSnapshot, SurfaceSize};

/// How images in a mock context settle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    #[default]
    Load,
    Fail,
    Hang,
}

#[derive(Debug, Clone, Default)]
pub struct HostBehaviour {
    /// 1-based `open_secondary` calls that are refused.
    pub blocked_opens: Vec<usize>,
    pub images: ImageMode,
    pub fail_print: bool,
}

#[derive(Debug, Default)]
pub struct HostLog {
    pub opened: usize,
    pub open_now: usize,
    pub max_open: usize,
    pub documents: Vec<PrintDocument>,
    pub printed: Vec<String>,
    pub closed: usize,
}

pub struct MockHost {
    behaviour: HostBehaviour,
    log: Arc<Mutex<HostLog>>,
}

impl MockHost {
    pub fn new(behaviour: HostBehaviour) -> Self {
        Self {
            behaviour,
            log: Arc::new(Mutex::new(HostLog::default())),
        }
    }

    pub fn log(&self) -> MutexGuard<'_, HostLog> {
        self.log.lock().expect("host log")
    }
}

impl PrintHost for MockHost {
    type Context = MockContext;

    fn open_secondary(&self) -> Result<Option<MockContext>> {
        let mut log = self.log();
        log.opened += 1;
        if self.behaviour.blocked_opens.contains(&log.opened) {
            return Ok(None);
        }
        log.open_now += 1;
        log.max_open = log.max_open.max(log.open_now);
        Ok(Some(MockContext {
            log: Arc::clone(&self.log),
            images: self.behaviour.images,
            fail_print: self.behaviour.fail_print,
            document: None,
            closed: false,
        }))
    }
}

pub struct MockContext {
    log: Arc<Mutex<HostLog>>,
    images: ImageMode,
    fail_print: bool,
    document: Option<PrintDocument>,
    closed: bool,
}

impl SecondaryContext for MockContext {
    fn write_document(&mut self, document: &PrintDocument) -> Result<()> {
        self.log.lock().expect("host log").documents.push(document.clone());
        self.document = Some(document.clone());
        Ok(())
    }

    fn image_loads(&mut self) -> Vec<ImageLoad> {
        let count = self.document.as_ref().map_or(0, |d| d.image_sources.len());
        (0..count)
            .map(|_| -> ImageLoad {
                match self.images {
                    ImageMode::Load => Box::pin(std::future::ready(ImageSettle::Loaded)),
                    ImageMode::Fail => Box::pin(std::future::ready(ImageSettle::Failed)),
                    ImageMode::Hang => Box::pin(std::future::pending::<ImageSettle>()),
                }
            })
            .collect()
    }

    fn print(&mut self) -> Result<()> {
        if self.fail_print {
            return Err(ReportwerkError::Print("printer driver offline".into()));
        }
        let title = self
            .document
            .as_ref()
            .map(|d| d.title.clone())
            .unwrap_or_default();
        self.log.lock().expect("host log").printed.push(title);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            let mut log = self.log.lock().expect("host log");
            log.closed += 1;
            log.open_now -= 1;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A surface with fixed markup and styles.
pub struct MockSurface {
    pub markup: String,
    pub styles: StyleSnapshot,
}

impl MockSurface {
    pub fn new(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            styles: StyleSnapshot::default(),
        }
    }
}

impl VisualSurface for MockSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: 794,
            height: 1123,
        }
    }

    fn markup(&self) -> String {
        self.markup.clone()
    }

    fn style_snapshot(&self) -> StyleSnapshot {
        self.styles.clone()
    }
}
