// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host capabilities the export
// strategies drive: rendering surfaces, rasterisers, downloads, and print
// contexts.

use std::future::Future;
use std::pin::Pin;

use image::{Rgba, RgbaImage};
use reportwerk_core::error::Result;
use reportwerk_core::types::{PrintDocument, StyleSnapshot, SurfaceSize};

/// A rendered region of report content, owned by the caller.
///
/// Strategies only borrow a surface for the duration of one export and never
/// mutate it.
pub trait VisualSurface: Send + Sync {
    /// Rendered size in CSS pixels.
    fn size(&self) -> SurfaceSize;

    /// Serialised outer markup of the surface.
    fn markup(&self) -> String;

    /// Every style sheet active on the surface.
    fn style_snapshot(&self) -> StyleSnapshot;
}

/// Options for one rasterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Bitmap pixels per CSS pixel.
    pub scale: f32,
    /// Opaque fill beneath the content. `None` keeps transparency.
    pub background: Option<Rgba<u8>>,
}

impl RasterOptions {
    /// Reports are always captured on an opaque white canvas.
    pub fn on_white(scale: f32) -> Self {
        Self {
            scale,
            background: Some(Rgba([255, 255, 255, 255])),
        }
    }
}

/// Turns a visual surface into a bitmap.
pub trait Rasterizer: Send + Sync {
    type Surface: VisualSurface;

    fn rasterize(
        &self,
        surface: &Self::Surface,
        options: RasterOptions,
    ) -> impl Future<Output = Result<RgbaImage>> + Send;
}

/// Encoded bytes waiting to be handed to the user agent.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Triggers file saves through transient object URLs.
pub trait DownloadHost: Send + Sync {
    /// Register the blob and return a URL addressing it.
    fn create_object_url(&self, blob: Blob) -> Result<String>;

    /// Save the blob behind `url` under `filename`.
    fn trigger_download(&self, url: &str, filename: &str) -> Result<()>;

    /// Release the blob behind `url`. Unknown URLs are ignored.
    fn revoke_object_url(&self, url: &str);
}

/// How an image in a print context finished loading. Both variants count as
/// settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSettle {
    Loaded,
    Failed,
}

/// Resolves once one image in a print context has settled.
pub type ImageLoad = Pin<Box<dyn Future<Output = ImageSettle> + Send + 'static>>;

/// An isolated document opened only for printing.
pub trait SecondaryContext: Send {
    /// Replace the context's content with `document`.
    fn write_document(&mut self, document: &PrintDocument) -> Result<()>;

    /// One pending load per image currently in the document. Empty when the
    /// document has no images.
    fn image_loads(&mut self) -> Vec<ImageLoad>;

    /// Invoke the host print facility. Fire-and-forget: the outcome of the
    /// user's print dialog is never observed.
    fn print(&mut self) -> Result<()>;

    /// Tear the context down. Must be idempotent.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Opens secondary rendering contexts.
pub trait PrintHost: Send + Sync {
    type Context: SecondaryContext;

    /// `Ok(None)` means the host refused to open one (popup blocking).
    fn open_secondary(&self) -> Result<Option<Self::Context>>;
}

/// Prints a prepared context and closes it.
pub trait PrintDriver: Send + Sync {
    fn print_and_close<C: SecondaryContext>(
        &self,
        context: &mut C,
    ) -> impl Future<Output = Result<()>> + Send;
}
