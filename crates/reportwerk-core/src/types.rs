// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Reportwerk export pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportId(pub Uuid);

impl ExportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metadata a report contributes to an export. Used only to derive the
/// artifact's filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExportMetadata {
    pub report_number: String,
    pub work_order: String,
    pub customer_name: String,
    pub suburb: String,
    /// Calendar date of the inspection; any string is accepted.
    pub date: String,
}

/// Artifact formats the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Png,
    Jpg,
}

impl ExportFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Png => "PNG",
            Self::Jpg => "JPG",
        })
    }
}

/// Per-call export options. Every field is optional; unset fields fall back
/// to the `ExportConfig` defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Use this filename instead of deriving one from the metadata.
    pub filename: Option<String>,
    /// Encoder quality. 0..=1 for image encoding; a resolution multiplier for
    /// PDF image embedding.
    pub quality: Option<f32>,
    /// Encoder for the image strategy.
    pub format: Option<ExportFormat>,
    /// Bitmap pixels per CSS pixel.
    pub scale: Option<f32>,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
        }
    }

    /// CSS `@page { size: ... }` keyword.
    pub fn css_keyword(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::A5 => "A5",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }
}

/// Rendered size of a visual surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// One style sheet captured from the live view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleSheet {
    /// A linked sheet, re-linked by URL in the clone.
    Linked { href: String },
    /// Inline rule text, copied verbatim.
    Inline { rules: String },
}

/// The full set of presentation rules active on a surface, copied wholesale
/// into the print context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSnapshot {
    pub sheets: Vec<StyleSheet>,
}

impl StyleSnapshot {
    pub fn new(sheets: Vec<StyleSheet>) -> Self {
        Self { sheets }
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// A self-contained document written into a secondary rendering context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    /// Document title; hosts use it as the suggested "save as PDF" name.
    pub title: String,
    /// Complete markup, head and body.
    pub html: String,
    /// Sources of every image in the body, in document order.
    pub image_sources: Vec<String>,
}

/// Receipt for a delivered export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub id: ExportId,
    pub filename: String,
    pub format: ExportFormat,
    pub byte_len: usize,
    /// SHA-256 of the delivered bytes, lowercase hex.
    pub sha256: String,
    pub page_count: usize,
    pub created_at: DateTime<Utc>,
}

impl ExportArtifact {
    pub fn new(filename: String, format: ExportFormat, bytes: &[u8], page_count: usize) -> Self {
        Self {
            id: ExportId::new(),
            filename,
            format,
            byte_len: bytes.len(),
            sha256: crate::integrity::hash_bytes(bytes),
            page_count,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_extension_lookup() {
        assert_eq!(ExportFormat::from_extension("JPEG"), Some(ExportFormat::Jpg));
        assert_eq!(ExportFormat::from_extension("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_extension("gif"), None);
    }

    #[test]
    fn metadata_deserializes_from_camel_case() {
        let json = r#"{"reportNumber":"7","workOrder":"WO7","customerName":"Acme",
                       "suburb":"Hill","date":"2024-01-02"}"#;
        let meta: ReportExportMetadata = serde_json::from_str(json).expect("parse");
        assert_eq!(meta.work_order, "WO7");
        assert_eq!(meta.customer_name, "Acme");
    }

    #[test]
    fn artifact_records_digest_and_size() {
        let artifact = ExportArtifact::new("a.png".into(), ExportFormat::Png, b"hello", 1);
        assert_eq!(artifact.byte_len, 5);
        assert_eq!(
            artifact.sha256,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
