// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonical export filenames.
//
// Shape: `Work_Order_<workOrder>_CTR<reportNumber>_<customer>_<suburb>_<DD_MM_YYYY>.pdf`
// Every field is sanitised on its own and blank fields drop out of the join,
// so a missing part never leaves an empty segment behind.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{ExportFormat, ReportExportMetadata};

/// Characters that are unsafe in filenames on at least one major platform.
const UNSAFE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Date-only layouts accepted for the report date.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Date-time layouts without an offset.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Derive the canonical PDF filename for a report.
pub fn derive_filename(metadata: &ReportExportMetadata) -> String {
    derive_filename_with_extension(metadata, ExportFormat::Pdf.extension())
}

/// Derive the canonical filename with a different extension (no leading dot).
pub fn derive_filename_with_extension(metadata: &ReportExportMetadata, extension: &str) -> String {
    let work_order = sanitize_segment(&metadata.work_order);
    let report_number = sanitize_segment(&metadata.report_number);
    let report_part = if report_number.is_empty() {
        String::new()
    } else {
        format!("CTR{report_number}")
    };

    let parts = [
        "Work_Order".to_string(),
        work_order,
        report_part,
        sanitize_segment(&metadata.customer_name),
        sanitize_segment(&metadata.suburb),
        format_report_date(&metadata.date),
    ];

    let stem = parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("_");

    format!("{stem}.{extension}")
}

/// Pick the filename for an export: the caller's override if given, otherwise
/// the derived name. Overrides ending in `.pdf` take the target format's
/// extension; overrides without any extension get one appended.
pub fn resolve_filename(
    override_name: Option<&str>,
    metadata: &ReportExportMetadata,
    format: ExportFormat,
) -> String {
    let Some(name) = override_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return derive_filename_with_extension(metadata, format.extension());
    };

    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("pdf") => {
            format!("{stem}.{}", format.extension())
        }
        Some((stem, _)) if !stem.is_empty() => name.to_string(),
        _ => format!("{name}.{}", format.extension()),
    }
}

/// Replace unsafe characters with `_`, collapse whitespace runs to a single
/// space and trim the ends.
pub fn sanitize_segment(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format the report date as `DD_MM_YYYY`, or fall back to the sanitised raw
/// string when it does not parse as a date.
fn format_report_date(raw: &str) -> String {
    match parse_report_date(raw) {
        Some(date) => date.format("%d_%m_%Y").to_string(),
        None => sanitize_segment(raw),
    }
}

fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
