// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print document assembly.
//
// The cloned report markup is scrubbed of anything executable, wrapped in a
// page-sized content box, and given the live view's style sheets followed by
// a baseline stylesheet that fixes the physical page. Style sheets are copied
// wholesale; no individual rule is interpreted here.

use std::sync::LazyLock;

use regex_lite::Regex;
use reportwerk_core::PaperSize;
use reportwerk_core::types::{PrintDocument, StyleSheet, StyleSnapshot};
use tracing::debug;

/// `<script>` elements, including an unterminated trailing one.
static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?(?:</script\s*>|$)").expect("script pattern compiles")
});

/// Inline event handler attributes (`onclick=...`, `onload='...'`).
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("event handler pattern compiles")
});

/// `href`/`src` attributes pointing at `javascript:` URLs.
static SCRIPT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src)\s*=\s*(?:"\s*javascript:[^"]*"|'\s*javascript:[^']*')"#)
        .expect("script URL pattern compiles")
});

/// `src` of every `<img>`, quoted or bare.
static IMAGE_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("image source pattern compiles")
});

/// Class of the page-sized box wrapping the report.
pub const PAGE_CLASS: &str = "print-page";

/// Renders report markup into a self-contained print document.
#[derive(Debug, Clone)]
pub struct PrintTemplate {
    paper_size: PaperSize,
    inset_mm: u32,
}

impl PrintTemplate {
    pub fn new(paper_size: PaperSize, inset_mm: u32) -> Self {
        Self {
            paper_size,
            inset_mm,
        }
    }

    /// Stylesheet injected after the cloned sheets so it wins on conflicts.
    pub fn baseline_stylesheet(&self) -> String {
        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        format!(
            "@page {{ size: {size}; margin: 0; }}\n\
             html, body {{ margin: 0; padding: 0; background: #fff; }}\n\
             .{PAGE_CLASS} {{ width: {width_mm}mm; height: {height_mm}mm; padding: {inset}mm; \
             box-sizing: border-box; margin: 0 auto; }}\n\
             * {{ -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; \
             color-adjust: exact !important; }}\n\
             img, table, tr, figure {{ page-break-inside: avoid; break-inside: avoid; }}\n\
             .no-print, [data-no-print] {{ display: none !important; }}\n",
            size = self.paper_size.css_keyword(),
            inset = self.inset_mm,
        )
    }

    /// Build the print document for `markup` styled by `styles`.
    pub fn render(&self, title: &str, markup: &str, styles: &StyleSnapshot) -> PrintDocument {
        let body = strip_scripts(markup);
        let image_sources = image_sources(&body);

        let mut head = String::new();
        head.push_str("<meta charset=\"utf-8\">\n");
        head.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        for sheet in &styles.sheets {
            match sheet {
                StyleSheet::Linked { href } => head.push_str(&format!(
                    "<link rel=\"stylesheet\" href=\"{}\">\n",
                    escape_html(href)
                )),
                StyleSheet::Inline { rules } => head.push_str(&format!(
                    "<style>\n{}\n</style>\n",
                    neutralise_style_close(rules)
                )),
            }
        }
        head.push_str(&format!(
            "<style data-print-baseline>\n{}</style>\n",
            self.baseline_stylesheet()
        ));

        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n{head}</head>\n<body>\n\
             <div class=\"{PAGE_CLASS}\">\n{body}\n</div>\n</body>\n</html>\n"
        );

        debug!(
            sheets = styles.sheets.len(),
            images = image_sources.len(),
            bytes = html.len(),
            "print document rendered"
        );

        PrintDocument {
            title: title.to_string(),
            html,
            image_sources,
        }
    }
}

/// Remove script elements, inline event handlers and `javascript:` URLs.
pub fn strip_scripts(markup: &str) -> String {
    let without_elements = SCRIPT_ELEMENT.replace_all(markup, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_elements, "");
    SCRIPT_URL
        .replace_all(&without_handlers, "${1}=\"about:blank\"")
        .into_owned()
}

/// Sources of every `<img>` in `markup`, in document order.
pub fn image_sources(markup: &str) -> Vec<String> {
    IMAGE_SOURCE
        .captures_iter(markup)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
        })
        .filter(|src| !src.is_empty())
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep inline rule text from terminating its `<style>` element early.
fn neutralise_style_close(rules: &str) -> String {
    rules.replace("</style", "<\\/style").replace("</STYLE", "<\\/STYLE")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> PrintTemplate {
        PrintTemplate::new(PaperSize::A4, 10)
    }

    #[test]
    fn baseline_pins_page_and_print_rules() {
        let css = template().baseline_stylesheet();
        assert!(css.contains("@page { size: A4; margin: 0; }"));
        assert!(css.contains("width: 210mm; height: 297mm; padding: 10mm; box-sizing: border-box;"));
        assert!(!css.contains("min-height"));
        assert!(css.contains("print-color-adjust: exact"));
        assert!(css.contains("img, table, tr, figure { page-break-inside: avoid;"));
        assert!(css.contains(".no-print, [data-no-print] { display: none !important; }"));
    }

    #[test]
    fn scripts_and_handlers_are_removed() {
        let markup = r#"<div onclick="steal()" class="r">Report<script>alert(1)</script>
            <SCRIPT type="module">
              import x from "y";
            </SCRIPT>
            <a href="javascript:void(0)">link</a>
            <img src="a.png" onload='track()'>
            <script>unterminated"#;
        let clean = strip_scripts(markup);
        assert!(!clean.to_lowercase().contains("<script"));
        assert!(!clean.contains("alert"));
        assert!(!clean.contains("import x"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("onload"));
        assert!(!clean.contains("javascript:"));
        assert!(clean.contains(r#"href="about:blank""#));
        assert!(clean.contains(r#"<div class="r">Report"#));
        assert!(clean.contains(r#"<img src="a.png">"#));
    }

    #[test]
    fn image_sources_in_order() {
        let markup = r#"<img src="logo.png"><p>x</p><IMG alt='x' src='sig.jpg'/>
                        <img class=a src=data:image/png;base64,AA><img alt="none">"#;
        assert_eq!(
            image_sources(markup),
            vec!["logo.png", "sig.jpg", "data:image/png;base64,AA"]
        );
    }

    #[test]
    fn render_clones_sheets_before_baseline() {
        let styles = StyleSnapshot::new(vec![
            StyleSheet::Linked {
                href: "/assets/app.css".into(),
            },
            StyleSheet::Inline {
                rules: ".hdr { color: red; } /* </style> */".into(),
            },
        ]);
        let doc = template().render(
            "Work_Order_WO1 <draft>",
            r#"<h1>Report</h1><img src="a.png"><script>x()</script>"#,
            &styles,
        );

        assert_eq!(doc.title, "Work_Order_WO1 <draft>");
        assert!(doc.html.contains("<title>Work_Order_WO1 &lt;draft&gt;</title>"));
        assert_eq!(doc.image_sources, vec!["a.png"]);
        assert!(!doc.html.contains("x()"));
        assert!(doc.html.contains(r#"<div class="print-page">"#));

        let linked = doc.html.find("/assets/app.css").expect("linked sheet");
        let inline = doc.html.find(".hdr { color: red; }").expect("inline sheet");
        let baseline = doc.html.find("data-print-baseline").expect("baseline");
        assert!(linked < inline && inline < baseline);
        assert!(doc.html.contains("<\\/style> */"));
    }

    #[test]
    fn document_without_images_lists_none() {
        let doc = template().render("t", "<p>text only</p>", &StyleSnapshot::default());
        assert!(doc.image_sources.is_empty());
    }
}
