//! Standalone artifacts: the interactive HTML document and the spread markup
//! handed to a rasterizer.
//!
//! The exported document carries no widget logic of its own. Every node's
//! closed and open markup is baked from [`describe`] at export time and the
//! embedded script only swaps between the two, so the document can never
//! drift from the editor.

use crate::html::{escape, to_html};
use crate::page::{RenderContext, page_view};
use crate::view::View;
use crate::widgets::{STYLESHEET, describe};
use sb_core::color::normalize_hex;
use sb_core::model::{Page, Scrapbook};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

const NAV_SCRIPT: &str = include_str!("export.js");

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not serialize scrapbook: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("rasterizer failed: {0}")]
    Rasterize(String),
    #[error("an export is already running")]
    InProgress,
    #[error("page {index} is out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

/// Knobs for the exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// `lang` attribute of the document.
    pub lang: String,
    pub page_background: String,
    /// Colour behind the book.
    pub backdrop: String,
    pub draw_connections: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            lang: "en".into(),
            page_background: "#ffffff".into(),
            backdrop: "#f1f5f9".into(),
            draw_connections: true,
        }
    }
}

impl ExportOptions {
    fn colour(value: &str, fallback: &str) -> String {
        normalize_hex(value).unwrap_or_else(|| {
            log::warn!("export colour {value:?} is not a hex colour, using {fallback}");
            fallback.to_owned()
        })
    }

    fn page_background(&self) -> String {
        Self::colour(&self.page_background, "#ffffff")
    }

    fn backdrop(&self) -> String {
        Self::colour(&self.backdrop, "#f1f5f9")
    }
}

/// `<title or 'scrapbook'>_page_<n>.png`, with `n` one-based.
pub fn image_filename(title: &str, page_index: usize) -> String {
    let title = if title.is_empty() { "scrapbook" } else { title };
    format!("{title}_page_{}.png", page_index + 1)
}

/// Download name of the standalone document.
pub fn document_filename(book: &Scrapbook) -> String {
    format!("{}_interactive.html", book.display_title())
}

fn export_page(page: &Page, options: &ExportOptions) -> View {
    let view = if options.draw_connections {
        page_view(page, RenderContext::Static)
    } else {
        let bare = Page {
            connections: Vec::new(),
            ..page.clone()
        };
        page_view(&bare, RenderContext::Static)
    };
    view.style("background-color", options.page_background())
}

/// Two pages side by side starting at `start`. A missing right page is
/// rendered blank.
pub fn spread_view(book: &Scrapbook, start: usize, options: &ExportOptions) -> Result<View, ExportError> {
    let count = book.page_count();
    let left = book
        .page(start)
        .ok_or(ExportError::PageOutOfRange { index: start, count })?;
    let right = match book.page(start + 1) {
        Some(page) => export_page(page, options),
        None => View::div("sb-page")
            .class("sb-blank")
            .style("background-color", options.page_background()),
    };
    Ok(View::div("sb-spread")
        .child(export_page(left, options))
        .child(right))
}

/// Self-contained markup of one spread, styles included. This is what the
/// image export rasterizes.
pub fn spread_html(book: &Scrapbook, start: usize, options: &ExportOptions) -> Result<String, ExportError> {
    let view = spread_view(book, start, options)?;
    Ok(format!("<style>{STYLESHEET}</style>{}", to_html(&view)))
}

#[derive(Serialize)]
struct Payload<'a> {
    book: &'a Scrapbook,
    /// Baked page markup in stored state.
    pages: Vec<String>,
    /// `"<page>:<node>"` → `[closed, open]` widget markup.
    views: BTreeMap<String, [String; 2]>,
    /// `"<page>:<node>"` → initial `isOpen`.
    state: BTreeMap<String, bool>,
}

fn payload<'a>(book: &'a Scrapbook, options: &ExportOptions) -> Payload<'a> {
    let mut views = BTreeMap::new();
    let mut state = BTreeMap::new();
    for (index, page) in book.pages.iter().enumerate() {
        for node in &page.nodes {
            let key = format!("{index}:{}", node.id);
            views.insert(
                key.clone(),
                [to_html(&describe(node, false)), to_html(&describe(node, true))],
            );
            state.insert(key, node.is_open);
        }
    }
    Payload {
        book,
        pages: book
            .pages
            .iter()
            .map(|p| to_html(&export_page(p, options)))
            .collect(),
        views,
        state,
    }
}

/// JSON that is safe inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// The complete interactive document.
pub fn standalone_html(book: &Scrapbook, options: &ExportOptions) -> Result<String, ExportError> {
    let data = script_json(&payload(book, options))?;
    let title = escape(book.display_title());
    let lang = escape(&options.lang);
    let backdrop = options.backdrop();
    let page_bg = options.page_background();

    log::debug!(
        "exporting `{}`: {} pages, {} bytes of data",
        book.title,
        book.page_count(),
        data.len()
    );

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body{{margin:0;min-height:100vh;display:flex;flex-direction:column;align-items:center;justify-content:center;gap:24px;background:{backdrop};font-family:sans-serif;overflow:hidden}}
.sb-heading{{margin:0;font-size:20px;font-weight:800;color:#1e293b}}
.sb-stage{{position:relative}}
.sb-book{{position:absolute;top:0;left:0;display:flex;width:1600px;height:1120px;transform-origin:top left;box-shadow:0 25px 50px -12px rgba(0,0,0,.25)}}
.sb-slot{{width:800px;height:1120px;background:{page_bg};overflow:hidden}}
.sb-slot.sb-blank{{opacity:.6}}
.sb-nav{{display:flex;align-items:center;gap:16px}}
.sb-arrow{{width:44px;height:44px;border:0;border-radius:9999px;background:#fff;color:#1e293b;font-size:18px;cursor:pointer;box-shadow:0 4px 6px -1px rgba(0,0,0,.1)}}
.sb-arrow:disabled{{opacity:.3;cursor:default}}
.sb-dots{{display:flex;gap:8px}}
.sb-dot{{width:8px;height:8px;padding:0;border:0;border-radius:9999px;background:#cbd5e1;cursor:pointer;transition:all .3s}}
.sb-dot.sb-active{{width:24px;background:#6366f1}}
{STYLESHEET}
</style>
</head>
<body>
<h1 class="sb-heading">{title}</h1>
<div class="sb-stage" id="sb-stage">
<div class="sb-book" id="sb-book"><div class="sb-slot" id="sb-left"></div><div class="sb-slot" id="sb-right"></div></div>
</div>
<div class="sb-nav">
<button type="button" class="sb-arrow" id="sb-prev" title="Previous">&#8592;</button>
<div class="sb-dots" id="sb-dots"></div>
<button type="button" class="sb-arrow" id="sb-next" title="Next">&#8594;</button>
</div>
<script id="sb-data" type="application/json">{data}</script>
<script>
{NAV_SCRIPT}
</script>
</body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sb_core::{Connection, Node, NodeId, NodeKind, NodeProps, Point};

    fn book() -> Scrapbook {
        let mut book = Scrapbook::new(1000, "My Trip", "travel", 3, 0);
        let mut env = Node::new(
            NodeId(2000),
            NodeProps::defaults(NodeKind::Envelope),
            Point::new(100.0, 100.0),
            "https://img.test/a.png",
        );
        env.props
            .set("letterText", "</script><script>alert(1)</script>".into())
            .unwrap();
        let poster = Node::new(
            NodeId(2001),
            NodeProps::defaults(NodeKind::Wanted),
            Point::new(400.0, 300.0),
            "",
        );
        book.pages[0].nodes = vec![env, poster];
        book.pages[0].connections = vec![Connection::new(NodeId(2000), NodeId(2001))];
        book
    }

    #[test]
    fn filenames() {
        assert_eq!(image_filename("My Trip", 2), "My Trip_page_3.png");
        assert_eq!(image_filename("", 0), "scrapbook_page_1.png");
        assert_eq!(document_filename(&book()), "My Trip_interactive.html");
    }

    #[test]
    fn embedded_data_cannot_close_the_script() {
        let html = standalone_html(&book(), &ExportOptions::default()).unwrap();
        let start = html.find("<script id=\"sb-data\"").unwrap();
        let body = &html[start..];
        let end = body.find("</script>").unwrap();
        assert!(!body[..end]["<script".len()..].contains('<'));
    }

    #[test]
    fn embedded_data_round_trips() {
        let book = book();
        let html = standalone_html(&book, &ExportOptions::default()).unwrap();
        let start = html.find("application/json\">").unwrap() + "application/json\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let data: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
        let back: Scrapbook = serde_json::from_value(data["book"].clone()).unwrap();
        assert_eq!(back, book);
        assert_eq!(data["pages"].as_array().unwrap().len(), 3);
        assert_eq!(data["state"]["0:2000"], serde_json::json!(false));
    }

    #[test]
    fn view_table_matches_live_markup() {
        let book = book();
        let html = standalone_html(&book, &ExportOptions::default()).unwrap();
        let start = html.find("application/json\">").unwrap() + "application/json\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let data: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();

        let node = &book.pages[0].nodes[0];
        let live = crate::page::page_html(
            &book.pages[0],
            RenderContext::editing(Some(node.id), None),
        );
        let closed = data["views"]["0:2000"][0].as_str().unwrap();
        let open = data["views"]["0:2000"][1].as_str().unwrap();
        assert!(live.contains(closed));
        assert_eq!(open, to_html(&describe(node, true)));
    }

    #[test]
    fn odd_page_count_leaves_blank_right_page() {
        let book = book();
        let last = spread_view(&book, 2, &ExportOptions::default()).unwrap();
        let html = to_html(&last);
        assert!(html.contains("class=\"sb-page sb-blank\""));
        assert!(matches!(
            spread_view(&book, 3, &ExportOptions::default()),
            Err(ExportError::PageOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn connections_can_be_left_out() {
        let options = ExportOptions {
            draw_connections: false,
            ..ExportOptions::default()
        };
        let html = spread_html(&book(), 0, &options).unwrap();
        assert!(!html.contains("<path "));
        let html = spread_html(&book(), 0, &ExportOptions::default()).unwrap();
        assert_eq!(html.matches("<path ").count(), 1);
    }

    #[test]
    fn bad_colours_fall_back() {
        let options = ExportOptions {
            backdrop: "red;}</style>".into(),
            ..ExportOptions::default()
        };
        let html = standalone_html(&book(), &options).unwrap();
        assert!(html.contains("background:#f1f5f9"));
    }
}
