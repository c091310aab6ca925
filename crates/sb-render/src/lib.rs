//! Rendering for scrapbook pages.
//!
//! One description of every widget ([`widgets::describe`]) feeds one emitter
//! ([`html::to_html`]). The live editor, the preview spread, the rasterizer
//! input and the standalone export are all built from it.

pub mod connection;
pub mod export;
pub mod hit;
pub mod html;
pub mod page;
pub mod view;
pub mod widgets;

pub use export::{ExportError, ExportOptions, document_filename, image_filename, spread_html, standalone_html};
pub use hit::hit_test;
pub use html::to_html;
pub use page::{RenderContext, page_html, page_view};
pub use view::View;
pub use widgets::{STYLESHEET, describe};
