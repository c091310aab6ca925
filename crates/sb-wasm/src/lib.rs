//! WASM bridge for the scrapbook editor.
//!
//! Compiled via `wasm-pack build --target web`. The page shell owns the DOM:
//! it forwards pointer and palette events here, sets the markup returned by
//! `render_page` / `render_spread`, and arms a timer whenever
//! `request_page` returns a delay. Structured values cross the boundary as
//! JSON strings; ids cross as numbers.

mod error;
mod host;

use crate::error::BridgeError;
use crate::host::{JsClock, JsRasterizer, JsSuggestionService, trigger_download};
use sb_core::id::NodeId;
use sb_core::props::PropValue;
use sb_core::registry;
use sb_editor::{CanvasEvent, Editor, EditorConfig, Mode, NodePatch, spread_count};
use sb_render::{ExportOptions, STYLESHEET};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

/// Set up panic messages (and console logging when enabled).
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

fn node_id(raw: f64) -> NodeId {
    NodeId(raw as u64)
}

/// `[["key", value], ...]` or `{"key": value}` → prop assignments.
fn parse_values(json: &str) -> Result<Vec<(String, PropValue)>, BridgeError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    map.into_iter()
        .map(|(k, v)| Ok((k, serde_json::from_value(v)?)))
        .collect()
}

/// The browser-facing editor. All interaction from the page goes through
/// this struct.
#[wasm_bindgen]
pub struct ScrapbookCanvas {
    editor: Rc<RefCell<Editor<JsClock>>>,
}

#[wasm_bindgen]
impl ScrapbookCanvas {
    /// Create an editor from a JSON config (empty string for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).unwrap_or_else(|e| {
                log::warn!("editor config ignored: {e}");
                EditorConfig::default()
            })
        };
        Self {
            editor: Rc::new(RefCell::new(Editor::with_clock(config, JsClock))),
        }
    }

    // ─── Shelf ───────────────────────────────────────────────────────────

    /// Replace the shelf with a JSON array of scrapbooks.
    pub fn load_books(&mut self, json: &str) -> Result<(), JsValue> {
        let books = serde_json::from_str(json).map_err(BridgeError::from)?;
        self.editor.borrow_mut().load_books(books);
        Ok(())
    }

    pub fn books_json(&self) -> String {
        serde_json::to_string(self.editor.borrow().store().books()).unwrap_or_default()
    }

    pub fn categories_json(&self) -> String {
        serde_json::to_string(&sb_core::model::default_categories()).unwrap_or_default()
    }

    pub fn create_scrapbook(&mut self, title: Option<String>) -> f64 {
        self.editor.borrow_mut().create_scrapbook(title.as_deref()) as f64
    }

    pub fn open_scrapbook(&mut self, id: f64) -> bool {
        self.editor.borrow_mut().open_scrapbook(id as u64).is_ok()
    }

    pub fn close(&mut self) {
        self.editor.borrow_mut().close();
    }

    pub fn delete_scrapbook(&mut self, id: f64) -> bool {
        self.editor.borrow_mut().delete_scrapbook(id as u64).is_ok()
    }

    pub fn rename_scrapbook(&mut self, id: f64, title: &str) -> bool {
        self.editor.borrow_mut().rename_scrapbook(id as u64, title).is_ok()
    }

    /// `"classic"` or `"spiral_accordion"`.
    pub fn set_style(&mut self, id: f64, style: &str) -> Result<(), JsValue> {
        let style = serde_json::from_value(json!(style)).map_err(BridgeError::from)?;
        self.editor
            .borrow_mut()
            .set_style(id as u64, style)
            .map_err(|e| BridgeError::from(e).into())
    }

    pub fn set_category(&mut self, id: f64, category: &str) -> bool {
        self.editor.borrow_mut().set_category(id as u64, category).is_ok()
    }

    /// Append a page; returns its index.
    pub fn add_page(&mut self) -> Result<u32, JsValue> {
        let index = self.editor.borrow_mut().add_page().map_err(BridgeError::from)?;
        Ok(index as u32)
    }

    pub fn current_book_json(&self) -> String {
        let editor = self.editor.borrow();
        editor
            .current_book()
            .and_then(|b| serde_json::to_string(b).ok())
            .unwrap_or_else(|| "null".into())
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    pub fn templates_json(&self) -> String {
        serde_json::to_string(registry::templates()).unwrap_or_default()
    }

    pub fn sticker_presets_json(&self) -> String {
        serde_json::to_string(&registry::sticker_presets().collect::<Vec<_>>()).unwrap_or_default()
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.editor.borrow_mut().set_canvas_size(width, height);
    }

    /// Fit the page into the editor container; returns the resulting zoom.
    pub fn fit_to_container(&mut self, width: f32, height: f32) -> f32 {
        let mut editor = self.editor.borrow_mut();
        editor.fit_to_container(width, height);
        editor.view().scale_x
    }

    pub fn set_preview(&mut self, preview: bool) {
        let mode = if preview { Mode::Preview } else { Mode::Edit };
        self.editor.borrow_mut().set_mode(mode);
    }

    fn handle(&mut self, event: CanvasEvent) -> bool {
        self.editor.borrow_mut().handle(&event)
    }

    /// `target` is the `data-node-id` under the pointer, if any.
    pub fn pointer_down(&mut self, x: f32, y: f32, target: Option<f64>) -> bool {
        self.handle(CanvasEvent::PointerDown {
            x,
            y,
            target: target.map(node_id),
        })
    }

    /// Pointer-down resolved by hit testing instead of the DOM.
    pub fn pointer_down_at(&mut self, x: f32, y: f32) -> bool {
        let event = {
            let editor = self.editor.borrow();
            let Some(page) = editor.current_page() else {
                return false;
            };
            CanvasEvent::pointer_down_at(page, &editor.view(), x, y)
        };
        self.handle(event)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.handle(CanvasEvent::PointerMove { x, y })
    }

    pub fn pointer_up(&mut self) -> bool {
        self.handle(CanvasEvent::PointerUp)
    }

    pub fn leave(&mut self) -> bool {
        self.handle(CanvasEvent::Leave)
    }

    pub fn start_connecting(&mut self, node: f64) -> bool {
        self.handle(CanvasEvent::StartConnecting { node: node_id(node) })
    }

    pub fn cancel_connecting(&mut self) -> bool {
        self.handle(CanvasEvent::CancelConnecting)
    }

    /// Palette drop at a screen point. `overrides_json` is a props object
    /// (sticker presets, user stickers) or empty.
    pub fn drop_template(&mut self, kind: &str, x: f32, y: f32, overrides_json: &str) -> Result<bool, JsValue> {
        let overrides = parse_values(overrides_json)?;
        Ok(self.handle(CanvasEvent::Drop {
            kind: kind.to_owned(),
            x,
            y,
            overrides,
        }))
    }

    pub fn palette_click(&mut self, kind: &str, overrides_json: &str) -> Result<bool, JsValue> {
        let overrides = parse_values(overrides_json)?;
        Ok(self.handle(CanvasEvent::PaletteClick {
            kind: kind.to_owned(),
            overrides,
        }))
    }

    /// Click on a widget: toggles it open or closed (also in preview, on
    /// either page of the spread).
    pub fn click_node(&mut self, node: f64) -> bool {
        self.handle(CanvasEvent::Click { node: node_id(node) })
    }

    /// Toggle a widget on a given page; the page must be on screen.
    pub fn toggle_on_page(&mut self, page: u32, node: f64) -> Result<(), JsValue> {
        self.editor
            .borrow_mut()
            .toggle_on_page(page as usize, node_id(node))
            .map_err(|e| BridgeError::from(e).into())
    }

    pub fn delete_node(&mut self, node: f64) -> bool {
        self.handle(CanvasEvent::DeleteNode { node: node_id(node) })
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.borrow_mut().delete_selected()
    }

    pub fn selected_id(&self) -> Option<f64> {
        self.editor.borrow().session().selected().map(|id| id.get() as f64)
    }

    /// `{"state": "idle" | "dragging" | "connecting", ...}`.
    pub fn interaction_json(&self) -> String {
        serde_json::to_string(&self.editor.borrow().session().state()).unwrap_or_default()
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// JSON of the selected node, or `null`.
    pub fn selected_node_json(&self) -> String {
        let editor = self.editor.borrow();
        editor
            .session()
            .selected()
            .and_then(|id| editor.current_page()?.node(id))
            .and_then(|n| serde_json::to_string(n).ok())
            .unwrap_or_else(|| "null".into())
    }

    pub fn update_props(&mut self, node: f64, values_json: &str) -> Result<(), JsValue> {
        let values = parse_values(values_json)?;
        self.editor
            .borrow_mut()
            .update_props(node_id(node), values)
            .map_err(|e| BridgeError::from(e).into())
    }

    /// `{"x":..,"y":..,"imgBg":..,"imgTop":..}`, every key optional.
    pub fn update_node(&mut self, node: f64, patch_json: &str) -> Result<(), JsValue> {
        let patch: NodePatch = serde_json::from_str(patch_json).map_err(BridgeError::from)?;
        self.editor
            .borrow_mut()
            .update_node(node_id(node), patch)
            .map_err(|e| BridgeError::from(e).into())
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Shared widget stylesheet; inject once into the page.
    pub fn stylesheet() -> String {
        STYLESHEET.to_owned()
    }

    pub fn render_page(&self) -> String {
        self.editor.borrow().render_current_page().unwrap_or_default()
    }

    pub fn render_spread(&self) -> String {
        self.editor.borrow().render_spread().unwrap_or_default()
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Start flipping to `index`. Returns the delay in ms before
    /// `complete_flip` must be called, or `undefined` when nothing happens.
    pub fn request_page(&mut self, index: i32) -> Option<u32> {
        self.editor.borrow_mut().request_page(index as i64)
    }

    pub fn complete_flip(&mut self) -> bool {
        self.editor.borrow_mut().complete_flip()
    }

    /// `{"current":..,"flip":{"direction":..,"target":..}|null}`.
    pub fn page_state_json(&self) -> String {
        let editor = self.editor.borrow();
        let nav = editor.navigator();
        let count = editor.current_book().map_or(0, |b| b.page_count());
        json!({
            "current": nav.current_page(),
            "count": count,
            "flip": nav.flip(),
            "hasPrev": nav.has_prev_page(),
            "hasNext": nav.has_next_page(count),
        })
        .to_string()
    }

    pub fn next_spread(&mut self) -> bool {
        self.editor.borrow_mut().next_spread()
    }

    pub fn prev_spread(&mut self) -> bool {
        self.editor.borrow_mut().prev_spread()
    }

    pub fn jump_to_spread(&mut self, spread: u32) -> bool {
        self.editor.borrow_mut().jump_to_spread(spread as usize)
    }

    /// `{"start":..,"active":..,"spreads":..,"hasPrev":..,"hasNext":..}`.
    pub fn spread_state_json(&self) -> String {
        let editor = self.editor.borrow();
        let nav = editor.navigator();
        let count = editor.current_book().map_or(0, |b| b.page_count());
        json!({
            "start": nav.spread_start(),
            "active": nav.active_spread(),
            "spreads": spread_count(count),
            "hasPrev": nav.has_prev_spread(),
            "hasNext": nav.has_next_spread(count),
        })
        .to_string()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn set_export_options(&mut self, json: &str) -> Result<(), JsValue> {
        let options: ExportOptions = serde_json::from_str(json).map_err(BridgeError::from)?;
        self.editor.borrow_mut().set_export_options(options);
        Ok(())
    }

    /// Build the standalone document and offer it as a download.
    pub fn download_document(&mut self) -> Result<bool, JsValue> {
        let Some((filename, html)) = self.editor.borrow_mut().export_document() else {
            return Ok(false);
        };
        let parts = js_sys::Array::of1(&JsValue::from_str(&html));
        trigger_download(&filename, &parts, "text/html")?;
        Ok(true)
    }

    pub fn is_exporting(&self) -> bool {
        self.editor.borrow().is_exporting()
    }

    /// Rasterize the current spread through `rasterize(markup, width,
    /// height, pixelRatio) -> Promise<Uint8Array>` and download the PNG.
    /// Resolves to the filename, or `null` when nothing was produced (the
    /// reason is in the notices).
    pub fn export_image(&mut self, rasterize: js_sys::Function) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        let job = editor.borrow_mut().begin_image_export();
        future_to_promise(async move {
            let Some(job) = job else {
                return Ok(JsValue::NULL);
            };
            let result = sb_editor::Rasterizer::rasterize(&JsRasterizer::new(rasterize), &job).await;
            let artifact = editor.borrow_mut().finish_image_export(job, result);
            let Some(artifact) = artifact else {
                return Ok(JsValue::NULL);
            };
            let bytes = js_sys::Uint8Array::from(artifact.bytes.as_slice());
            trigger_download(&artifact.filename, &js_sys::Array::of1(&bytes), "image/png")?;
            Ok(JsValue::from_str(&artifact.filename))
        })
    }

    // ─── Suggestions ─────────────────────────────────────────────────────

    /// Ask `suggest(requestJson) -> Promise<responseJson>` for a title and
    /// description and write them into `node`. Resolves to whether the
    /// node changed.
    pub fn suggest_text(&mut self, suggest: js_sys::Function, node: f64, prompt: &str) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        let pending = editor.borrow().suggestion_request(node_id(node), prompt);
        future_to_promise(async move {
            let Some(pending) = pending else {
                return Ok(JsValue::FALSE);
            };
            let service = JsSuggestionService::text(suggest);
            let result = sb_editor::SuggestionService::suggest_text(&service, &pending.request).await;
            let applied = editor.borrow_mut().apply_suggestion(&pending, result);
            Ok(JsValue::from_bool(applied))
        })
    }

    /// Edit a user sticker's image with `modify(requestJson) ->
    /// Promise<responseJson>`.
    pub fn edit_sticker(&mut self, modify: js_sys::Function, sticker: String, instruction: &str) -> js_sys::Promise {
        let editor = Rc::clone(&self.editor);
        let request = editor.borrow().sticker_edit_request(&sticker, instruction);
        future_to_promise(async move {
            let Some(request) = request else {
                return Ok(JsValue::FALSE);
            };
            let service = JsSuggestionService::image(modify);
            let result = sb_editor::SuggestionService::modify_image(&service, &request).await;
            let applied = editor.borrow_mut().apply_sticker_edit(&sticker, result);
            Ok(JsValue::from_bool(applied))
        })
    }

    // ─── User stickers ───────────────────────────────────────────────────

    pub fn stickers_json(&self) -> String {
        serde_json::to_string(self.editor.borrow().stickers()).unwrap_or_default()
    }

    /// Store an uploaded image; returns the sticker id.
    pub fn add_sticker(&mut self, url: &str, name: &str) -> String {
        let raw = js_sys::Date::now() as u64;
        self.editor.borrow_mut().stickers_mut().add(raw, url, name)
    }

    pub fn rename_sticker(&mut self, id: &str, name: &str) -> bool {
        self.editor.borrow_mut().stickers_mut().rename(id, name)
    }

    pub fn remove_sticker(&mut self, id: &str) -> bool {
        self.editor.borrow_mut().stickers_mut().remove(id).is_some()
    }

    /// Props object for dropping a user sticker.
    pub fn sticker_overrides_json(&self, id: &str) -> String {
        let editor = self.editor.borrow();
        let Some(sticker) = editor.stickers().get(id) else {
            return "{}".into();
        };
        let map: serde_json::Map<String, serde_json::Value> = sticker
            .overrides()
            .into_iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k, v)))
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    pub fn notices_json(&self) -> String {
        serde_json::to_string(self.editor.borrow().notices()).unwrap_or_default()
    }

    pub fn dismiss_notice(&mut self, id: f64) -> bool {
        self.editor.borrow_mut().dismiss_notice(id as u64)
    }
}
