//! The editor facade.
//!
//! Ties the document store, the interaction session, page navigation, the
//! image export flow and the suggestion seam together behind the calls a
//! host makes. Failures a user should hear about become [`Notice`]s; none
//! of them escape into the host's event loop.
//!
//! Async work comes in two halves (`*_request` / `apply_*`, or
//! `begin_*` / `finish_*`) so a host can hold the editor only briefly on
//! either side of an await. The `async` helpers chain both halves for
//! hosts that can keep the editor borrowed.

use crate::canvas::{EditorSession, Mode};
use crate::config::EditorConfig;
use crate::document::{DocumentError, DocumentStore, NodePatch, PageMutation};
use crate::export::{ImageArtifact, ImageExport, RasterJob, Rasterizer};
use crate::input::CanvasEvent;
use crate::navigator::PageNavigator;
use crate::notice::{Notice, Notices};
use crate::stickers::StickerLibrary;
use crate::suggest::{ImageEdit, ImageEditRequest, SuggestError, SuggestionService, TextRequest, TextSuggestion};
use sb_core::geometry::ViewTransform;
use sb_core::id::{Clock, NodeId, SystemClock};
use sb_core::model::{Page, Scrapbook, ScrapbookId, ScrapbookStyle};
use sb_core::props::PropValue;
use sb_render::{ExportOptions, document_filename, page_html, spread_html, standalone_html};

/// Margin kept around the page when fitting it to the canvas container.
const FIT_MARGIN: f32 = 40.0;

/// A text suggestion in flight, pinned to the node it was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSuggestion {
    pub book: ScrapbookId,
    pub page: usize,
    pub node: NodeId,
    pub request: TextRequest,
}

pub struct Editor<C: Clock = SystemClock> {
    config: EditorConfig,
    clock: C,
    store: DocumentStore,
    open: Option<ScrapbookId>,
    session: EditorSession,
    navigator: PageNavigator,
    view: ViewTransform,
    image_export: ImageExport,
    export_options: ExportOptions,
    notices: Notices,
    stickers: StickerLibrary,
}

impl Editor<SystemClock> {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Editor<C> {
    pub fn with_clock(config: EditorConfig, clock: C) -> Self {
        Self {
            session: EditorSession::new(config.palette_drop_point),
            navigator: PageNavigator::new(config.flip_duration_ms),
            view: ViewTransform::uniform(config.default_editor_scale),
            config,
            clock,
            store: DocumentStore::new(),
            open: None,
            image_export: ImageExport::default(),
            export_options: ExportOptions::default(),
            notices: Notices::default(),
            stickers: StickerLibrary::default(),
        }
    }

    /// Replace the shelf with previously saved scrapbooks.
    pub fn load_books(&mut self, books: Vec<Scrapbook>) {
        self.store = DocumentStore::from_books(books);
        self.close();
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn stickers(&self) -> &StickerLibrary {
        &self.stickers
    }

    pub fn stickers_mut(&mut self) -> &mut StickerLibrary {
        &mut self.stickers
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export_options
    }

    pub fn set_export_options(&mut self, options: ExportOptions) {
        self.export_options = options;
    }

    pub fn notices(&self) -> &[Notice] {
        self.notices.items()
    }

    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        self.notices.dismiss(id)
    }

    // ─── Shelf ───────────────────────────────────────────────────────────

    /// Create a scrapbook from the configured defaults and open it.
    pub fn create_scrapbook(&mut self, title: Option<&str>) -> ScrapbookId {
        let now = self.now();
        let title = title.unwrap_or(&self.config.default_title).to_owned();
        let id = self.store.create_scrapbook(
            &title,
            &self.config.default_category,
            self.config.initial_page_count,
            now,
        );
        self.open_unchecked(id);
        id
    }

    pub fn open_scrapbook(&mut self, id: ScrapbookId) -> Result<(), DocumentError> {
        if self.store.get(id).is_none() {
            return Err(DocumentError::UnknownScrapbook(id));
        }
        self.open_unchecked(id);
        Ok(())
    }

    fn open_unchecked(&mut self, id: ScrapbookId) {
        self.open = Some(id);
        self.navigator.reset();
        self.session.reset();
    }

    /// Leave the editor. Any interaction in flight is abandoned.
    pub fn close(&mut self) {
        self.open = None;
        self.navigator.reset();
        self.session.reset();
    }

    pub fn delete_scrapbook(&mut self, id: ScrapbookId) -> Result<Scrapbook, DocumentError> {
        let book = self.store.delete_scrapbook(id)?;
        if self.open == Some(id) {
            self.close();
        }
        Ok(book)
    }

    pub fn rename_scrapbook(&mut self, id: ScrapbookId, title: &str) -> Result<(), DocumentError> {
        let now = self.now();
        self.store.rename_scrapbook(id, title, now)
    }

    pub fn set_style(&mut self, id: ScrapbookId, style: ScrapbookStyle) -> Result<(), DocumentError> {
        let now = self.now();
        self.store.set_style(id, style, now)
    }

    pub fn set_category(&mut self, id: ScrapbookId, category: &str) -> Result<(), DocumentError> {
        let now = self.now();
        self.store.set_category(id, category, now)
    }

    /// Append a page to the open scrapbook and return its index.
    pub fn add_page(&mut self) -> Result<usize, DocumentError> {
        let book = self.open.ok_or(DocumentError::NoScrapbookOpen)?;
        let now = self.now();
        self.store.add_page(book, now)
    }

    pub fn current_book(&self) -> Option<&Scrapbook> {
        self.open.and_then(|id| self.store.get(id))
    }

    pub fn current_page_index(&self) -> usize {
        self.navigator.current_page()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_book()?.page(self.navigator.current_page())
    }

    fn page_count(&self) -> usize {
        self.current_book().map_or(0, Scrapbook::page_count)
    }

    // ─── Canvas ──────────────────────────────────────────────────────────

    /// The host reports the canvas's rendered size in pixels.
    pub fn set_canvas_size(&mut self, pixel_width: f32, pixel_height: f32) {
        self.view = ViewTransform::from_canvas_size(pixel_width, pixel_height);
    }

    /// The host reports the container size; the page is fitted into it.
    pub fn fit_to_container(&mut self, width: f32, height: f32) {
        self.view = ViewTransform::fit(width, height, FIT_MARGIN);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.session.set_mode(mode);
    }

    /// Feed one canvas event through the session and apply what it implies.
    /// Returns whether the document changed.
    pub fn handle(&mut self, event: &CanvasEvent) -> bool {
        let Some(book) = self.open else {
            return false;
        };
        let index = self.event_page(book, event);
        let Ok(page) = self.store.page(book, index) else {
            return false;
        };
        let mutations = self.session.handle(event, page, &self.view);
        if mutations.is_empty() {
            return false;
        }
        let now = self.now();
        let mut changed = false;
        for mutation in mutations {
            match self.store.apply(book, index, mutation, now) {
                Ok(created) => {
                    changed = true;
                    if created.is_some() {
                        self.session.select(created);
                    }
                }
                Err(e) => log::warn!("canvas event {event:?} not applied: {e}"),
            }
        }
        changed
    }

    /// Page index `event` applies to. Preview shows a whole spread, so a
    /// click goes to whichever of its pages holds the node.
    fn event_page(&self, book: ScrapbookId, event: &CanvasEvent) -> usize {
        let current = self.navigator.current_page();
        match (self.session.mode(), event, self.store.get(book)) {
            (Mode::Preview, CanvasEvent::Click { node }, Some(b)) => {
                self.spread_page_of(b, *node).unwrap_or(current)
            }
            _ => current,
        }
    }

    fn spread_page_of(&self, book: &Scrapbook, node: NodeId) -> Option<usize> {
        let (left, right) = self.navigator.spread_pages(book.page_count());
        [Some(left), right]
            .into_iter()
            .flatten()
            .find(|&i| book.page(i).is_some_and(|p| p.contains(node)))
    }

    /// Whether page `index` is on screen: the current page while editing,
    /// either page of the active spread in preview.
    fn is_page_shown(&self, index: usize) -> bool {
        match self.session.mode() {
            Mode::Edit => index == self.navigator.current_page(),
            Mode::Preview => {
                let (left, right) = self.navigator.spread_pages(self.page_count());
                index == left || right == Some(index)
            }
        }
    }

    /// Open or close `node` on page `index`, which must be on screen.
    /// Allowed in both modes.
    pub fn toggle_on_page(&mut self, index: usize, node: NodeId) -> Result<(), DocumentError> {
        let book = self.open.ok_or(DocumentError::NoScrapbookOpen)?;
        if !self.is_page_shown(index) {
            return Err(DocumentError::PageNotShown(index));
        }
        let now = self.now();
        self.store
            .apply(book, index, PageMutation::ToggleOpen { id: node }, now)
            .map(drop)
    }

    /// Apply a mutation to the current page (property panel and friends).
    /// Preview sessions may only toggle widgets.
    pub fn apply(&mut self, mutation: PageMutation) -> Result<Option<NodeId>, DocumentError> {
        if self.session.is_read_only() && !mutation.allowed_in_preview() {
            return Err(DocumentError::ReadOnly);
        }
        let book = self.open.ok_or(DocumentError::NoScrapbookOpen)?;
        let now = self.now();
        self.store.apply(book, self.navigator.current_page(), mutation, now)
    }

    pub fn update_props(&mut self, id: NodeId, values: Vec<(String, PropValue)>) -> Result<(), DocumentError> {
        self.apply(PageMutation::UpdateProps { id, values }).map(drop)
    }

    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<(), DocumentError> {
        self.apply(PageMutation::UpdateNode { id, patch }).map(drop)
    }

    /// Delete the selected node, if any.
    pub fn delete_selected(&mut self) -> bool {
        match self.session.selected() {
            Some(node) => self.handle(&CanvasEvent::DeleteNode { node }),
            None => false,
        }
    }

    /// Markup of the current page for the editor canvas (or preview, by mode).
    pub fn render_current_page(&self) -> Option<String> {
        self.current_page()
            .map(|page| page_html(page, self.session.render_context()))
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Start flipping to page `index`. Returns the delay after which the
    /// host must call [`Editor::complete_flip`], or `None` for a no-op.
    pub fn request_page(&mut self, index: i64) -> Option<u32> {
        let delay = self.navigator.request_page(index, self.page_count())?;
        // a drag or pending connection does not survive leaving the page
        self.session.cancel_interaction();
        Some(delay)
    }

    pub fn complete_flip(&mut self) -> bool {
        let committed = self.navigator.complete_flip(self.page_count());
        if committed {
            self.session.reset();
        }
        committed
    }

    pub fn next_spread(&mut self) -> bool {
        let count = self.page_count();
        self.navigator.next_spread(count)
    }

    pub fn prev_spread(&mut self) -> bool {
        self.navigator.prev_spread()
    }

    pub fn jump_to_spread(&mut self, spread: usize) -> bool {
        let count = self.page_count();
        self.navigator.jump_to_spread(spread, count)
    }

    /// Markup of the active preview spread.
    pub fn render_spread(&self) -> Option<String> {
        let book = self.current_book()?;
        spread_html(book, self.navigator.spread_start(), &self.export_options)
            .inspect_err(|e| log::warn!("spread not rendered: {e}"))
            .ok()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// `(filename, document)` of the standalone interactive export.
    pub fn export_document(&mut self) -> Option<(String, String)> {
        let book = self.current_book()?;
        let filename = document_filename(book);
        match standalone_html(book, &self.export_options) {
            Ok(html) => Some((filename, html)),
            Err(e) => {
                self.notices.error(format!("Export failed: {e}"));
                None
            }
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.image_export.is_exporting()
    }

    pub fn begin_image_export(&mut self) -> Option<RasterJob> {
        let book = self.open.and_then(|id| self.store.get(id))?;
        let job = self.image_export.begin(
            book,
            self.navigator.spread_start(),
            self.navigator.current_page(),
            &self.export_options,
            self.config.pixel_ratio,
        );
        match job {
            Ok(job) => Some(job),
            Err(e) => {
                self.notices
                    .error(format!("Image export failed: {e}. Check the network connection or try another browser."));
                None
            }
        }
    }

    pub fn finish_image_export(&mut self, job: RasterJob, result: Result<Vec<u8>, String>) -> Option<ImageArtifact> {
        match self.image_export.finish(job, result) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                self.notices
                    .error(format!("Image export failed: {e}. Check the network connection or try another browser."));
                None
            }
        }
    }

    pub async fn export_image<R: Rasterizer + ?Sized>(&mut self, rasterizer: &R) -> Option<ImageArtifact> {
        let job = self.begin_image_export()?;
        let result = rasterizer.rasterize(&job).await;
        self.finish_image_export(job, result)
    }

    // ─── Suggestions ─────────────────────────────────────────────────────

    /// Request for a text suggestion about `node` on the current page.
    pub fn suggestion_request(&self, node: NodeId, prompt: &str) -> Option<PendingSuggestion> {
        let book = self.open?;
        let page = self.navigator.current_page();
        let target = self.current_page()?.node(node)?;
        Some(PendingSuggestion {
            book,
            page,
            node,
            request: TextRequest {
                prompt: prompt.to_owned(),
                node_type: target.type_name().to_owned(),
            },
        })
    }

    /// Write a suggestion into its node. On failure, or when the node is
    /// gone, props stay untouched.
    pub fn apply_suggestion(
        &mut self,
        pending: &PendingSuggestion,
        result: Result<TextSuggestion, SuggestError>,
    ) -> bool {
        let suggestion = match result {
            Ok(s) => s,
            Err(e) => {
                self.notices.error(format!("Suggestion failed: {e}"));
                return false;
            }
        };
        let Some(node) = self
            .store
            .page(pending.book, pending.page)
            .ok()
            .and_then(|p| p.node(pending.node))
        else {
            log::debug!("suggestion target {} is gone", pending.node);
            return false;
        };
        let values = suggestion.assignments(&node.props);
        if values.is_empty() {
            return false;
        }
        let now = self.now();
        let mutation = PageMutation::UpdateProps {
            id: pending.node,
            values,
        };
        match self.store.apply(pending.book, pending.page, mutation, now) {
            Ok(_) => true,
            Err(e) => {
                self.notices.error(format!("Suggestion could not be applied: {e}"));
                false
            }
        }
    }

    pub async fn suggest_text<S: SuggestionService + ?Sized>(
        &mut self,
        service: &S,
        node: NodeId,
        prompt: &str,
    ) -> bool {
        let Some(pending) = self.suggestion_request(node, prompt) else {
            return false;
        };
        let result = service.suggest_text(&pending.request).await;
        self.apply_suggestion(&pending, result)
    }

    /// Request to edit a user sticker's image.
    pub fn sticker_edit_request(&self, sticker: &str, instruction: &str) -> Option<ImageEditRequest> {
        let s = self.stickers.get(sticker)?;
        Some(ImageEditRequest {
            image_data: s.url.clone(),
            instruction: instruction.to_owned(),
        })
    }

    pub fn apply_sticker_edit(&mut self, sticker: &str, result: Result<ImageEdit, SuggestError>) -> bool {
        match result.and_then(ImageEdit::checked) {
            Ok(edit) => self.stickers.replace_image(sticker, &edit.modified_image_data),
            Err(e) => {
                self.notices.error(format!("Sticker edit failed: {e}"));
                false
            }
        }
    }

    pub async fn edit_sticker<S: SuggestionService + ?Sized>(
        &mut self,
        service: &S,
        sticker: &str,
        instruction: &str,
    ) -> bool {
        let Some(request) = self.sticker_edit_request(sticker, instruction) else {
            return false;
        };
        let result = service.modify_image(&request).await;
        self.apply_sticker_edit(sticker, result)
    }
}
