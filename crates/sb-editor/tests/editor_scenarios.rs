//! Integration tests: the editor facade driving sb-core and sb-render.
//!
//! Walks the user-facing scenarios end to end: creating a scrapbook,
//! dropping and dragging widgets, connecting and deleting them, flipping
//! pages, exporting, and the suggestion seam.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sb_core::{Clock, Connection, Node, NodeId, NodeKind, NodeProps, Point, PropValue};
use sb_editor::{
    CanvasEvent, DocumentError, Editor, EditorConfig, ImageEdit, ImageEditRequest, Interaction, Mode,
    NoticeLevel, PageMutation, RasterJob, Rasterizer, SuggestError, SuggestionService, TextRequest,
    TextSuggestion,
};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct TestClock(Rc<Cell<u64>>);

impl TestClock {
    fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

fn editor() -> (Editor<TestClock>, TestClock) {
    let clock = TestClock::default();
    clock.advance(1_700_000_000_000);
    let mut editor = Editor::with_clock(EditorConfig::default(), clock.clone());
    editor.create_scrapbook(Some("My Trip"));
    (editor, clock)
}

fn node(id: u64, kind: NodeKind, x: f32, y: f32) -> Node {
    Node::new(NodeId(id), NodeProps::defaults(kind), Point::new(x, y), "")
}

// ─── Document ────────────────────────────────────────────────────────────

#[test]
fn fresh_scrapbook_has_four_empty_pages() {
    let (editor, _) = editor();
    let book = editor.current_book().unwrap();
    assert_eq!(book.pages.len(), 4);
    for page in &book.pages {
        assert!(page.nodes.is_empty());
        assert!(page.connections.is_empty());
    }
    assert_eq!(book.category_id, "life");
}

#[test]
fn deleting_a_node_prunes_its_connection() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(1, NodeKind::Text, 0.0, 0.0) }).unwrap();
    editor.apply(PageMutation::AddNode { node: node(2, NodeKind::Text, 300.0, 0.0) }).unwrap();
    editor
        .apply(PageMutation::AddConnection { from: NodeId(1), to: NodeId(2) })
        .unwrap();

    assert!(editor.handle(&CanvasEvent::DeleteNode { node: NodeId(1) }));

    let page = editor.current_page().unwrap();
    assert_eq!(page.nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![NodeId(2)]);
    assert_eq!(page.connections, Vec::<Connection>::new());
}

// ─── Canvas ──────────────────────────────────────────────────────────────

#[test]
fn drop_at_half_scale_lands_at_logical_point() {
    let (mut editor, _) = editor();
    editor.set_canvas_size(400.0, 560.0);
    let changed = editor.handle(&CanvasEvent::Drop {
        kind: "text".into(),
        x: 120.0,
        y: 120.0,
        overrides: Vec::new(),
    });
    assert!(changed);
    let page = editor.current_page().unwrap();
    assert_eq!(page.nodes.len(), 1);
    let created = &page.nodes[0];
    assert_eq!((created.x, created.y), (200.0, 200.0));
    assert_eq!(created.props, NodeProps::defaults(NodeKind::Text));
    assert!(!created.is_open);
    assert_eq!(editor.session().selected(), Some(created.id));
}

#[test]
fn unknown_template_creates_nothing() {
    let (mut editor, _) = editor();
    let changed = editor.handle(&CanvasEvent::PaletteClick {
        kind: "hologram".into(),
        overrides: Vec::new(),
    });
    assert!(!changed);
    assert!(editor.current_page().unwrap().nodes.is_empty());
    assert!(editor.notices().is_empty());
}

#[test]
fn nodes_from_one_template_do_not_share_props() {
    let (mut editor, clock) = editor();
    for _ in 0..2 {
        editor.handle(&CanvasEvent::PaletteClick {
            kind: "polaroid".into(),
            overrides: Vec::new(),
        });
    }
    let ids: Vec<_> = editor.current_page().unwrap().nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    clock.advance(5);
    editor
        .update_props(ids[0], vec![("title".into(), PropValue::from("Changed"))])
        .unwrap();
    let page = editor.current_page().unwrap();
    assert_eq!(page.node(ids[0]).unwrap().props.get("title"), Some(PropValue::from("Changed")));
    assert_eq!(
        page.node(ids[1]).unwrap().props,
        NodeProps::defaults(NodeKind::Polaroid)
    );
}

#[test]
fn drag_moves_by_screen_delta_over_zoom() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(9, NodeKind::Window, 100.0, 100.0) }).unwrap();
    editor.set_canvas_size(400.0, 560.0);

    editor.handle(&CanvasEvent::PointerDown { x: 60.0, y: 60.0, target: Some(NodeId(9)) });
    editor.handle(&CanvasEvent::PointerMove { x: 65.0, y: 70.0 });
    editor.handle(&CanvasEvent::PointerMove { x: 70.0, y: 80.0 });
    editor.handle(&CanvasEvent::PointerUp);

    let moved = editor.current_page().unwrap().node(NodeId(9)).unwrap();
    assert_eq!((moved.x, moved.y), (120.0, 140.0));
    assert_eq!(editor.session().state(), Interaction::Idle);
}

#[test]
fn self_connection_is_a_no_op() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(3, NodeKind::Drawer, 0.0, 0.0) }).unwrap();
    editor.handle(&CanvasEvent::StartConnecting { node: NodeId(3) });
    let changed = editor.handle(&CanvasEvent::PointerDown { x: 5.0, y: 5.0, target: Some(NodeId(3)) });
    assert!(!changed);
    assert!(editor.current_page().unwrap().connections.is_empty());
    assert_eq!(editor.session().state(), Interaction::Idle);
}

#[test]
fn toggling_twice_in_preview_is_identity() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(4, NodeKind::Envelope, 0.0, 0.0) }).unwrap();
    editor.set_mode(Mode::Preview);
    let before = editor.render_current_page().unwrap();

    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(4) }));
    assert!(editor.current_page().unwrap().node(NodeId(4)).unwrap().is_open);
    assert_ne!(editor.render_current_page().unwrap(), before);
    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(4) }));
    assert_eq!(editor.render_current_page().unwrap(), before);
}

#[test]
fn preview_refuses_edits() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(5, NodeKind::Text, 0.0, 0.0) }).unwrap();
    editor.set_mode(Mode::Preview);
    assert_eq!(
        editor.update_props(NodeId(5), vec![("text".into(), PropValue::from("x"))]),
        Err(DocumentError::ReadOnly)
    );
    assert!(!editor.handle(&CanvasEvent::DeleteNode { node: NodeId(5) }));
    assert!(editor.apply(PageMutation::ToggleOpen { id: NodeId(5) }).is_ok());
}

fn place_on_page(editor: &mut Editor<TestClock>, index: i64, node: Node) {
    if editor.request_page(index).is_some() {
        assert!(editor.complete_flip());
    }
    editor.apply(PageMutation::AddNode { node }).unwrap();
}

fn is_open(editor: &Editor<TestClock>, page: usize, id: u64) -> bool {
    let book = editor.current_book().unwrap();
    book.page(page).unwrap().node(NodeId(id)).unwrap().is_open
}

#[test]
fn preview_click_reaches_the_right_hand_page() {
    let (mut editor, _) = editor();
    place_on_page(&mut editor, 0, node(8, NodeKind::Drawer, 0.0, 0.0));
    place_on_page(&mut editor, 1, node(9, NodeKind::Envelope, 0.0, 0.0));
    place_on_page(&mut editor, 0, node(10, NodeKind::Text, 0.0, 0.0));
    editor.set_mode(Mode::Preview);
    let before = editor.render_spread().unwrap();

    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(9) }));
    assert!(is_open(&editor, 1, 9));
    assert_ne!(editor.render_spread().unwrap(), before);

    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(8) }));
    assert!(is_open(&editor, 0, 8));
}

#[test]
fn preview_click_follows_the_active_spread() {
    let (mut editor, _) = editor();
    place_on_page(&mut editor, 2, node(20, NodeKind::Wanted, 0.0, 0.0));
    place_on_page(&mut editor, 3, node(30, NodeKind::Window, 0.0, 0.0));
    place_on_page(&mut editor, 0, node(1, NodeKind::Text, 0.0, 0.0));
    editor.set_mode(Mode::Preview);

    // spread 0 does not show pages 2 and 3
    assert!(!editor.handle(&CanvasEvent::Click { node: NodeId(30) }));
    assert!(!is_open(&editor, 3, 30));

    assert!(editor.next_spread());
    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(20) }));
    assert!(editor.handle(&CanvasEvent::Click { node: NodeId(30) }));
    assert!(is_open(&editor, 2, 20));
    assert!(is_open(&editor, 3, 30));

    assert!(editor.jump_to_spread(0));
    assert!(!editor.handle(&CanvasEvent::Click { node: NodeId(20) }));
    assert!(is_open(&editor, 2, 20));
}

#[test]
fn toggle_on_page_is_limited_to_visible_pages() {
    let (mut editor, _) = editor();
    place_on_page(&mut editor, 1, node(9, NodeKind::Envelope, 0.0, 0.0));
    place_on_page(&mut editor, 2, node(20, NodeKind::Wanted, 0.0, 0.0));
    place_on_page(&mut editor, 0, node(1, NodeKind::Text, 0.0, 0.0));

    // editing shows only the current page
    assert_eq!(editor.toggle_on_page(1, NodeId(9)), Err(DocumentError::PageNotShown(1)));

    editor.set_mode(Mode::Preview);
    editor.toggle_on_page(1, NodeId(9)).unwrap();
    assert!(is_open(&editor, 1, 9));
    assert_eq!(editor.toggle_on_page(2, NodeId(20)), Err(DocumentError::PageNotShown(2)));
    assert_eq!(editor.toggle_on_page(1, NodeId(20)), Err(DocumentError::UnknownNode(NodeId(20))));

    assert!(editor.jump_to_spread(1));
    editor.toggle_on_page(2, NodeId(20)).unwrap();
    assert!(is_open(&editor, 2, 20));
}

#[test]
fn edits_without_an_open_scrapbook_are_refused() {
    let mut editor = Editor::with_clock(EditorConfig::default(), TestClock::default());
    assert_eq!(
        editor.apply(PageMutation::ToggleOpen { id: NodeId(1) }),
        Err(DocumentError::NoScrapbookOpen)
    );
    assert_eq!(editor.add_page(), Err(DocumentError::NoScrapbookOpen));
    assert_eq!(editor.toggle_on_page(0, NodeId(1)), Err(DocumentError::NoScrapbookOpen));
}

#[test]
fn live_canvas_shows_editing_hooks() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(6, NodeKind::Record, 0.0, 0.0) }).unwrap();
    editor.handle(&CanvasEvent::PointerDown { x: 1.0, y: 1.0, target: Some(NodeId(6)) });
    let html = editor.render_current_page().unwrap();
    assert!(html.contains("sb-selected"));
    assert!(html.contains("data-action=\"delete\""));
}

// ─── Navigation ──────────────────────────────────────────────────────────

#[test]
fn out_of_range_navigation_keeps_current_page() {
    let (mut editor, _) = editor();
    assert_eq!(editor.request_page(-1), None);
    assert_eq!(editor.request_page(4), None);
    assert!(!editor.complete_flip());
    assert_eq!(editor.current_page_index(), 0);
}

#[test]
fn page_flip_commits_and_clears_selection() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(7, NodeKind::Suit, 0.0, 0.0) }).unwrap();
    editor.handle(&CanvasEvent::PointerDown { x: 1.0, y: 1.0, target: Some(NodeId(7)) });

    assert_eq!(editor.request_page(1), Some(400));
    assert_eq!(editor.session().state(), Interaction::Idle);
    assert_eq!(editor.current_page_index(), 0);
    assert!(editor.complete_flip());
    assert_eq!(editor.current_page_index(), 1);
    assert_eq!(editor.session().selected(), None);
    assert!(editor.current_page().unwrap().nodes.is_empty());
}

// ─── Export ──────────────────────────────────────────────────────────────

struct PngStub;

#[async_trait(?Send)]
impl Rasterizer for PngStub {
    async fn rasterize(&self, job: &RasterJob) -> Result<Vec<u8>, String> {
        assert_eq!(job.pixel_ratio, 2.0);
        Ok(b"\x89PNG".to_vec())
    }
}

struct Offline;

#[async_trait(?Send)]
impl Rasterizer for Offline {
    async fn rasterize(&self, _job: &RasterJob) -> Result<Vec<u8>, String> {
        Err("failed to fetch https://picsum.photos/seed/1/400/300".into())
    }
}

#[tokio::test]
async fn image_export_is_named_after_current_page() {
    let (mut editor, _) = editor();
    editor.request_page(2);
    editor.complete_flip();
    let artifact = editor.export_image(&PngStub).await.unwrap();
    assert_eq!(artifact.filename, "My Trip_page_3.png");
    assert!(!editor.is_exporting());
}

#[tokio::test]
async fn failed_image_export_raises_a_notice() {
    let (mut editor, _) = editor();
    assert!(editor.export_image(&Offline).await.is_none());
    assert!(!editor.is_exporting());
    let notices = editor.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    let id = notices[0].id;
    assert!(editor.dismiss_notice(id));
    assert!(editor.notices().is_empty());
}

#[test]
fn standalone_document_download() {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(8, NodeKind::FlipBox, 0.0, 0.0) }).unwrap();
    let (filename, html) = editor.export_document().unwrap();
    assert_eq!(filename, "My Trip_interactive.html");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("\"0:8\""));
}

// ─── Suggestions ─────────────────────────────────────────────────────────

struct Scripted {
    text: Result<TextSuggestion, SuggestError>,
    image: Result<ImageEdit, SuggestError>,
}

#[async_trait(?Send)]
impl SuggestionService for Scripted {
    async fn suggest_text(&self, request: &TextRequest) -> Result<TextSuggestion, SuggestError> {
        assert_eq!(request.node_type, "filmroll");
        self.text.clone()
    }

    async fn modify_image(&self, _request: &ImageEditRequest) -> Result<ImageEdit, SuggestError> {
        self.image.clone()
    }
}

fn film_editor() -> Editor<TestClock> {
    let (mut editor, _) = editor();
    editor.apply(PageMutation::AddNode { node: node(11, NodeKind::FilmRoll, 0.0, 0.0) }).unwrap();
    editor
}

#[tokio::test]
async fn text_suggestion_fills_title_and_body() {
    let mut editor = film_editor();
    let service = Scripted {
        text: Ok(TextSuggestion {
            title: "Harbour lights".into(),
            description: "Boats asleep under a paper moon.".into(),
        }),
        image: Err(SuggestError::Transport("unused".into())),
    };
    assert!(editor.suggest_text(&service, NodeId(11), "a night in Lisbon").await);
    let props = &editor.current_page().unwrap().node(NodeId(11)).unwrap().props;
    assert_eq!(props.get("title"), Some(PropValue::from("Harbour lights")));
    assert_eq!(props.get("subtitle"), Some(PropValue::from("Boats asleep under a paper moon.")));
}

#[tokio::test]
async fn failed_suggestion_leaves_props_untouched() {
    let mut editor = film_editor();
    let service = Scripted {
        text: Err(SuggestError::Transport("timeout".into())),
        image: Err(SuggestError::Transport("timeout".into())),
    };
    assert!(!editor.suggest_text(&service, NodeId(11), "anything").await);
    assert_eq!(
        editor.current_page().unwrap().node(NodeId(11)).unwrap().props,
        NodeProps::defaults(NodeKind::FilmRoll)
    );
    assert_eq!(editor.notices().len(), 1);
}

#[test]
fn suggestion_for_a_deleted_node_is_dropped() {
    let mut editor = film_editor();
    let pending = editor.suggestion_request(NodeId(11), "beach").unwrap();
    editor.handle(&CanvasEvent::DeleteNode { node: NodeId(11) });
    let applied = editor.apply_suggestion(
        &pending,
        Ok(TextSuggestion {
            title: "Too late".into(),
            description: String::new(),
        }),
    );
    assert!(!applied);
}

#[tokio::test]
async fn sticker_edit_replaces_the_image() {
    let (mut editor, _) = editor();
    let id = editor
        .stickers_mut()
        .add(1, "data:image/png;base64,AAAA", "cat");
    let service = Scripted {
        text: Err(SuggestError::Transport("unused".into())),
        image: Ok(ImageEdit {
            modified_image_data: "data:image/png;base64,BBBB".into(),
        }),
    };
    assert!(editor.edit_sticker(&service, &id, "add a hat").await);
    assert_eq!(editor.stickers().get(&id).unwrap().url, "data:image/png;base64,BBBB");

    let broken = Scripted {
        text: Err(SuggestError::Transport("unused".into())),
        image: Ok(ImageEdit {
            modified_image_data: "not an image".into(),
        }),
    };
    assert!(!editor.edit_sticker(&broken, &id, "again").await);
    assert_eq!(editor.stickers().get(&id).unwrap().url, "data:image/png;base64,BBBB");
}

#[test]
fn user_sticker_drops_at_size_100() {
    let (mut editor, _) = editor();
    let id = editor.stickers_mut().add(2, "https://img.test/star.png", "star");
    let overrides = editor.stickers().get(&id).unwrap().overrides();
    editor.handle(&CanvasEvent::PaletteClick {
        kind: "sticker".into(),
        overrides,
    });
    let created = &editor.current_page().unwrap().nodes[0];
    assert_eq!((created.x, created.y), (100.0, 100.0));
    assert_eq!(created.props.get("size"), Some(PropValue::Num(100.0)));
    assert_eq!(created.props.get("sticker"), Some(PropValue::from("https://img.test/star.png")));
}
