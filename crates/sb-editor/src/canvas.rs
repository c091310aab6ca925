//! Canvas interaction state machine.
//!
//! [`EditorSession`] holds the per-page interaction state (drag, pending
//! connection, selection, mode) as a plain value. [`EditorSession::handle`]
//! takes one event and the page it applies to and returns the document
//! mutations the event implies; applying them is the caller's job.
//!
//! | State        | Event                          | Next         | Mutation          |
//! |--------------|--------------------------------|--------------|-------------------|
//! | Idle         | pointer down on empty canvas   | Idle         | clears selection  |
//! | Idle         | pointer down on node           | Dragging     | selects node      |
//! | Dragging     | pointer move                   | Dragging     | `MoveNode`        |
//! | Dragging     | pointer up                     | Idle         |                   |
//! | Idle         | start connecting on A          | Connecting   |                   |
//! | Connecting A | pointer down on B ≠ A          | Idle         | `AddConnection`   |
//! | Connecting A | pointer down on A, cancel      | Idle         |                   |
//! | any          | palette drop / click           | Idle         | `CreateNode`      |

use crate::document::PageMutation;
use crate::input::CanvasEvent;
use sb_core::geometry::{Point, ViewTransform};
use sb_core::id::NodeId;
use sb_core::model::Page;
use sb_core::props::PropValue;
use sb_core::registry;
use sb_render::RenderContext;
use serde::Serialize;

/// What the pointer is doing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Interaction {
    #[default]
    Idle,
    /// `pointer_origin` is in screen pixels, `node_origin` in logical units.
    Dragging {
        node: NodeId,
        pointer_origin: Point,
        node_origin: Point,
    },
    Connecting { source: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Edit,
    /// Read-only: only toggling widgets open and closed.
    Preview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    state: Interaction,
    selected: Option<NodeId>,
    mode: Mode,
    palette_drop_point: Point,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Point::new(100.0, 100.0))
    }
}

impl EditorSession {
    pub fn new(palette_drop_point: Point) -> Self {
        Self {
            state: Interaction::Idle,
            selected: None,
            mode: Mode::Edit,
            palette_drop_point,
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == Mode::Preview
    }

    /// Switch mode. Any interaction in flight is abandoned.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.reset();
        }
    }

    pub fn select(&mut self, node: Option<NodeId>) {
        self.selected = node;
    }

    /// Abandon a drag or pending connection, keeping the selection.
    pub fn cancel_interaction(&mut self) {
        self.state = Interaction::Idle;
    }

    /// Back to `Idle` with nothing selected (page change, editor closed).
    pub fn reset(&mut self) {
        self.state = Interaction::Idle;
        self.selected = None;
    }

    /// Source of the pending connection, if any.
    pub fn connecting(&self) -> Option<NodeId> {
        match self.state {
            Interaction::Connecting { source } => Some(source),
            _ => None,
        }
    }

    /// How the page should be rendered for this session.
    pub fn render_context(&self) -> RenderContext {
        match self.mode {
            Mode::Edit => RenderContext::editing(self.selected, self.connecting()),
            Mode::Preview => RenderContext::Static,
        }
    }

    /// Advance the state machine by one event.
    pub fn handle(&mut self, event: &CanvasEvent, page: &Page, view: &ViewTransform) -> Vec<PageMutation> {
        // a node deleted elsewhere must not stay referenced
        self.forget_missing(page);

        if self.mode == Mode::Preview {
            return match event {
                CanvasEvent::Click { node } if page.contains(*node) => {
                    vec![PageMutation::ToggleOpen { id: *node }]
                }
                _ => Vec::new(),
            };
        }

        match event {
            CanvasEvent::PointerDown { x, y, target } => self.pointer_down(Point::new(*x, *y), *target, page),
            CanvasEvent::PointerMove { x, y } => self.pointer_move(Point::new(*x, *y), view),
            CanvasEvent::PointerUp => {
                if matches!(self.state, Interaction::Dragging { .. }) {
                    self.state = Interaction::Idle;
                }
                Vec::new()
            }
            CanvasEvent::StartConnecting { node } => {
                if self.state == Interaction::Idle && page.contains(*node) {
                    self.state = Interaction::Connecting { source: *node };
                    self.selected = Some(*node);
                }
                Vec::new()
            }
            CanvasEvent::CancelConnecting => {
                if self.connecting().is_some() {
                    self.state = Interaction::Idle;
                }
                Vec::new()
            }
            CanvasEvent::Drop { kind, x, y, overrides } => {
                self.state = Interaction::Idle;
                self.create(kind, view.drop_position(*x, *y), overrides)
            }
            CanvasEvent::PaletteClick { kind, overrides } => {
                self.state = Interaction::Idle;
                self.create(kind, self.palette_drop_point, overrides)
            }
            CanvasEvent::Click { node } if page.contains(*node) => {
                vec![PageMutation::ToggleOpen { id: *node }]
            }
            CanvasEvent::Click { .. } => Vec::new(),
            CanvasEvent::DeleteNode { node } if page.contains(*node) => {
                self.forget(*node);
                vec![PageMutation::RemoveNode { id: *node }]
            }
            CanvasEvent::DeleteNode { .. } => Vec::new(),
            CanvasEvent::Leave => {
                self.cancel_interaction();
                Vec::new()
            }
        }
    }

    fn pointer_down(&mut self, at: Point, target: Option<NodeId>, page: &Page) -> Vec<PageMutation> {
        let target = target.and_then(|id| page.node(id));

        if let Interaction::Connecting { source } = self.state {
            self.state = Interaction::Idle;
            return match target {
                Some(node) if node.id != source => vec![PageMutation::AddConnection {
                    from: source,
                    to: node.id,
                }],
                Some(_) => {
                    log::debug!("connection from {source} to itself discarded");
                    Vec::new()
                }
                None => {
                    self.selected = None;
                    Vec::new()
                }
            };
        }

        match target {
            Some(node) => {
                self.selected = Some(node.id);
                self.state = Interaction::Dragging {
                    node: node.id,
                    pointer_origin: at,
                    node_origin: node.position(),
                };
            }
            None => {
                self.selected = None;
                self.state = Interaction::Idle;
            }
        }
        Vec::new()
    }

    fn pointer_move(&mut self, at: Point, view: &ViewTransform) -> Vec<PageMutation> {
        let Interaction::Dragging {
            node,
            pointer_origin,
            node_origin,
        } = self.state
        else {
            return Vec::new();
        };
        let (dx, dy) = view.delta_to_logical(at.x - pointer_origin.x, at.y - pointer_origin.y);
        vec![PageMutation::MoveNode {
            id: node,
            x: node_origin.x + dx,
            y: node_origin.y + dy,
        }]
    }

    fn create(&mut self, kind: &str, at: Point, overrides: &[(String, PropValue)]) -> Vec<PageMutation> {
        let Some(template) = registry::lookup(kind) else {
            log::debug!("no template for `{kind}`; nothing created");
            return Vec::new();
        };
        let props = template.instantiate_with(overrides.iter().map(|(k, v)| (k.as_str(), v.clone())));
        vec![PageMutation::CreateNode { props, at }]
    }

    /// Drop any reference to `node`, abandoning a drag or connection that
    /// involves it.
    fn forget(&mut self, node: NodeId) {
        let involved = match self.state {
            Interaction::Dragging { node: n, .. } => n == node,
            Interaction::Connecting { source } => source == node,
            Interaction::Idle => false,
        };
        if involved {
            self.state = Interaction::Idle;
        }
        if self.selected == Some(node) {
            self.selected = None;
        }
    }

    fn forget_missing(&mut self, page: &Page) {
        let referenced = match self.state {
            Interaction::Dragging { node, .. } => Some(node),
            Interaction::Connecting { source } => Some(source),
            Interaction::Idle => None,
        };
        for id in referenced.into_iter().chain(self.selected) {
            if !page.contains(id) {
                self.forget(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sb_core::{Node, NodeKind, NodeProps};

    fn page() -> Page {
        let mut page = Page::new(1);
        for (id, x) in [(1, 100.0), (2, 400.0)] {
            page.nodes.push(Node::new(
                NodeId(id),
                NodeProps::defaults(NodeKind::Drawer),
                Point::new(x, 100.0),
                "",
            ));
        }
        page
    }

    fn down(target: Option<u64>) -> CanvasEvent {
        CanvasEvent::PointerDown {
            x: 50.0,
            y: 50.0,
            target: target.map(NodeId),
        }
    }

    #[test]
    fn pointer_down_on_node_starts_drag_and_selects() {
        let mut session = EditorSession::default();
        let out = session.handle(&down(Some(1)), &page(), &ViewTransform::default());
        assert!(out.is_empty());
        assert_eq!(session.selected(), Some(NodeId(1)));
        assert_eq!(
            session.state(),
            Interaction::Dragging {
                node: NodeId(1),
                pointer_origin: Point::new(50.0, 50.0),
                node_origin: Point::new(100.0, 100.0),
            }
        );
    }

    #[test]
    fn pointer_down_on_canvas_clears_selection() {
        let mut session = EditorSession::default();
        session.select(Some(NodeId(2)));
        session.handle(&down(None), &page(), &ViewTransform::default());
        assert_eq!(session.selected(), None);
        assert_eq!(session.state(), Interaction::Idle);
    }

    #[test]
    fn drag_divides_screen_delta_by_zoom() {
        for zoom in [0.25_f32, 0.5, 1.0, 2.0] {
            let view = ViewTransform::uniform(zoom);
            let mut session = EditorSession::default();
            session.handle(&down(Some(1)), &page(), &view);
            let out = session.handle(&CanvasEvent::PointerMove { x: 80.0, y: 30.0 }, &page(), &view);
            assert_eq!(
                out,
                vec![PageMutation::MoveNode {
                    id: NodeId(1),
                    x: 100.0 + 30.0 / zoom,
                    y: 100.0 - 20.0 / zoom,
                }]
            );
            session.handle(&CanvasEvent::PointerUp, &page(), &view);
            assert_eq!(session.state(), Interaction::Idle);
        }
    }

    #[test]
    fn connecting_to_another_node_adds_edge() {
        let mut session = EditorSession::default();
        let view = ViewTransform::default();
        session.handle(&CanvasEvent::StartConnecting { node: NodeId(1) }, &page(), &view);
        assert_eq!(session.connecting(), Some(NodeId(1)));
        let out = session.handle(&down(Some(2)), &page(), &view);
        assert_eq!(
            out,
            vec![PageMutation::AddConnection {
                from: NodeId(1),
                to: NodeId(2)
            }]
        );
        assert_eq!(session.state(), Interaction::Idle);
    }

    #[test]
    fn connecting_to_self_is_discarded() {
        let mut session = EditorSession::default();
        let view = ViewTransform::default();
        session.handle(&CanvasEvent::StartConnecting { node: NodeId(1) }, &page(), &view);
        assert!(session.handle(&down(Some(1)), &page(), &view).is_empty());
        assert_eq!(session.state(), Interaction::Idle);

        session.handle(&CanvasEvent::StartConnecting { node: NodeId(1) }, &page(), &view);
        session.handle(&CanvasEvent::CancelConnecting, &page(), &view);
        assert_eq!(session.state(), Interaction::Idle);
    }

    #[test]
    fn drop_converts_screen_point_and_creates_node() {
        let mut session = EditorSession::default();
        let drop = CanvasEvent::Drop {
            kind: "text".into(),
            x: 120.0,
            y: 120.0,
            overrides: Vec::new(),
        };
        let out = session.handle(&drop, &page(), &ViewTransform::from_canvas_size(400.0, 560.0));
        assert_eq!(
            out,
            vec![PageMutation::CreateNode {
                props: NodeProps::defaults(NodeKind::Text),
                at: Point::new(200.0, 200.0),
            }]
        );
    }

    #[test]
    fn unknown_template_is_refused() {
        let mut session = EditorSession::default();
        for kind in ["custom", "spaceship"] {
            let out = session.handle(
                &CanvasEvent::PaletteClick {
                    kind: kind.into(),
                    overrides: Vec::new(),
                },
                &page(),
                &ViewTransform::default(),
            );
            assert!(out.is_empty(), "{kind}");
        }
    }

    #[test]
    fn palette_click_lands_at_drop_point_with_overrides() {
        let mut session = EditorSession::new(Point::new(100.0, 100.0));
        let out = session.handle(
            &CanvasEvent::PaletteClick {
                kind: "sticker".into(),
                overrides: vec![
                    ("sticker".into(), PropValue::from("https://img.test/cat.png")),
                    ("size".into(), PropValue::Num(100.0)),
                ],
            },
            &page(),
            &ViewTransform::default(),
        );
        let [PageMutation::CreateNode { props, at }] = out.as_slice() else {
            panic!("expected one CreateNode, got {out:?}");
        };
        assert_eq!(*at, Point::new(100.0, 100.0));
        assert_eq!(props.get("sticker"), Some(PropValue::from("https://img.test/cat.png")));
        assert_eq!(props.get("size"), Some(PropValue::Num(100.0)));
    }

    #[test]
    fn preview_only_toggles() {
        let mut session = EditorSession::default();
        session.set_mode(Mode::Preview);
        let view = ViewTransform::default();
        assert!(session.handle(&down(Some(1)), &page(), &view).is_empty());
        assert_eq!(session.state(), Interaction::Idle);
        assert!(session
            .handle(&CanvasEvent::DeleteNode { node: NodeId(1) }, &page(), &view)
            .is_empty());
        assert_eq!(
            session.handle(&CanvasEvent::Click { node: NodeId(2) }, &page(), &view),
            vec![PageMutation::ToggleOpen { id: NodeId(2) }]
        );
        assert_eq!(session.render_context(), RenderContext::Static);
    }

    #[test]
    fn deleting_the_dragged_node_returns_to_idle() {
        let mut session = EditorSession::default();
        let view = ViewTransform::default();
        session.handle(&down(Some(1)), &page(), &view);
        let out = session.handle(&CanvasEvent::DeleteNode { node: NodeId(1) }, &page(), &view);
        assert_eq!(out, vec![PageMutation::RemoveNode { id: NodeId(1) }]);
        assert_eq!(session.state(), Interaction::Idle);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn vanished_source_cancels_connection() {
        let mut session = EditorSession::default();
        let view = ViewTransform::default();
        session.handle(&CanvasEvent::StartConnecting { node: NodeId(1) }, &page(), &view);
        let mut without = page();
        without.remove_node(NodeId(1));
        let out = session.handle(&down(Some(2)), &without, &view);
        assert!(out.is_empty());
        assert_eq!(session.connecting(), None);
        // the pointer-down itself then lands on node 2
        assert_eq!(session.selected(), Some(NodeId(2)));
    }

    #[test]
    fn leave_abandons_drag() {
        let mut session = EditorSession::default();
        let view = ViewTransform::default();
        session.handle(&down(Some(2)), &page(), &view);
        session.handle(&CanvasEvent::Leave, &page(), &view);
        assert_eq!(session.state(), Interaction::Idle);
        assert!(session
            .handle(&CanvasEvent::PointerMove { x: 1.0, y: 1.0 }, &page(), &view)
            .is_empty());
    }
}
