//! Canvas input events.
//!
//! Pointer coordinates are screen pixels relative to the canvas's top-left
//! corner. Conversion to logical page units happens in the session, with the
//! [`ViewTransform`] the host reports, and nowhere else.

use sb_core::geometry::{Point, ViewTransform};
use sb_core::id::NodeId;
use sb_core::model::Page;
use sb_core::props::PropValue;

/// One interaction on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Pointer pressed. `target` is the node under the pointer, if any.
    PointerDown { x: f32, y: f32, target: Option<NodeId> },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// The node's "connect" handle was pressed.
    StartConnecting { node: NodeId },
    CancelConnecting,
    /// A palette template was dropped at a screen point.
    Drop {
        kind: String,
        x: f32,
        y: f32,
        overrides: Vec<(String, PropValue)>,
    },
    /// A palette template was clicked; it lands at the configured point.
    PaletteClick {
        kind: String,
        overrides: Vec<(String, PropValue)>,
    },
    /// A widget was clicked (toggles it open or closed).
    Click { node: NodeId },
    /// The node's "delete" handle was pressed.
    DeleteNode { node: NodeId },
    /// The pointer left the editor (or the editor was closed).
    Leave,
}

impl CanvasEvent {
    /// Pointer-down with the target found by hit testing the page, for hosts
    /// that do not resolve targets themselves.
    pub fn pointer_down_at(page: &Page, view: &ViewTransform, x: f32, y: f32) -> Self {
        let target = sb_render::hit_test(page, view.to_logical(x, y));
        CanvasEvent::PointerDown { x, y, target }
    }

    /// Screen position, for pointer events.
    pub fn position(&self) -> Option<Point> {
        match self {
            CanvasEvent::PointerDown { x, y, .. }
            | CanvasEvent::PointerMove { x, y }
            | CanvasEvent::Drop { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{Node, NodeKind, NodeProps};

    #[test]
    fn pointer_down_resolves_target_in_logical_space() {
        let mut page = Page::new(1);
        page.nodes.push(Node::new(
            NodeId(7),
            NodeProps::defaults(NodeKind::Window),
            Point::new(200.0, 200.0),
            "",
        ));
        let half = ViewTransform::uniform(0.5);
        assert_eq!(
            CanvasEvent::pointer_down_at(&page, &half, 110.0, 110.0),
            CanvasEvent::PointerDown { x: 110.0, y: 110.0, target: Some(NodeId(7)) }
        );
        assert_eq!(
            CanvasEvent::pointer_down_at(&page, &half, 10.0, 10.0),
            CanvasEvent::PointerDown { x: 10.0, y: 10.0, target: None }
        );
    }
}
