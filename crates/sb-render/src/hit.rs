//! Hit testing: logical point → node lookup.
//!
//! Walks the page's nodes back to front (last painted = topmost) against
//! each widget's nominal footprint.

use kurbo::{Point as KPoint, Rect};
use sb_core::geometry::Point;
use sb_core::id::NodeId;
use sb_core::model::{Node, Page};
use sb_core::props::NodeProps;

/// Nominal box a widget occupies in logical units, in its current state.
pub fn footprint(node: &Node) -> Rect {
    let open = node.is_open;
    let (w, h) = match &node.props {
        NodeProps::Text(p) => (p.width, p.font_size * 1.2 + p.padding * 2.0 + p.border_width * 2.0),
        NodeProps::Sticker(p) => (p.size * 1.2, p.size * 1.2),
        NodeProps::FilmRoll(p) => (p.width, p.height),
        NodeProps::Envelope(p) => (p.w, p.h),
        NodeProps::Record(p) => (p.width, p.height),
        NodeProps::Drawer(p) => (p.width, p.height),
        NodeProps::FlipBox(p) => (p.width, p.height),
        NodeProps::News(p) if open => (p.width, p.height),
        NodeProps::News(p) => (p.width * 0.6, p.height * 0.4),
        NodeProps::Accordion(p) if open => (p.width, p.height),
        NodeProps::Accordion(p) => (40.0, p.height),
        NodeProps::Wanted(p) => (p.width, p.height),
        NodeProps::Suit(p) => (p.width, p.height),
        NodeProps::Window(p) => (p.width, p.height),
        // square photo inside 12px borders plus the caption strip
        NodeProps::Polaroid(p) => (p.width, p.width + 20.0),
        NodeProps::Custom(_) => (120.0, 56.0),
    };
    Rect::new(
        node.x as f64,
        node.y as f64,
        (node.x + w) as f64,
        (node.y + h) as f64,
    )
}

/// Topmost node under `at`, or `None` for empty canvas.
pub fn hit_test(page: &Page, at: Point) -> Option<NodeId> {
    let p = KPoint::new(at.x as f64, at.y as f64);
    page.nodes
        .iter()
        .rev()
        .find(|n| footprint(n).contains(p))
        .map(|n| n.id)
}
