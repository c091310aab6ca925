//! Connection curves between nodes.
//!
//! Each edge is a cubic from the source anchor to the target anchor with
//! both control points on the horizontal midpoint, drawn dashed with an
//! arrowhead at the target end.

use crate::view::{View, num};
use kurbo::{BezPath, PathEl, Point as KPoint};
use sb_core::geometry::{PAGE_HEIGHT, PAGE_WIDTH, Point};
use sb_core::model::Page;

pub const LINK_COLOR: &str = "#6366f1";
const ARROW_ID: &str = "sb-arrow";

fn kp(p: Point) -> KPoint {
    KPoint::new(p.x as f64, p.y as f64)
}

/// Curve between two anchor points.
pub fn link_path(from: Point, to: Point) -> BezPath {
    let mid = (from.x + to.x) / 2.0;
    let mut path = BezPath::new();
    path.move_to(kp(from));
    path.curve_to(
        kp(Point::new(mid, from.y)),
        kp(Point::new(mid, to.y)),
        kp(to),
    );
    path
}

/// SVG path data with compact numbers.
pub fn path_data(path: &BezPath) -> String {
    let p = |pt: KPoint| format!("{} {}", num(pt.x as f32), num(pt.y as f32));
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(a) => format!("M {}", p(a)),
            PathEl::LineTo(a) => format!("L {}", p(a)),
            PathEl::QuadTo(a, b) => format!("Q {}, {}", p(a), p(b)),
            PathEl::CurveTo(a, b, c) => format!("C {}, {}, {}", p(a), p(b), p(c)),
            PathEl::ClosePath => "Z".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Overlay with one curve per resolvable connection on `page`.
pub fn link_layer(page: &Page) -> View {
    let marker = View::element("marker")
        .attr("id", ARROW_ID)
        .attr("markerWidth", "10")
        .attr("markerHeight", "7")
        .attr("refX", "9")
        .attr("refY", "3.5")
        .attr("orient", "auto")
        .child(
            View::element("polygon")
                .attr("points", "0 0, 10 3.5, 0 7")
                .attr("fill", LINK_COLOR),
        );

    let paths = page.resolved_connections().map(|(from, to)| {
        View::element("path")
            .attr("d", path_data(&link_path(from.anchor(), to.anchor())))
            .attr("stroke", LINK_COLOR)
            .attr("stroke-width", "2")
            .attr("stroke-dasharray", "4,4")
            .attr("fill", "none")
            .attr("marker-end", format!("url(#{ARROW_ID})"))
    });

    View::element("svg")
        .class("sb-links")
        .attr("viewBox", format!("0 0 {} {}", num(PAGE_WIDTH), num(PAGE_HEIGHT)))
        .child(View::element("defs").child(marker))
        .children(paths)
}
