//! Page composition: connection overlay plus one positioned wrapper per node.
//!
//! The widget markup inside each wrapper is exactly [`describe`]'s output in
//! either context; only the wrapper differs.

use crate::connection::link_layer;
use crate::html::to_html;
use crate::view::{View, px};
use crate::widgets::describe;
use sb_core::id::NodeId;
use sb_core::model::{Node, Page};

/// Where a page is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderContext {
    /// Editor canvas: selection ring, connect/delete handles.
    Interactive {
        selected: Option<NodeId>,
        connecting: Option<NodeId>,
    },
    /// Preview, rasterizer input and exported document.
    #[default]
    Static,
}

impl RenderContext {
    pub fn editing(selected: Option<NodeId>, connecting: Option<NodeId>) -> Self {
        RenderContext::Interactive {
            selected,
            connecting,
        }
    }
}

pub fn node_view(node: &Node, open: bool, ctx: RenderContext) -> View {
    let wrapper = View::div("sb-node")
        .attr("data-node-id", node.id.to_string())
        .style("left", px(node.x))
        .style("top", px(node.y));

    match ctx {
        RenderContext::Static => wrapper.child(describe(node, open)),
        RenderContext::Interactive {
            selected,
            connecting,
        } => wrapper
            .when(selected == Some(node.id), |v| v.class("sb-selected"))
            .when(connecting == Some(node.id), |v| v.class("sb-link-source"))
            .when(connecting.is_some_and(|src| src != node.id), |v| {
                v.class("sb-link-target")
            })
            .child(
                View::div("sb-node-inner")
                    .child(describe(node, open))
                    .child(
                        View::div("sb-tools")
                            .child(tool_button("connect", "Connect", "🔗"))
                            .child(tool_button("delete", "Delete", "🗑")),
                    ),
            ),
    }
}

fn tool_button(action: &'static str, title: &'static str, glyph: &'static str) -> View {
    View::element("button")
        .attr("type", "button")
        .attr("data-action", action)
        .attr("title", title)
        .child(View::text(glyph))
}

/// Full page in stored state (`isOpen` as saved on each node).
pub fn page_view(page: &Page, ctx: RenderContext) -> View {
    View::div("sb-page")
        .attr("data-page-id", page.id.to_string())
        .child(link_layer(page))
        .children(page.nodes.iter().map(|n| node_view(n, n.is_open, ctx)))
}

pub fn page_html(page: &Page, ctx: RenderContext) -> String {
    to_html(&page_view(page, ctx))
}
