//! Document model: scrapbooks own pages, pages own nodes and connections.
//!
//! Node order on a page is z-order (later draws on top). Connections are
//! directed, stored per page, and may repeat. The JSON shape matches the
//! documents the browser editor has always written (camelCase keys, `type`
//! beside a free-form `props` object), so a node is serialized by hand and
//! decoded through [`RawNode`].

use crate::geometry::Point;
use crate::id::NodeId;
use crate::props::{NodeKind, NodeProps};
use crate::registry;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub type ScrapbookId = u64;
pub type PageId = u64;

// ─── Nodes ───────────────────────────────────────────────────────────────

/// One placed widget on a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub props: NodeProps,
    /// Background / photo image reference.
    pub img_bg: String,
    /// Optional secondary image some widgets carried historically.
    pub img_top: Option<String>,
    pub is_open: bool,
}

impl Node {
    pub fn new(id: NodeId, props: NodeProps, at: Point, img_bg: impl Into<String>) -> Self {
        Self {
            id,
            x: at.x,
            y: at.y,
            props,
            img_bg: img_bg.into(),
            img_top: None,
            is_open: false,
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.props.kind()
    }

    pub fn type_name(&self) -> &str {
        self.props.type_name()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Point connections attach to.
    pub fn anchor(&self) -> Point {
        self.position().anchor()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    props: Value,
    #[serde(default)]
    img_bg: String,
    #[serde(default)]
    img_top: Option<String>,
    #[serde(default)]
    is_open: bool,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let mut props = NodeProps::from_json(&raw.type_name, &raw.props);
        registry::sanitize(&mut props);
        Node {
            id: raw.id,
            x: raw.x,
            y: raw.y,
            props,
            img_bg: raw.img_bg,
            img_top: raw.img_top,
            is_open: raw.is_open,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.img_top.is_some() { 7 } else { 6 };
        let mut s = serializer.serialize_struct("Node", len)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("type", self.type_name())?;
        s.serialize_field("x", &self.x)?;
        s.serialize_field("y", &self.y)?;
        s.serialize_field("props", &self.props)?;
        s.serialize_field("imgBg", &self.img_bg)?;
        if let Some(top) = &self.img_top {
            s.serialize_field("imgTop", top)?;
        }
        s.serialize_field("isOpen", &self.is_open)?;
        s.end()
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// Directed link `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

impl Connection {
    pub const fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}

// ─── Pages ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Page {
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Remove a node and every connection that touches it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(idx);
        self.connections.retain(|c| !c.touches(id));
        Some(node)
    }

    /// Connections whose endpoints both exist, paired with those endpoints.
    /// Stale edges are skipped, not removed.
    pub fn resolved_connections(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.connections.iter().filter_map(move |c| {
            match (self.node(c.from), self.node(c.to)) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => {
                    log::trace!("skipping stale connection {:?} -> {:?}", c.from, c.to);
                    None
                }
            }
        })
    }

    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.iter().map(|n| n.id).max()
    }
}

// ─── Scrapbooks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapbookStyle {
    #[default]
    Classic,
    SpiralAccordion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrapbook {
    pub id: ScrapbookId,
    pub title: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub style: ScrapbookStyle,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub last_modified: u64,
}

impl Scrapbook {
    /// A new book with `page_count` blank pages. Page ids are `id + i`, so the
    /// caller must reserve that whole id range.
    pub fn new(
        id: ScrapbookId,
        title: impl Into<String>,
        category_id: impl Into<String>,
        page_count: usize,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            cover: format!("https://picsum.photos/seed/{id}/600/400"),
            category_id: category_id.into(),
            style: ScrapbookStyle::Classic,
            pages: (0..page_count as u64).map(|i| Page::new(id + i)).collect(),
            last_modified: now_ms,
        }
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Largest id in use anywhere in the book (book, page or node).
    pub fn max_id(&self) -> u64 {
        let pages = self.pages.iter().map(|p| p.id);
        let nodes = self.pages.iter().filter_map(Page::max_node_id).map(NodeId::get);
        pages.chain(nodes).fold(self.id, u64::max)
    }

    /// Title used for file names; falls back when blank.
    pub fn display_title(&self) -> &str {
        let t = self.title.trim();
        if t.is_empty() { "scrapbook" } else { t }
    }
}

// ─── Categories ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

pub fn default_categories() -> Vec<Category> {
    [
        ("travel", "Travel", "🌍", "#4dabf7"),
        ("life", "Everyday", "🍰", "#ff922b"),
        ("secret", "Secret", "🔒", "#845ef7"),
    ]
    .into_iter()
    .map(|(id, name, icon, color)| Category {
        id: id.into(),
        name: name.into(),
        icon: icon.into(),
        color: color.into(),
    })
    .collect()
}
