//! Document store: the scrapbook shelf and structural page updates.
//!
//! Every edit is expressed as a [`PageMutation`] aimed at one
//! `(scrapbook, page index)` pair. The mutation runs against a copy of the
//! page and the copy replaces the stored page in a single assignment, so a
//! reader never observes a half-applied edit and a failed mutation leaves
//! the page exactly as it was.

use sb_core::geometry::Point;
use sb_core::id::{IdAllocator, NodeId};
use sb_core::model::{Connection, Node, Page, Scrapbook, ScrapbookId, ScrapbookStyle};
use sb_core::props::{NodeProps, PropError, PropValue};
use sb_core::registry;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("no scrapbook with id {0}")]
    UnknownScrapbook(ScrapbookId),
    #[error("no scrapbook is open")]
    NoScrapbookOpen,
    #[error("page {index} is out of range ({count} pages)")]
    PageOutOfRange { index: usize, count: usize },
    #[error("page {0} is not on screen")]
    PageNotShown(usize),
    #[error("no node {0} on this page")]
    UnknownNode(NodeId),
    #[error("node {0} is already on this page")]
    DuplicateNode(NodeId),
    #[error("a node cannot be connected to itself ({0})")]
    SelfLoop(NodeId),
    #[error("the scrapbook is open read-only")]
    ReadOnly,
    #[error(transparent)]
    Prop(#[from] PropError),
}

/// Partial update of a node's own fields (not its props).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub img_bg: Option<String>,
    /// `Some(None)` clears the secondary image.
    pub img_top: Option<Option<String>>,
}

impl NodePatch {
    pub fn position(at: Point) -> Self {
        Self {
            x: Some(at.x),
            y: Some(at.y),
            ..Self::default()
        }
    }

    fn apply(self, node: &mut Node) {
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            node.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            node.y = y;
        }
        if let Some(img) = self.img_bg {
            node.img_bg = img;
        }
        if let Some(top) = self.img_top {
            node.img_top = top;
        }
    }
}

/// A structural edit of one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMutation {
    /// Insert a fully formed node (pasted or restored).
    AddNode { node: Node },
    /// Insert a new node; the store assigns its id and placeholder photo.
    CreateNode { props: NodeProps, at: Point },
    MoveNode { id: NodeId, x: f32, y: f32 },
    UpdateNode { id: NodeId, patch: NodePatch },
    /// Set props, each value held to its template's declared domain.
    UpdateProps { id: NodeId, values: Vec<(String, PropValue)> },
    /// Delete a node and every connection touching it.
    RemoveNode { id: NodeId },
    AddConnection { from: NodeId, to: NodeId },
    ToggleOpen { id: NodeId },
    /// Replace the page wholesale.
    SetPage { page: Page },
}

impl PageMutation {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            PageMutation::AddNode { .. } => "add node",
            PageMutation::CreateNode { .. } => "create node",
            PageMutation::MoveNode { .. } => "move node",
            PageMutation::UpdateNode { .. } => "update node",
            PageMutation::UpdateProps { .. } => "update props",
            PageMutation::RemoveNode { .. } => "remove node",
            PageMutation::AddConnection { .. } => "add connection",
            PageMutation::ToggleOpen { .. } => "toggle open",
            PageMutation::SetPage { .. } => "set page",
        }
    }

    /// Whether a read-only (preview) session may issue this mutation.
    pub fn allowed_in_preview(&self) -> bool {
        matches!(self, PageMutation::ToggleOpen { .. })
    }

    /// Apply to `page` in place. Returns the id of a node this created.
    fn apply(self, page: &mut Page, ids: &mut IdAllocator, now_ms: u64) -> Result<Option<NodeId>, DocumentError> {
        match self {
            PageMutation::AddNode { node } => {
                if page.contains(node.id) {
                    return Err(DocumentError::DuplicateNode(node.id));
                }
                ids.observe(node.id.get());
                let id = node.id;
                page.nodes.push(node);
                Ok(Some(id))
            }
            PageMutation::CreateNode { props, at } => {
                let id = ids.next_node_id(now_ms);
                let photo = format!("https://picsum.photos/seed/{id}/400/300");
                page.nodes.push(Node::new(id, props, at, photo));
                Ok(Some(id))
            }
            PageMutation::MoveNode { id, x, y } => {
                let node = page.node_mut(id).ok_or(DocumentError::UnknownNode(id))?;
                NodePatch::position(Point::new(x, y)).apply(node);
                Ok(None)
            }
            PageMutation::UpdateNode { id, patch } => {
                let node = page.node_mut(id).ok_or(DocumentError::UnknownNode(id))?;
                patch.apply(node);
                Ok(None)
            }
            PageMutation::UpdateProps { id, values } => {
                let node = page.node_mut(id).ok_or(DocumentError::UnknownNode(id))?;
                let template = registry::lookup(node.type_name());
                for (key, value) in values {
                    let value = match template {
                        Some(t) => t.coerce(&key, value)?,
                        None => value,
                    };
                    node.props.set(&key, value)?;
                }
                Ok(None)
            }
            PageMutation::RemoveNode { id } => {
                page.remove_node(id).ok_or(DocumentError::UnknownNode(id))?;
                Ok(None)
            }
            PageMutation::AddConnection { from, to } => {
                if from == to {
                    return Err(DocumentError::SelfLoop(from));
                }
                for id in [from, to] {
                    if !page.contains(id) {
                        return Err(DocumentError::UnknownNode(id));
                    }
                }
                page.connections.push(Connection::new(from, to));
                Ok(None)
            }
            PageMutation::ToggleOpen { id } => {
                let node = page.node_mut(id).ok_or(DocumentError::UnknownNode(id))?;
                node.is_open = !node.is_open;
                Ok(None)
            }
            PageMutation::SetPage { page: replacement } => {
                if let Some(max) = replacement.max_node_id() {
                    ids.observe(max.get());
                }
                *page = replacement;
                Ok(None)
            }
        }
    }
}

/// Owner of every scrapbook. The single place documents are mutated.
#[derive(Debug, Default)]
pub struct DocumentStore {
    books: Vec<Scrapbook>,
    ids: IdAllocator,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt previously saved scrapbooks. New ids are allocated above every
    /// id they already use.
    pub fn from_books(books: Vec<Scrapbook>) -> Self {
        let mut ids = IdAllocator::new();
        for book in &books {
            ids.observe(book.max_id());
        }
        Self { books, ids }
    }

    /// Newest first.
    pub fn books(&self) -> &[Scrapbook] {
        &self.books
    }

    pub fn get(&self, id: ScrapbookId) -> Option<&Scrapbook> {
        self.books.iter().find(|b| b.id == id)
    }

    fn book_mut(&mut self, id: ScrapbookId) -> Result<&mut Scrapbook, DocumentError> {
        self.books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(DocumentError::UnknownScrapbook(id))
    }

    pub fn page(&self, book: ScrapbookId, index: usize) -> Result<&Page, DocumentError> {
        let book = self.get(book).ok_or(DocumentError::UnknownScrapbook(book))?;
        book.page(index).ok_or(DocumentError::PageOutOfRange {
            index,
            count: book.page_count(),
        })
    }

    /// Allocate a node id outside of a mutation (for hosts building nodes).
    pub fn allocate_node_id(&mut self, now_ms: u64) -> NodeId {
        self.ids.next_node_id(now_ms)
    }

    // ─── Shelf ───────────────────────────────────────────────────────────

    /// Create a scrapbook with `page_count` blank pages and put it first on
    /// the shelf.
    pub fn create_scrapbook(
        &mut self,
        title: &str,
        category: &str,
        page_count: usize,
        now_ms: u64,
    ) -> ScrapbookId {
        // the book id and its page ids `id + i` come from one block
        let id = self.ids.next_block(now_ms, page_count.max(1) as u64);
        self.books
            .insert(0, Scrapbook::new(id, title, category, page_count, now_ms));
        log::debug!("created scrapbook {id} with {page_count} pages");
        id
    }

    pub fn delete_scrapbook(&mut self, id: ScrapbookId) -> Result<Scrapbook, DocumentError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(DocumentError::UnknownScrapbook(id))?;
        Ok(self.books.remove(index))
    }

    pub fn rename_scrapbook(&mut self, id: ScrapbookId, title: &str, now_ms: u64) -> Result<(), DocumentError> {
        let book = self.book_mut(id)?;
        book.title = title.to_owned();
        book.last_modified = now_ms;
        Ok(())
    }

    pub fn set_style(&mut self, id: ScrapbookId, style: ScrapbookStyle, now_ms: u64) -> Result<(), DocumentError> {
        let book = self.book_mut(id)?;
        book.style = style;
        book.last_modified = now_ms;
        Ok(())
    }

    pub fn set_category(&mut self, id: ScrapbookId, category: &str, now_ms: u64) -> Result<(), DocumentError> {
        let book = self.book_mut(id)?;
        book.category_id = category.to_owned();
        book.last_modified = now_ms;
        Ok(())
    }

    /// Append a blank page and return its index.
    pub fn add_page(&mut self, id: ScrapbookId, now_ms: u64) -> Result<usize, DocumentError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == id)
            .ok_or(DocumentError::UnknownScrapbook(id))?;
        let page_id = self.ids.next(now_ms);
        let book = &mut self.books[index];
        book.pages.push(Page::new(page_id));
        book.last_modified = now_ms;
        Ok(book.pages.len() - 1)
    }

    // ─── Pages ───────────────────────────────────────────────────────────

    /// Apply `mutation` to page `index` of scrapbook `book` atomically.
    /// Returns the id of the node the mutation created, if any.
    pub fn apply(
        &mut self,
        book: ScrapbookId,
        index: usize,
        mutation: PageMutation,
        now_ms: u64,
    ) -> Result<Option<NodeId>, DocumentError> {
        let label = mutation.label();
        let mut ids = self.ids.clone();
        let target = self.book_mut(book)?;
        let count = target.page_count();
        let mut draft = target
            .page(index)
            .cloned()
            .ok_or(DocumentError::PageOutOfRange { index, count })?;

        let created = mutation.apply(&mut draft, &mut ids, now_ms)?;

        target.pages[index] = draft;
        target.last_modified = now_ms;
        self.ids = ids;
        log::trace!("{label} on scrapbook {book} page {index}");
        Ok(created)
    }

    /// Apply several mutations in order, each atomically. Stops at the
    /// first failure; earlier ones stay applied.
    pub fn apply_all(
        &mut self,
        book: ScrapbookId,
        index: usize,
        mutations: impl IntoIterator<Item = PageMutation>,
        now_ms: u64,
    ) -> Result<Option<NodeId>, DocumentError> {
        let mut created = None;
        for mutation in mutations {
            if let Some(id) = self.apply(book, index, mutation, now_ms)? {
                created = Some(id);
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sb_core::NodeKind;

    fn store_with_book() -> (DocumentStore, ScrapbookId) {
        let mut store = DocumentStore::new();
        let id = store.create_scrapbook("Trip", "travel", 4, 1_000);
        (store, id)
    }

    fn create(store: &mut DocumentStore, book: ScrapbookId, kind: NodeKind, now: u64) -> NodeId {
        store
            .apply(
                book,
                0,
                PageMutation::CreateNode {
                    props: NodeProps::defaults(kind),
                    at: Point::new(10.0, 20.0),
                },
                now,
            )
            .unwrap()
            .unwrap()
    }

    #[test]
    fn fresh_scrapbook_has_four_blank_pages() {
        let (store, id) = store_with_book();
        let book = store.get(id).unwrap();
        assert_eq!(book.page_count(), 4);
        assert!(book.pages.iter().all(Page::is_blank));
        let page_ids: Vec<_> = book.pages.iter().map(|p| p.id).collect();
        assert_eq!(page_ids, vec![id, id + 1, id + 2, id + 3]);
    }

    #[test]
    fn new_books_do_not_reuse_page_ids() {
        let mut store = DocumentStore::new();
        let a = store.create_scrapbook("A", "life", 4, 1_000);
        let b = store.create_scrapbook("B", "life", 4, 1_000);
        assert!(b >= a + 4);
        assert_eq!(store.books()[0].id, b);
    }

    #[test]
    fn same_millisecond_nodes_get_distinct_ids() {
        let (mut store, book) = store_with_book();
        let a = create(&mut store, book, NodeKind::Text, 5_000);
        let b = create(&mut store, book, NodeKind::Text, 5_000);
        assert_ne!(a, b);
        let page = store.page(book, 0).unwrap();
        assert_eq!(page.nodes.len(), 2);
        assert_eq!(page.node(a).unwrap().img_bg, format!("https://picsum.photos/seed/{a}/400/300"));
    }

    #[test]
    fn mutations_bump_last_modified() {
        let (mut store, book) = store_with_book();
        create(&mut store, book, NodeKind::Sticker, 7_000);
        assert_eq!(store.get(book).unwrap().last_modified, 7_000);
    }

    #[test]
    fn remove_node_prunes_its_connections() {
        let (mut store, book) = store_with_book();
        let a = create(&mut store, book, NodeKind::Window, 1);
        let b = create(&mut store, book, NodeKind::Window, 2);
        let c = create(&mut store, book, NodeKind::Window, 3);
        for (from, to) in [(a, b), (b, c), (c, a)] {
            store
                .apply(book, 0, PageMutation::AddConnection { from, to }, 4)
                .unwrap();
        }
        store.apply(book, 0, PageMutation::RemoveNode { id: a }, 5).unwrap();
        let page = store.page(book, 0).unwrap();
        assert_eq!(page.nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(page.connections, vec![Connection::new(b, c)]);
    }

    #[test]
    fn self_loop_is_rejected_and_page_untouched() {
        let (mut store, book) = store_with_book();
        let a = create(&mut store, book, NodeKind::Drawer, 1);
        let before = store.page(book, 0).unwrap().clone();
        let err = store
            .apply(book, 0, PageMutation::AddConnection { from: a, to: a }, 9)
            .unwrap_err();
        assert_eq!(err, DocumentError::SelfLoop(a));
        assert_eq!(store.page(book, 0).unwrap(), &before);
        assert_eq!(store.get(book).unwrap().last_modified, 1);
    }

    #[test]
    fn duplicate_connections_are_kept() {
        let (mut store, book) = store_with_book();
        let a = create(&mut store, book, NodeKind::Drawer, 1);
        let b = create(&mut store, book, NodeKind::Drawer, 2);
        for _ in 0..2 {
            store
                .apply(book, 0, PageMutation::AddConnection { from: a, to: b }, 3)
                .unwrap();
        }
        assert_eq!(store.page(book, 0).unwrap().connections.len(), 2);
    }

    #[test]
    fn failed_prop_update_changes_nothing() {
        let (mut store, book) = store_with_book();
        let id = create(&mut store, book, NodeKind::Text, 1);
        let err = store
            .apply(
                book,
                0,
                PageMutation::UpdateProps {
                    id,
                    values: vec![
                        ("fontSize".into(), PropValue::Num(30.0)),
                        ("color".into(), PropValue::from("not a colour")),
                    ],
                },
                2,
            )
            .unwrap_err();
        assert!(matches!(err, DocumentError::Prop(PropError::InvalidColor { .. })));
        let node = store.page(book, 0).unwrap().node(id).unwrap();
        assert_eq!(node.props.get("fontSize"), Some(PropValue::Num(24.0)));
    }

    #[test]
    fn prop_updates_are_clamped() {
        let (mut store, book) = store_with_book();
        let id = create(&mut store, book, NodeKind::Sticker, 1);
        store
            .apply(
                book,
                0,
                PageMutation::UpdateProps {
                    id,
                    values: vec![("size".into(), PropValue::Num(10_000.0))],
                },
                2,
            )
            .unwrap();
        let node = store.page(book, 0).unwrap().node(id).unwrap();
        let max = registry::lookup("sticker")
            .and_then(|t| t.prop("size"))
            .map(|d| match d.control {
                registry::PropControl::Range { max, .. } => max,
                _ => unreachable!(),
            })
            .unwrap();
        assert_eq!(node.props.get("size"), Some(PropValue::Num(max)));
    }

    #[test]
    fn toggle_twice_restores_node() {
        let (mut store, book) = store_with_book();
        let id = create(&mut store, book, NodeKind::Envelope, 1);
        let before = store.page(book, 0).unwrap().clone();
        for _ in 0..2 {
            store.apply(book, 0, PageMutation::ToggleOpen { id }, 2).unwrap();
        }
        assert_eq!(store.page(book, 0).unwrap(), &before);
    }

    #[test]
    fn out_of_range_page_is_an_error() {
        let (mut store, book) = store_with_book();
        let err = store
            .apply(book, 9, PageMutation::ToggleOpen { id: NodeId(1) }, 1)
            .unwrap_err();
        assert_eq!(err, DocumentError::PageOutOfRange { index: 9, count: 4 });
        assert_eq!(
            store.apply(42, 0, PageMutation::ToggleOpen { id: NodeId(1) }, 1),
            Err(DocumentError::UnknownScrapbook(42))
        );
    }

    #[test]
    fn shelf_operations() {
        let (mut store, book) = store_with_book();
        store.rename_scrapbook(book, "Paris", 2).unwrap();
        store.set_style(book, ScrapbookStyle::SpiralAccordion, 3).unwrap();
        store.set_category(book, "secret", 4).unwrap();
        assert_eq!(store.add_page(book, 5).unwrap(), 4);
        let b = store.get(book).unwrap();
        assert_eq!(b.title, "Paris");
        assert_eq!(b.style, ScrapbookStyle::SpiralAccordion);
        assert_eq!(b.category_id, "secret");
        assert_eq!(b.last_modified, 5);
        let ids: Vec<_> = b.pages.iter().map(|p| p.id).collect();
        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(ids, unique);

        store.delete_scrapbook(book).unwrap();
        assert!(store.get(book).is_none());
        assert_eq!(store.delete_scrapbook(book), Err(DocumentError::UnknownScrapbook(book)));
    }

    #[test]
    fn failed_add_page_does_not_spend_an_id() {
        let mut store = DocumentStore::new();
        assert_eq!(store.add_page(42, 100), Err(DocumentError::UnknownScrapbook(42)));
        assert_eq!(store.allocate_node_id(100), NodeId(100));
    }

    #[test]
    fn loaded_books_push_the_allocator_forward() {
        let mut old = Scrapbook::new(10, "Old", "life", 2, 0);
        old.pages[0].nodes.push(Node::new(
            NodeId(9_999),
            NodeProps::defaults(NodeKind::Text),
            Point::default(),
            "",
        ));
        let mut store = DocumentStore::from_books(vec![old]);
        assert!(store.allocate_node_id(5).get() > 9_999);
    }
}
