//! Declarative view tree.
//!
//! Widgets describe themselves as a `View`; every host turns that same value
//! into markup through [`crate::html::to_html`]. Attributes and styles keep
//! insertion order so the emitted bytes are stable.

use serde::Serialize;
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum View {
    Element {
        tag: &'static str,
        classes: SmallVec<[&'static str; 2]>,
        attributes: Vec<(&'static str, String)>,
        styles: Vec<(&'static str, String)>,
        children: Vec<View>,
    },
    Text {
        content: String,
    },
}

impl View {
    pub fn element(tag: &'static str) -> Self {
        View::Element {
            tag,
            classes: SmallVec::new(),
            attributes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<div class="…">`, the common case.
    pub fn div(class: &'static str) -> Self {
        View::element("div").class(class)
    }

    pub fn text(content: impl Into<String>) -> Self {
        View::Text {
            content: content.into(),
        }
    }

    /// `<img>` filling its box.
    pub fn image(src: impl Into<String>, class: &'static str) -> Self {
        View::element("img")
            .class(class)
            .attr("src", src)
            .attr("alt", "")
            .attr("draggable", "false")
    }

    pub fn class(mut self, class: &'static str) -> Self {
        if let View::Element { ref mut classes, .. } = self
            && !classes.contains(&class)
        {
            classes.push(class);
        }
        self
    }

    /// Set an attribute; setting the same key again replaces the value.
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        if let View::Element { ref mut attributes, .. } = self {
            let value = value.into();
            match attributes.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => attributes.push((key, value)),
            }
        }
        self
    }

    pub fn style(mut self, key: &'static str, value: impl Into<String>) -> Self {
        if let View::Element { ref mut styles, .. } = self {
            let value = value.into();
            match styles.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => styles.push((key, value)),
            }
        }
        self
    }

    pub fn child(mut self, child: View) -> Self {
        if let View::Element { ref mut children, .. } = self {
            children.push(child);
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = View>) -> Self {
        if let View::Element { ref mut children, .. } = self {
            children.extend(new_children);
        }
        self
    }

    /// Apply `f` only when `cond` holds. Keeps conditional branches inline.
    pub fn when(self, cond: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if cond { f(self) } else { self }
    }

    pub fn child_if(self, cond: bool, child: impl FnOnce() -> View) -> Self {
        if cond { self.child(child()) } else { self }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        match self {
            View::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str()),
            View::Text { .. } => None,
        }
    }

    pub fn get_style(&self, key: &str) -> Option<&str> {
        match self {
            View::Element { styles, .. } => styles
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str()),
            View::Text { .. } => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        matches!(self, View::Element { classes, .. } if classes.iter().any(|c| *c == class))
    }

    /// Depth-first search for the first element carrying `class`.
    pub fn find_class(&self, class: &str) -> Option<&View> {
        if self.has_class(class) {
            return Some(self);
        }
        match self {
            View::Element { children, .. } => children.iter().find_map(|c| c.find_class(class)),
            View::Text { .. } => None,
        }
    }

    /// Concatenated text content.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            View::Text { content } => out.push_str(content),
            View::Element { children, .. } => children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

/// `12px`, without a trailing `.0` for whole numbers.
pub fn px(n: f32) -> String {
    format!("{}px", num(n))
}

/// Compact, deterministic number formatting for CSS values.
pub fn num(n: f32) -> String {
    let r = (n * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_owned() } else { format!("{r}") }
}
