//! The one markup emitter. Live canvas, preview spread, rasterizer input and
//! standalone export all go through [`to_html`].

use crate::view::View;

const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

pub fn to_html(view: &View) -> String {
    let mut out = String::with_capacity(256);
    write_html(view, &mut out);
    out
}

pub fn write_html(view: &View, out: &mut String) {
    match view {
        View::Text { content } => escape_text(content, out),
        View::Element {
            tag,
            classes,
            attributes,
            styles,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            if !classes.is_empty() {
                out.push_str(" class=\"");
                escape_attr(&classes.join(" "), out);
                out.push('"');
            }
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            if !styles.is_empty() {
                out.push_str(" style=\"");
                for (i, (key, value)) in styles.iter().enumerate() {
                    if i > 0 {
                        out.push(';');
                    }
                    out.push_str(key);
                    out.push(':');
                    escape_attr(value, out);
                }
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(tag) {
                return;
            }
            for child in children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

pub fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

pub fn escape_attr(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Escaped copy, for call sites that build strings by hand.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_attr(s, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn emits_classes_attrs_and_styles_in_order() {
        let v = View::div("card")
            .class("open")
            .attr("data-id", "7")
            .style("width", "10px")
            .style("color", "#fff")
            .child(View::text("hi"));
        assert_eq!(
            to_html(&v),
            r#"<div class="card open" data-id="7" style="width:10px;color:#fff">hi</div>"#
        );
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        let v = View::image("a.png", "cover");
        assert_eq!(
            to_html(&v),
            r#"<img class="cover" src="a.png" alt="" draggable="false">"#
        );
    }

    #[test]
    fn user_text_is_escaped() {
        let v = View::div("t")
            .attr("title", "\"quoted\" & 'single'")
            .child(View::text("</script><b>x</b>"));
        assert_eq!(
            to_html(&v),
            "<div class=\"t\" title=\"&quot;quoted&quot; &amp; &#39;single&#39;\">&lt;/script&gt;&lt;b&gt;x&lt;/b&gt;</div>"
        );
    }

    #[test]
    fn style_values_cannot_break_out() {
        let v = View::div("t").style("font-family", "'x\"><script>");
        assert!(!to_html(&v).contains("<script>"));
    }
}
