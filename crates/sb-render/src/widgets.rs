//! Type → visual mapping for every widget.
//!
//! [`describe`] is pure: the same node and `open` flag always yield the same
//! [`View`]. Geometry and colours come from the typed props; everything else
//! is a class defined in [`STYLESHEET`]. Toggle-able widgets mark their root
//! with `data-toggle` so hosts know where a click flips `isOpen`.

use crate::view::{View, num, px};
use sb_core::is_image_ref;
use sb_core::model::Node;
use sb_core::props::*;

/// Shared widget CSS. Both the editor page and the exported document embed it.
pub const STYLESHEET: &str = include_str!("widgets.css");

const PATTERN_KRAFT: &str = "url(\"https://www.transparenttextures.com/patterns/creampaper.png\")";
const PATTERN_NOISE: &str = "url(\"https://www.transparenttextures.com/patterns/60-lines.png\")";
const PATTERN_NEWSPAPER: &str =
    "url(\"https://www.transparenttextures.com/patterns/pinstriped-suit.png\")";
const PATTERN_GRID: &str = "url(\"https://www.transparenttextures.com/patterns/grid-me.png\")";

/// Describe `node` in its closed (`open = false`) or revealed state.
pub fn describe(node: &Node, open: bool) -> View {
    match &node.props {
        NodeProps::Text(p) => text(p),
        NodeProps::Sticker(p) => sticker(p),
        NodeProps::FilmRoll(p) => film_roll(p, &node.img_bg, open),
        NodeProps::Envelope(p) => envelope(p, &node.img_bg, open),
        NodeProps::Record(p) => record(p, &node.img_bg, open),
        NodeProps::Drawer(p) => drawer(p, &node.img_bg, open),
        NodeProps::FlipBox(p) => flip_box(p, &node.img_bg, open),
        NodeProps::News(p) => news(p, &node.img_bg, open),
        NodeProps::Accordion(p) => accordion(p, &node.img_bg, open),
        NodeProps::Wanted(p) => wanted(p, &node.img_bg, open),
        NodeProps::Suit(p) => suit(p, &node.img_bg, open),
        NodeProps::Window(p) => window(p, &node.img_bg, open),
        NodeProps::Polaroid(p) => polaroid(p, &node.img_bg, open),
        NodeProps::Custom(c) => custom(&c.type_name, open),
    }
}

/// Whether clicking the widget flips `isOpen`. Text and stickers have no
/// revealed state.
pub fn toggles(props: &NodeProps) -> bool {
    !matches!(props, NodeProps::Text(_) | NodeProps::Sticker(_))
}

fn toggle_root(class: &'static str) -> View {
    View::div(class).attr("data-toggle", "")
}

fn font_stack(family: &str) -> String {
    match family {
        "sans-serif" | "serif" | "monospace" | "cursive" => family.to_owned(),
        "Shadows Into Light" => "'Shadows Into Light', cursive".to_owned(),
        "Space Mono" => "'Space Mono', monospace".to_owned(),
        other => format!("'{other}', sans-serif"),
    }
}

fn pattern(name: &str) -> &'static str {
    match name {
        "kraft" => PATTERN_KRAFT,
        "noise" => PATTERN_NOISE,
        "newspaper" => PATTERN_NEWSPAPER,
        "grid" => PATTERN_GRID,
        _ => "none",
    }
}

fn cover(src: &str) -> View {
    View::image(src, "sb-cover")
}

// ─── Static widgets ──────────────────────────────────────────────────────

fn text(p: &TextProps) -> View {
    View::div("sb-text")
        .style("font-size", px(p.font_size))
        .style("color", &p.color)
        .style("font-family", font_stack(&p.font_family))
        .style("width", px(p.width))
        .style("padding", px(p.padding))
        .style("background-color", &p.bg_color)
        .style("background-image", pattern(&p.bg_pattern))
        .style("border-color", &p.border_color)
        .style("border-width", px(p.border_width))
        .style("border-style", &p.border_style)
        .style("border-radius", px(p.border_radius))
        .child(View::text(&p.text))
}

fn sticker(p: &StickerProps) -> View {
    let frame = View::div("sb-sticker")
        .style("transform", format!("rotate({}deg)", num(p.rotate)))
        .style("width", px(p.size * 1.2))
        .style("height", px(p.size * 1.2));
    if is_image_ref(&p.sticker) {
        frame.child(View::image(&p.sticker, "sb-contain"))
    } else {
        frame.child(
            View::element("span")
                .class("sb-emoji")
                .style("font-size", px(p.size))
                .child(View::text(&p.sticker)),
        )
    }
}

// ─── Reveal widgets ──────────────────────────────────────────────────────

fn film_roll(p: &FilmRollProps, img_bg: &str, open: bool) -> View {
    let frames: Vec<&str> = if p.images.is_empty() {
        Some(img_bg).filter(|s| !s.is_empty()).into_iter().collect()
    } else {
        p.images.iter().collect()
    };
    let frame_side = px(p.height * 0.6);
    let strip_width = frames.len() as f32 * (p.height * 0.75) + 40.0;

    toggle_root("sb-film")
        .child(
            View::div("sb-film-can")
                .style("background-color", &p.color)
                .style("width", px(p.width))
                .style("height", px(p.height))
                .child(View::div("sb-film-cap").class("sb-top"))
                .child(
                    View::div("sb-film-label")
                        .child(
                            View::element("span")
                                .class("sb-film-title")
                                .style("font-size", px(p.width * 0.15))
                                .child(View::text(&p.title)),
                        )
                        .child(
                            View::element("span")
                                .class("sb-film-subtitle")
                                .child(View::text(&p.subtitle)),
                        ),
                )
                .child(View::div("sb-film-cap").class("sb-bottom")),
        )
        .child(
            View::div("sb-film-strip")
                .style("width", if open { px(strip_width) } else { "0px".into() })
                .style("opacity", if open { "1" } else { "0" })
                .child(View::div("sb-film-frames").children(frames.into_iter().map(|src| {
                    View::div("sb-film-frame")
                        .style("width", frame_side.clone())
                        .style("height", frame_side.clone())
                        .child(cover(src))
                }))),
        )
}

fn envelope(p: &EnvelopeProps, img_bg: &str, open: bool) -> View {
    let side_text = |class: &'static str| {
        View::div("sb-envelope-side")
            .class(class)
            .child(View::text("Shakespeare's Wild Sisters Group"))
    };

    toggle_root("sb-envelope")
        .style("width", px(p.w))
        .style("height", px(p.h))
        .child(View::div("sb-envelope-back").style("background-color", &p.color))
        .child(
            View::div("sb-letter")
                .class(if open { "sb-letter-out" } else { "sb-letter-in" })
                .style("font-family", font_stack(&p.font_family))
                .style("font-size", px(p.font_size))
                .style("color", &p.text_color)
                .child(View::div("sb-letter-texture"))
                .child(View::div("sb-letter-text").child(View::text(&p.letter_text)))
                .child_if(!img_bg.is_empty(), || {
                    View::div("sb-letter-photo").child(cover(img_bg))
                }),
        )
        .child(
            View::div("sb-envelope-front")
                .style("background-color", &p.color)
                .child(View::div("sb-envelope-rule").class("sb-top"))
                .child(View::div("sb-envelope-rule").class("sb-bottom"))
                .child(side_text("sb-left"))
                .child(side_text("sb-right"))
                .child(
                    View::div("sb-envelope-crest")
                        .child(View::div("sb-envelope-logo").child(View::text("SWSG")))
                        .child(View::div("sb-envelope-bar"))
                        .child(
                            View::div("sb-envelope-private")
                                .child(View::text("Private & Confidential")),
                        ),
                )
                .child(
                    View::div("sb-stamp")
                        .child(View::element("span").child(View::text("AIR MAIL"))),
                )
                .child(
                    View::div("sb-seal")
                        .when(open, |v| v.class("sb-seal-broken"))
                        .child(View::text("♥")),
                ),
        )
}

fn record(p: &RecordProps, img_bg: &str, open: bool) -> View {
    let disc = px(p.width * 0.6);
    toggle_root("sb-record")
        .attr("data-audio", &p.audio_url)
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(View::div("sb-record-body").style("background-color", &p.color))
        .child(
            View::div("sb-record-deck")
                .child(
                    View::div("sb-disc")
                        .when(open, |v| v.class("sb-spin"))
                        .style("width", disc.clone())
                        .style("height", disc)
                        .child(View::div("sb-disc-label").child(cover(img_bg))),
                )
                .child(
                    View::div("sb-record-side").child(
                        View::div("sb-record-title")
                            .child(View::text(if open { "Playing..." } else { p.title.as_str() })),
                    ),
                ),
        )
}

fn drawer(p: &DrawerProps, img_bg: &str, open: bool) -> View {
    toggle_root("sb-drawer")
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(
            View::div("sb-drawer-box")
                .style("background-color", &p.color)
                .child(View::element("span").class("sb-label").child(View::text(&p.title)))
                .child(View::div("sb-drawer-pull")),
        )
        .child(
            View::div("sb-drawer-tray")
                .style("width", if open { "90%" } else { "0" })
                .style("transform", if open { "translateX(90%)" } else { "translateX(0)" })
                .style("opacity", if open { "1" } else { "0" })
                .child(cover(img_bg)),
        )
}

fn flip_box(p: &FlipBoxProps, img_bg: &str, open: bool) -> View {
    toggle_root("sb-flip")
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(
            View::div("sb-flip-inner")
                .style("transform", if open { "rotateY(180deg)" } else { "rotateY(0)" })
                .child(
                    View::div("sb-flip-face")
                        .class("sb-front")
                        .style("background-color", &p.color)
                        .child(View::element("span").class("sb-star").child(View::text("★")))
                        .child(
                            View::element("span")
                                .class("sb-flip-title")
                                .child(View::text(&p.title)),
                        ),
                )
                .child(View::div("sb-flip-face").class("sb-back").child(cover(img_bg))),
        )
}

fn news(p: &NewsProps, img_bg: &str, open: bool) -> View {
    let line = |w: &'static str| View::div("sb-news-line").style("width", w);
    let (w, h) = if open {
        (p.width, p.height)
    } else {
        (p.width * 0.6, p.height * 0.4)
    };
    toggle_root("sb-news")
        .style("width", px(w))
        .style("height", px(h))
        .child(
            View::div("sb-news-paper")
                .when(!open, |v| v.class("sb-folded"))
                .child(View::div("sb-news-texture"))
                .child(
                    View::element("h3")
                        .class("sb-news-title")
                        .style("font-size", if open { "1.2rem" } else { "0.6rem" })
                        .child(View::text(&p.title)),
                )
                .child(
                    View::div("sb-news-column")
                        .child(line("100%"))
                        .child(line("80%"))
                        .child_if(open, || View::div("sb-news-photo").child(cover(img_bg)))
                        .child(line("100%")),
                ),
        )
}

fn accordion(p: &AccordionProps, img_bg: &str, open: bool) -> View {
    let panel = |i: usize| {
        let shift = if open { 0.0 } else { -8.0 * i as f32 };
        View::div("sb-accordion-panel")
            .style("width", if open { px(p.width / 4.0) } else { "10px".into() })
            .style(
                "transform",
                format!(
                    "skewY({}) translateX({})",
                    if i % 2 == 0 { "5deg" } else { "-5deg" },
                    px(shift)
                ),
            )
            .style("z-index", (4 - i).to_string())
            .child(
                View::image(img_bg, "sb-accordion-image")
                    .style("left", format!("-{}%", i * 100))
                    .style("width", px(p.width)),
            )
            .child_if(i == 0, || {
                View::div("sb-accordion-caption")
                    .child(View::element("span").child(View::text(&p.title)))
            })
    };
    toggle_root("sb-accordion")
        .style("height", px(p.height))
        .children((0..4).map(panel))
}

fn wanted(p: &WantedProps, img_bg: &str, open: bool) -> View {
    toggle_root("sb-wanted")
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(View::div("sb-wanted-texture"))
        .child(
            View::div("sb-wanted-body")
                .child(View::element("h2").class("sb-wanted-heading").child(View::text("Wanted")))
                .child(
                    View::div("sb-wanted-photo").child(
                        cover(img_bg)
                            .class("sb-wanted-image")
                            .when(!open, |v| v.class("sb-blurred")),
                    ),
                )
                .child(View::element("p").class("sb-wanted-bounty").child(View::text(&p.title))),
        )
        .child(View::div("sb-wanted-tint").style("opacity", if open { "0" } else { "1" }))
}

fn suit(p: &SuitProps, img_bg: &str, open: bool) -> View {
    toggle_root("sb-suit")
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(
            View::div("sb-suit-handle")
                .style("height", if open { "40%" } else { "10%" })
                .child(View::div("sb-suit-grip")),
        )
        .child(
            View::div("sb-suit-card")
                .class(if open { "sb-card-up" } else { "sb-card-down" })
                .style("width", px(p.width * 0.8))
                .child(View::div("sb-suit-photo").child(cover(img_bg)))
                .child(View::element("p").class("sb-suit-tag").child(View::text(&p.title))),
        )
        .child(
            View::div("sb-suit-case")
                .style("background-color", &p.color)
                .child_if(!open, || {
                    View::div("sb-suit-hint")
                        .child(View::element("span").child(View::text("▲")))
                        .child(View::element("span").child(View::text("Pull me")))
                }),
        )
}

fn window(p: &WindowProps, img_bg: &str, open: bool) -> View {
    let shutter = |side: &'static str, angle: &'static str| {
        View::div("sb-shutter")
            .class(side)
            .style("background-color", &p.color)
            .style(
                "transform",
                if open {
                    format!("perspective(1000px) rotateY({angle})")
                } else {
                    "rotateY(0deg)".to_owned()
                },
            )
    };
    toggle_root("sb-window")
        .style("width", px(p.width))
        .style("height", px(p.height))
        .child(View::div("sb-window-view").child(cover(img_bg)))
        .child(shutter("sb-left", "-110deg"))
        .child(shutter("sb-right", "110deg"))
}

fn polaroid(p: &PolaroidProps, img_bg: &str, open: bool) -> View {
    toggle_root("sb-polaroid")
        .style("width", px(p.width))
        .style("transform", if open { "rotate(-5deg) scale(1.1)" } else { "rotate(2deg)" })
        .child(
            View::div("sb-polaroid-photo")
                .child(cover(img_bg))
                .child(View::div("sb-polaroid-gloss")),
        )
        .child(View::element("p").class("sb-polaroid-caption").child(View::text(&p.title)))
}

fn custom(type_name: &str, open: bool) -> View {
    toggle_root("sb-custom").child(View::text(format!(
        "{type_name} {}",
        if open { "Open" } else { "Closed" }
    )))
}
