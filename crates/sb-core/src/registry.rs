//! Template registry: the editable-property schema of every node type.
//!
//! Defaults are not repeated here. Each [`PropDefinition::default`] is read
//! back from the typed record's `Default`, so the schema the property panel
//! shows and the values a new node starts with cannot disagree.

use crate::color::normalize_hex;
use crate::props::{ImageList, NodeKind, NodeProps, PropError, PropField, PropValue};
use serde::Serialize;
use std::sync::LazyLock;

/// How the property panel edits a value, and the domain it is held to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropControl {
    Range { min: f32, max: f32 },
    Color,
    Text,
    Select { options: Vec<SelectOption> },
    Audio,
    Images,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropDefinition {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: PropControl,
    #[serde(rename = "def")]
    pub default: PropValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: &'static str,
    pub icon: &'static str,
    pub props: Vec<PropDefinition>,
}

impl Template {
    pub fn prop(&self, key: &str) -> Option<&PropDefinition> {
        self.props.iter().find(|p| p.key == key)
    }

    /// Fresh, independently owned props holding every declared default.
    pub fn instantiate(&self) -> NodeProps {
        NodeProps::defaults(self.kind)
    }

    /// Defaults with `overrides` applied on top. An override that fails
    /// [`Template::coerce`] is dropped and the default kept.
    pub fn instantiate_with<'a, I>(&self, overrides: I) -> NodeProps
    where
        I: IntoIterator<Item = (&'a str, PropValue)>,
    {
        let mut props = self.instantiate();
        for (key, value) in overrides {
            let applied = self
                .coerce(key, value)
                .and_then(|v| props.set(key, v));
            if let Err(e) = applied {
                log::warn!("{}: ignoring override: {e}", self.kind);
            }
        }
        props
    }

    /// Hold `value` to the declared domain of `key`: ranges clamp, colours
    /// must parse (and come back canonical), selects must name an option.
    pub fn coerce(&self, key: &str, value: PropValue) -> Result<PropValue, PropError> {
        let def = self.prop(key).ok_or_else(|| PropError::UnknownKey {
            kind: self.kind.as_str().to_owned(),
            key: key.to_owned(),
        })?;
        match &def.control {
            PropControl::Range { min, max } => {
                let n = f32::from_value(key, value)?;
                Ok(PropValue::Num(n.clamp(*min, *max)))
            }
            PropControl::Color => {
                let s = String::from_value(key, value)?;
                normalize_hex(&s)
                    .map(PropValue::Str)
                    .ok_or(PropError::InvalidColor {
                        key: key.to_owned(),
                        value: s,
                    })
            }
            PropControl::Select { options } => {
                let s = String::from_value(key, value)?;
                let allowed = options.iter().any(|o| o.value == s)
                    || (self.kind == NodeKind::Sticker && is_image_ref(&s));
                if allowed {
                    Ok(PropValue::Str(s))
                } else {
                    Err(PropError::NotAnOption {
                        key: key.to_owned(),
                        value: s,
                    })
                }
            }
            PropControl::Text | PropControl::Audio => String::from_value(key, value).map(PropValue::Str),
            PropControl::Images => ImageList::from_value(key, value).map(|l| l.to_value()),
        }
    }
}

/// `http(s):` or `data:` reference, as opposed to an emoji.
pub fn is_image_ref(s: &str) -> bool {
    s.starts_with("http") || s.starts_with("data:")
}

// ─── Table ───────────────────────────────────────────────────────────────

struct Field {
    key: &'static str,
    label: &'static str,
    control: PropControl,
    unit: Option<&'static str>,
}

fn range(key: &'static str, label: &'static str, min: f32, max: f32, unit: &'static str) -> Field {
    Field {
        key,
        label,
        control: PropControl::Range { min, max },
        unit: Some(unit),
    }
}

fn color(key: &'static str, label: &'static str) -> Field {
    Field {
        key,
        label,
        control: PropControl::Color,
        unit: None,
    }
}

fn text(key: &'static str, label: &'static str) -> Field {
    Field {
        key,
        label,
        control: PropControl::Text,
        unit: None,
    }
}

fn select(key: &'static str, label: &'static str, options: &[(&'static str, &'static str)]) -> Field {
    Field {
        key,
        label,
        control: PropControl::Select {
            options: options
                .iter()
                .map(|&(label, value)| SelectOption { label, value })
                .collect(),
        },
        unit: None,
    }
}

fn other(key: &'static str, label: &'static str, control: PropControl) -> Field {
    Field {
        key,
        label,
        control,
        unit: None,
    }
}

fn template(kind: NodeKind, name: &'static str, icon: &'static str, fields: Vec<Field>) -> Template {
    let defaults = NodeProps::defaults(kind);
    let props = fields
        .into_iter()
        .map(|f| PropDefinition {
            default: defaults.get(f.key).unwrap_or_else(|| {
                log::error!("{kind}.{} has no typed field", f.key);
                PropValue::Str(String::new())
            }),
            key: f.key,
            label: f.label,
            control: f.control,
            unit: f.unit,
        })
        .collect();
    Template {
        kind,
        name,
        icon,
        props,
    }
}

const FONTS: &[(&str, &str)] = &[
    ("Modern sans", "Outfit"),
    ("Handwritten", "Shadows Into Light"),
    ("Monospace", "Space Mono"),
    ("System default", "sans-serif"),
];

const STICKERS: &[(&str, &str)] = &[
    ("Sparkles", "✨"),
    ("Heart", "❤️"),
    ("Rainbow", "🌈"),
    ("Cloud", "☁️"),
    ("Camera", "📸"),
    ("Blossom", "🌸"),
    ("Sun", "☀️"),
    ("Coffee", "☕"),
    ("Flame", "🔥"),
];

static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    use NodeKind::*;
    vec![
        template(Text, "Text box", "✍️", vec![
            text("text", "Text"),
            range("fontSize", "Font size", 12.0, 120.0, "px"),
            range("width", "Box width", 50.0, 800.0, "px"),
            range("padding", "Padding", 0.0, 60.0, "px"),
            color("color", "Text colour"),
            color("bgColor", "Background colour"),
            select("bgPattern", "Background pattern", &[
                ("None", "none"),
                ("Kraft paper", "kraft"),
                ("Noise", "noise"),
                ("Newsprint", "newspaper"),
                ("Grid", "grid"),
            ]),
            color("borderColor", "Border colour"),
            range("borderWidth", "Border width", 0.0, 20.0, "px"),
            range("borderRadius", "Corner radius", 0.0, 100.0, "px"),
            select("borderStyle", "Border style", &[
                ("Solid", "solid"),
                ("Dashed", "dashed"),
                ("Dotted", "dotted"),
                ("Double", "double"),
            ]),
            select("fontFamily", "Font", FONTS),
        ]),
        template(Sticker, "Sticker", "🎨", vec![
            select("sticker", "Sticker", STICKERS),
            range("size", "Size", 20.0, 500.0, "px"),
            range("rotate", "Rotation", -180.0, 180.0, "°"),
        ]),
        template(FilmRoll, "Film roll", "🎞️", vec![
            range("width", "Width", 60.0, 200.0, "px"),
            range("height", "Height", 100.0, 400.0, "px"),
            color("color", "Canister colour"),
            text("title", "Label"),
            text("subtitle", "Sub-label"),
            other("images", "Frames", PropControl::Images),
        ]),
        template(Envelope, "Envelope", "💌", vec![
            range("w", "Width", 150.0, 600.0, "px"),
            range("h", "Height", 100.0, 400.0, "px"),
            color("color", "Envelope colour"),
            text("letterText", "Letter"),
            range("fontSize", "Letter font size", 10.0, 40.0, "px"),
            color("textColor", "Letter colour"),
            select("fontFamily", "Letter font", &FONTS[..3]),
        ]),
        template(Record, "Record player", "📻", vec![
            range("width", "Width", 150.0, 600.0, "px"),
            range("height", "Height", 120.0, 500.0, "px"),
            color("color", "Body colour"),
            text("title", "Track title"),
            other("audioUrl", "Audio", PropControl::Audio),
        ]),
        template(Drawer, "Drawer", "🥡", vec![
            range("width", "Width", 100.0, 600.0, "px"),
            range("height", "Height", 60.0, 400.0, "px"),
            color("color", "Box colour"),
            text("title", "Label"),
        ]),
        template(FlipBox, "Flip box", "💎", vec![
            range("width", "Width", 80.0, 600.0, "px"),
            range("height", "Height", 80.0, 600.0, "px"),
            color("color", "Colour"),
            text("title", "Lid text"),
        ]),
        template(News, "Folded newspaper", "📰", vec![
            range("width", "Unfolded width", 150.0, 800.0, "px"),
            range("height", "Unfolded height", 150.0, 800.0, "px"),
            text("title", "Headline"),
        ]),
        template(Accordion, "Accordion album", "🎹", vec![
            range("width", "Base width", 100.0, 600.0, "px"),
            range("height", "Height", 80.0, 500.0, "px"),
            text("title", "Album name"),
        ]),
        template(Wanted, "Wanted poster", "🤠", vec![
            range("width", "Width", 100.0, 600.0, "px"),
            range("height", "Height", 150.0, 800.0, "px"),
            text("title", "Bounty"),
        ]),
        template(Suit, "Suitcase", "🧳", vec![
            range("width", "Width", 100.0, 600.0, "px"),
            range("height", "Height", 150.0, 800.0, "px"),
            color("color", "Case colour"),
            text("title", "Luggage tag"),
        ]),
        template(Window, "Window", "🪟", vec![
            range("width", "Width", 100.0, 600.0, "px"),
            range("height", "Height", 100.0, 600.0, "px"),
            color("color", "Frame colour"),
        ]),
        template(Polaroid, "Polaroid", "📸", vec![
            range("width", "Width", 80.0, 500.0, "px"),
            text("title", "Caption"),
        ]),
    ]
});

/// Every template, in palette order.
pub fn templates() -> &'static [Template] {
    &TEMPLATES
}

/// Template for a `type` string. `None` for `custom` and anything unknown.
pub fn lookup(type_name: &str) -> Option<&'static Template> {
    let kind = NodeKind::parse(type_name)?;
    TEMPLATES.iter().find(|t| t.kind == kind)
}

/// Hold stored props to their template's domain. Values that fail
/// [`Template::coerce`] are reset to the declared default and numbers are
/// clamped; everything else stays as stored. Returns how many keys were
/// reset.
pub fn sanitize(props: &mut NodeProps) -> usize {
    let Some(template) = props.kind().and_then(|k| TEMPLATES.iter().find(|t| t.kind == k)) else {
        return 0;
    };
    let mut reset = 0;
    for def in &template.props {
        let Some(stored) = props.get(def.key) else {
            continue;
        };
        let replacement = match template.coerce(def.key, stored) {
            Ok(clamped @ PropValue::Num(_)) => clamped,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("{}: {e}; using default", template.kind);
                reset += 1;
                def.default.clone()
            }
        };
        if let Err(e) = props.set(def.key, replacement) {
            log::warn!("{}.{}: {e}", template.kind, def.key);
        }
    }
    reset
}

/// The built-in sticker emoji.
pub fn sticker_presets() -> impl Iterator<Item = &'static str> {
    STICKERS.iter().map(|&(_, value)| value)
}
