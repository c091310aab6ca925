//! Strongly typed node properties.
//!
//! Every node type carries its own record; [`NodeProps`] is the tagged union
//! over them. Records are generated by [`prop_record!`] so each field's wire
//! key, default and accessor stay in one place.
//!
//! Loading is lenient: a key with the wrong type falls back to the record's
//! default (logged at `warn`), and unknown keys are dropped. Writing through
//! [`NodeProps::set`] is strict about types but does not clamp; domain checks
//! live in [`crate::registry::Template::coerce`].

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

// ─── Values & errors ─────────────────────────────────────────────────────

/// A single prop value as it crosses the editor boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Num(f32),
    Str(String),
    List(Vec<String>),
}

impl PropValue {
    pub fn as_num(&self) -> Option<f32> {
        match self {
            PropValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for PropValue {
    fn from(n: f32) -> Self {
        PropValue::Num(n)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Num(n) => write!(f, "{n}"),
            PropValue::Str(s) => f.write_str(s),
            PropValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropError {
    #[error("`{kind}` has no prop named `{key}`")]
    UnknownKey { kind: String, key: String },
    #[error("prop `{key}` expects {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("`{value}` is not a valid colour for `{key}`")]
    InvalidColor { key: String, value: String },
    #[error("`{value}` is not an allowed option for `{key}`")]
    NotAnOption { key: String, value: String },
}

// ─── Field conversions ───────────────────────────────────────────────────

/// Conversion glue between a record field and [`PropValue`] / raw JSON.
pub trait PropField: Sized {
    /// Type of the literal used to spell the default in a record.
    type Lit;
    const EXPECTED: &'static str;

    fn from_lit(lit: Self::Lit) -> Self;
    fn to_value(&self) -> PropValue;
    fn from_value(key: &str, value: PropValue) -> Result<Self, PropError>;
    /// Lenient decode from stored JSON; `None` means "use the default".
    fn from_json(value: &Value) -> Option<Self>;
}

impl PropField for f32 {
    type Lit = f32;
    const EXPECTED: &'static str = "a number";

    fn from_lit(lit: f32) -> Self {
        lit
    }

    fn to_value(&self) -> PropValue {
        PropValue::Num(*self)
    }

    fn from_value(key: &str, value: PropValue) -> Result<Self, PropError> {
        let n = match value {
            PropValue::Num(n) => Some(n),
            // range inputs hand their value over as a string
            PropValue::Str(s) => s.trim().parse::<f32>().ok(),
            PropValue::List(_) => None,
        };
        n.filter(|n| n.is_finite()).ok_or(PropError::WrongType {
            key: key.to_owned(),
            expected: Self::EXPECTED,
        })
    }

    fn from_json(value: &Value) -> Option<Self> {
        let n = match value {
            Value::Number(n) => n.as_f64().map(|n| n as f32),
            Value::String(s) => s.trim().parse::<f32>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }
}

impl PropField for String {
    type Lit = &'static str;
    const EXPECTED: &'static str = "a string";

    fn from_lit(lit: &'static str) -> Self {
        lit.to_owned()
    }

    fn to_value(&self) -> PropValue {
        PropValue::Str(self.clone())
    }

    fn from_value(key: &str, value: PropValue) -> Result<Self, PropError> {
        match value {
            PropValue::Str(s) => Ok(s),
            _ => Err(PropError::WrongType {
                key: key.to_owned(),
                expected: Self::EXPECTED,
            }),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl PropField for ImageList {
    type Lit = ();
    const EXPECTED: &'static str = "a list of image references";

    fn from_lit(_: ()) -> Self {
        ImageList::default()
    }

    fn to_value(&self) -> PropValue {
        PropValue::List(self.0.clone())
    }

    fn from_value(key: &str, value: PropValue) -> Result<Self, PropError> {
        match value {
            PropValue::List(items) => Ok(ImageList::from_items(items)),
            PropValue::Str(s) => Ok(ImageList::parse_joined(&s)),
            PropValue::Num(_) => Err(PropError::WrongType {
                key: key.to_owned(),
                expected: Self::EXPECTED,
            }),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        Some(ImageList::from_json(value))
    }
}

// ─── Image lists ─────────────────────────────────────────────────────────

/// Ordered list of image references (URLs or data URLs).
///
/// Older documents stored the list as one comma-joined string, which breaks
/// apart every base64 data URL. Parsing stitches those back together, and
/// anything unreadable becomes the empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ImageList(Vec<String>);

impl ImageList {
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ImageList(
            items
                .into_iter()
                .map(|s| {
                    let s: String = s.into();
                    s.trim().to_owned()
                })
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Split a legacy comma-joined string.
    pub fn parse_joined(raw: &str) -> Self {
        let mut out: Vec<String> = Vec::new();
        let mut pending_header = false;
        for seg in raw.split(',') {
            let seg = seg.trim();
            if pending_header {
                if let Some(last) = out.last_mut() {
                    last.push(',');
                    last.push_str(seg);
                }
                pending_header = false;
                continue;
            }
            if seg.is_empty() {
                continue;
            }
            // `data:<mime>;base64` is only the header; the payload follows
            // the comma that split() just consumed
            pending_header = seg.starts_with("data:");
            out.push(seg.to_owned());
        }
        // a dangling header with no payload is not an image
        if pending_header {
            out.pop();
        }
        ImageList(out)
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                ImageList::from_items(items.iter().filter_map(Value::as_str))
            }
            Value::String(s) => ImageList::parse_joined(s),
            Value::Null => ImageList::default(),
            other => {
                log::warn!("image list has unexpected shape ({other}), treating as empty");
                ImageList::default()
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, image: impl Into<String>) {
        let image = image.into();
        if !image.trim().is_empty() {
            self.0.push(image);
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }
}

impl<'de> Deserialize<'de> for ImageList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ImageList::from_json(&value))
    }
}

// ─── Records ─────────────────────────────────────────────────────────────

macro_rules! prop_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $field:ident : $ty:ty = $key:literal => $default:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            $( #[serde(rename = $key)] pub $field: $ty, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: <$ty as PropField>::from_lit($default), )* }
            }
        }

        impl $name {
            /// Wire keys in declaration order.
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            pub fn keys(&self) -> &'static [&'static str] {
                Self::KEYS
            }

            pub fn get(&self, key: &str) -> Option<PropValue> {
                match key {
                    $( $key => Some(PropField::to_value(&self.$field)), )*
                    _ => None,
                }
            }

            pub fn set(&mut self, key: &str, value: PropValue) -> Result<(), PropError> {
                match key {
                    $( $key => {
                        self.$field = <$ty as PropField>::from_value(key, value)?;
                        Ok(())
                    } )*
                    _ => Err(PropError::UnknownKey {
                        kind: stringify!($name).to_owned(),
                        key: key.to_owned(),
                    }),
                }
            }

            /// Build from stored JSON. Missing or mistyped keys keep their default.
            pub fn from_json_map(map: &Map<String, Value>) -> Self {
                let mut out = Self::default();
                $(
                    if let Some(raw) = map.get($key) {
                        match <$ty as PropField>::from_json(raw) {
                            Some(v) => out.$field = v,
                            None => log::warn!(
                                "{}.{}: expected {}, got {raw}; using default",
                                stringify!($name),
                                $key,
                                <$ty as PropField>::EXPECTED,
                            ),
                        }
                    }
                )*
                out
            }
        }
    };
}

prop_record! {
    /// Free text box.
    TextProps {
        text: String = "text" => "Click here to edit text",
        font_size: f32 = "fontSize" => 24.0,
        width: f32 = "width" => 200.0,
        padding: f32 = "padding" => 12.0,
        color: String = "color" => "#1e293b",
        bg_color: String = "bgColor" => "#ffffff00",
        bg_pattern: String = "bgPattern" => "none",
        border_color: String = "borderColor" => "#cbd5e1",
        border_width: f32 = "borderWidth" => 0.0,
        border_radius: f32 = "borderRadius" => 0.0,
        border_style: String = "borderStyle" => "solid",
        font_family: String = "fontFamily" => "Outfit",
    }
}

prop_record! {
    /// Emoji or image sticker. `sticker` holds either a preset emoji or an
    /// `http(s):` / `data:` image reference.
    StickerProps {
        sticker: String = "sticker" => "✨",
        size: f32 = "size" => 60.0,
        rotate: f32 = "rotate" => 0.0,
    }
}

prop_record! {
    FilmRollProps {
        width: f32 = "width" => 96.0,
        height: f32 = "height" => 160.0,
        color: String = "color" => "#FFB800",
        title: String = "title" => "KODAK 400",
        subtitle: String = "subtitle" => "35mm color film",
        images: ImageList = "images" => (),
    }
}

prop_record! {
    EnvelopeProps {
        w: f32 = "w" => 240.0,
        h: f32 = "h" => 160.0,
        color: String = "color" => "#E5D3B3",
        letter_text: String = "letterText" => "Dear maker,\n\nEvery line of code is a poem.",
        font_size: f32 = "fontSize" => 14.0,
        text_color: String = "textColor" => "#444444",
        font_family: String = "fontFamily" => "Shadows Into Light",
    }
}

prop_record! {
    RecordProps {
        width: f32 = "width" => 208.0,
        height: f32 = "height" => 176.0,
        color: String = "color" => "#2d3436",
        title: String = "title" => "My Favorite Song",
        audio_url: String = "audioUrl" => "https://assets.mixkit.co/active_storage/sfx/123/123-preview.mp3",
    }
}

prop_record! {
    DrawerProps {
        width: f32 = "width" => 192.0,
        height: f32 = "height" => 112.0,
        color: String = "color" => "#F8F9FA",
        title: String = "title" => "Private Collection",
    }
}

prop_record! {
    FlipBoxProps {
        width: f32 = "width" => 160.0,
        height: f32 = "height" => 160.0,
        color: String = "color" => "#4dabf7",
        title: String = "title" => "Tap for a surprise",
    }
}

prop_record! {
    NewsProps {
        width: f32 = "width" => 256.0,
        height: f32 = "height" => 320.0,
        title: String = "title" => "Headline: A Good Life",
    }
}

prop_record! {
    AccordionProps {
        width: f32 = "width" => 192.0,
        height: f32 = "height" => 128.0,
        title: String = "title" => "Memories 2024",
    }
}

prop_record! {
    WantedProps {
        width: f32 = "width" => 192.0,
        height: f32 = "height" => 256.0,
        title: String = "title" => "Reward $100,000",
    }
}

prop_record! {
    SuitProps {
        width: f32 = "width" => 192.0,
        height: f32 = "height" => 224.0,
        color: String = "color" => "#1971c2",
        title: String = "title" => "Trip to Paris",
    }
}

prop_record! {
    WindowProps {
        width: f32 = "width" => 192.0,
        height: f32 = "height" => 192.0,
        color: String = "color" => "#868e96",
    }
}

prop_record! {
    PolaroidProps {
        width: f32 = "width" => 128.0,
        title: String = "title" => "Such a sunny day",
    }
}

/// Props of a node whose type has no template. Kept verbatim so a document
/// survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomProps {
    pub type_name: String,
    pub values: Map<String, Value>,
}

// ─── Kinds ───────────────────────────────────────────────────────────────

/// The node types that have a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Sticker,
    FilmRoll,
    Envelope,
    Record,
    Drawer,
    FlipBox,
    News,
    Accordion,
    Wanted,
    Suit,
    Window,
    Polaroid,
}

impl NodeKind {
    /// Palette order.
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Text,
        NodeKind::Sticker,
        NodeKind::FilmRoll,
        NodeKind::Envelope,
        NodeKind::Record,
        NodeKind::Drawer,
        NodeKind::FlipBox,
        NodeKind::News,
        NodeKind::Accordion,
        NodeKind::Wanted,
        NodeKind::Suit,
        NodeKind::Window,
        NodeKind::Polaroid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Sticker => "sticker",
            NodeKind::FilmRoll => "filmroll",
            NodeKind::Envelope => "envelope",
            NodeKind::Record => "record",
            NodeKind::Drawer => "drawer",
            NodeKind::FlipBox => "flipbox",
            NodeKind::News => "news",
            NodeKind::Accordion => "accordion",
            NodeKind::Wanted => "wanted",
            NodeKind::Suit => "suit",
            NodeKind::Window => "window",
            NodeKind::Polaroid => "polaroid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        NodeKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tagged union ────────────────────────────────────────────────────────

/// Per-type property payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProps {
    Text(TextProps),
    Sticker(StickerProps),
    FilmRoll(FilmRollProps),
    Envelope(EnvelopeProps),
    Record(RecordProps),
    Drawer(DrawerProps),
    FlipBox(FlipBoxProps),
    News(NewsProps),
    Accordion(AccordionProps),
    Wanted(WantedProps),
    Suit(SuitProps),
    Window(WindowProps),
    Polaroid(PolaroidProps),
    Custom(CustomProps),
}

/// Expand `$body` once per templated variant with `$p` bound to the record.
macro_rules! each_record {
    ($props:expr, $p:ident => $body:expr, custom $c:ident => $fallback:expr) => {
        match $props {
            NodeProps::Text($p) => $body,
            NodeProps::Sticker($p) => $body,
            NodeProps::FilmRoll($p) => $body,
            NodeProps::Envelope($p) => $body,
            NodeProps::Record($p) => $body,
            NodeProps::Drawer($p) => $body,
            NodeProps::FlipBox($p) => $body,
            NodeProps::News($p) => $body,
            NodeProps::Accordion($p) => $body,
            NodeProps::Wanted($p) => $body,
            NodeProps::Suit($p) => $body,
            NodeProps::Window($p) => $body,
            NodeProps::Polaroid($p) => $body,
            NodeProps::Custom($c) => $fallback,
        }
    };
}

impl NodeProps {
    /// Fresh record holding every declared default.
    pub fn defaults(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Text => NodeProps::Text(TextProps::default()),
            NodeKind::Sticker => NodeProps::Sticker(StickerProps::default()),
            NodeKind::FilmRoll => NodeProps::FilmRoll(FilmRollProps::default()),
            NodeKind::Envelope => NodeProps::Envelope(EnvelopeProps::default()),
            NodeKind::Record => NodeProps::Record(RecordProps::default()),
            NodeKind::Drawer => NodeProps::Drawer(DrawerProps::default()),
            NodeKind::FlipBox => NodeProps::FlipBox(FlipBoxProps::default()),
            NodeKind::News => NodeProps::News(NewsProps::default()),
            NodeKind::Accordion => NodeProps::Accordion(AccordionProps::default()),
            NodeKind::Wanted => NodeProps::Wanted(WantedProps::default()),
            NodeKind::Suit => NodeProps::Suit(SuitProps::default()),
            NodeKind::Window => NodeProps::Window(WindowProps::default()),
            NodeKind::Polaroid => NodeProps::Polaroid(PolaroidProps::default()),
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        Some(match self {
            NodeProps::Text(_) => NodeKind::Text,
            NodeProps::Sticker(_) => NodeKind::Sticker,
            NodeProps::FilmRoll(_) => NodeKind::FilmRoll,
            NodeProps::Envelope(_) => NodeKind::Envelope,
            NodeProps::Record(_) => NodeKind::Record,
            NodeProps::Drawer(_) => NodeKind::Drawer,
            NodeProps::FlipBox(_) => NodeKind::FlipBox,
            NodeProps::News(_) => NodeKind::News,
            NodeProps::Accordion(_) => NodeKind::Accordion,
            NodeProps::Wanted(_) => NodeKind::Wanted,
            NodeProps::Suit(_) => NodeKind::Suit,
            NodeProps::Window(_) => NodeKind::Window,
            NodeProps::Polaroid(_) => NodeKind::Polaroid,
            NodeProps::Custom(_) => return None,
        })
    }

    /// The `type` string this payload serializes under.
    pub fn type_name(&self) -> &str {
        match self {
            NodeProps::Custom(c) => &c.type_name,
            other => other.kind().map(NodeKind::as_str).unwrap_or("custom"),
        }
    }

    /// Declared keys in order. Custom payloads have none.
    pub fn keys(&self) -> &'static [&'static str] {
        each_record!(self, p => p.keys(), custom _c => &[])
    }

    pub fn get(&self, key: &str) -> Option<PropValue> {
        each_record!(self, p => p.get(key), custom c => c.values.get(key).and_then(json_to_value))
    }

    /// Typed assignment. Range and option checks are the registry's job.
    pub fn set(&mut self, key: &str, value: PropValue) -> Result<(), PropError> {
        let kind = self.type_name().to_owned();
        let result = each_record!(self, p => p.set(key, value), custom c => {
            c.values.insert(key.to_owned(), value_to_json(value));
            Ok(())
        });
        result.map_err(|e| match e {
            PropError::UnknownKey { key, .. } => PropError::UnknownKey { kind, key },
            other => other,
        })
    }

    /// Decode the stored `props` object of a node of type `type_name`.
    pub fn from_json(type_name: &str, raw: &Value) -> Self {
        let empty = Map::new();
        let map = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                log::warn!("props of `{type_name}` node is not an object ({other}); using defaults");
                &empty
            }
        };
        let Some(kind) = NodeKind::parse(type_name) else {
            return NodeProps::Custom(CustomProps {
                type_name: type_name.to_owned(),
                values: map.clone(),
            });
        };
        match kind {
            NodeKind::Text => NodeProps::Text(TextProps::from_json_map(map)),
            NodeKind::Sticker => NodeProps::Sticker(StickerProps::from_json_map(map)),
            NodeKind::FilmRoll => NodeProps::FilmRoll(FilmRollProps::from_json_map(map)),
            NodeKind::Envelope => NodeProps::Envelope(EnvelopeProps::from_json_map(map)),
            NodeKind::Record => NodeProps::Record(RecordProps::from_json_map(map)),
            NodeKind::Drawer => NodeProps::Drawer(DrawerProps::from_json_map(map)),
            NodeKind::FlipBox => NodeProps::FlipBox(FlipBoxProps::from_json_map(map)),
            NodeKind::News => NodeProps::News(NewsProps::from_json_map(map)),
            NodeKind::Accordion => NodeProps::Accordion(AccordionProps::from_json_map(map)),
            NodeKind::Wanted => NodeProps::Wanted(WantedProps::from_json_map(map)),
            NodeKind::Suit => NodeProps::Suit(SuitProps::from_json_map(map)),
            NodeKind::Window => NodeProps::Window(WindowProps::from_json_map(map)),
            NodeKind::Polaroid => NodeProps::Polaroid(PolaroidProps::from_json_map(map)),
        }
    }

    /// Keys a text suggestion writes to: `(title, body)`.
    pub fn suggestion_slots(&self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            NodeProps::Text(_) => (None, Some("text")),
            NodeProps::Envelope(_) => (None, Some("letterText")),
            NodeProps::FilmRoll(_) => (Some("title"), Some("subtitle")),
            NodeProps::Window(_) | NodeProps::Sticker(_) | NodeProps::Custom(_) => (None, None),
            _ => (Some("title"), None),
        }
    }
}

fn json_to_value(value: &Value) -> Option<PropValue> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| PropValue::Num(n as f32)),
        Value::String(s) => Some(PropValue::Str(s.clone())),
        Value::Array(items) => Some(PropValue::List(
            items.iter().filter_map(Value::as_str).map(str::to_owned).collect(),
        )),
        _ => None,
    }
}

fn value_to_json(value: PropValue) -> Value {
    match value {
        PropValue::Num(n) => serde_json::Number::from_f64(n as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        PropValue::Str(s) => Value::String(s),
        PropValue::List(items) => Value::Array(items.into_iter().map(Value::String).collect()),
    }
}

impl Serialize for NodeProps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeProps::Custom(c) => {
                let mut map = serializer.serialize_map(Some(c.values.len()))?;
                for (k, v) in &c.values {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            NodeProps::Text(p) => p.serialize(serializer),
            NodeProps::Sticker(p) => p.serialize(serializer),
            NodeProps::FilmRoll(p) => p.serialize(serializer),
            NodeProps::Envelope(p) => p.serialize(serializer),
            NodeProps::Record(p) => p.serialize(serializer),
            NodeProps::Drawer(p) => p.serialize(serializer),
            NodeProps::FlipBox(p) => p.serialize(serializer),
            NodeProps::News(p) => p.serialize(serializer),
            NodeProps::Accordion(p) => p.serialize(serializer),
            NodeProps::Wanted(p) => p.serialize(serializer),
            NodeProps::Suit(p) => p.serialize(serializer),
            NodeProps::Window(p) => p.serialize(serializer),
            NodeProps::Polaroid(p) => p.serialize(serializer),
        }
    }
}
