//! Hex colour handling for colour-typed props.
//!
//! Props store colours as CSS hex strings. Anything written through the
//! template registry is parsed here first and re-emitted in canonical form.

/// RGBA colour, 4 × f32 in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn pair(hi: u8, lo: u8) -> Option<f32> {
    Some((hex_val(hi)? << 4 | hex_val(lo)?) as f32 / 255.0)
}

fn single(c: u8) -> Option<f32> {
    Some((hex_val(c)? * 17) as f32 / 255.0)
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let b = hex.as_bytes();

        match b.len() {
            3 => Some(Self::rgba(single(b[0])?, single(b[1])?, single(b[2])?, 1.0)),
            4 => Some(Self::rgba(
                single(b[0])?,
                single(b[1])?,
                single(b[2])?,
                single(b[3])?,
            )),
            6 => Some(Self::rgba(
                pair(b[0], b[1])?,
                pair(b[2], b[3])?,
                pair(b[4], b[5])?,
                1.0,
            )),
            8 => Some(Self::rgba(
                pair(b[0], b[1])?,
                pair(b[2], b[3])?,
                pair(b[4], b[5])?,
                pair(b[6], b[7])?,
            )),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    /// Matches what a browser `<input type="color">` hands back.
    pub fn to_hex(&self) -> String {
        let r = (self.r * 255.0).round() as u8;
        let g = (self.g * 255.0).round() as u8;
        let b = (self.b * 255.0).round() as u8;
        let a = (self.a * 255.0).round() as u8;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Validate a colour string and return its canonical hex form.
pub fn normalize_hex(input: &str) -> Option<String> {
    Color::from_hex(input).map(|c| c.to_hex())
}
