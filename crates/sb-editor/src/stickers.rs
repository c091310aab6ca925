//! The user's own stickers: uploaded or AI-edited images that can be
//! dropped like the built-in presets.

use sb_core::props::PropValue;
use serde::{Deserialize, Serialize};

/// Size a user sticker is placed at.
pub const USER_STICKER_SIZE: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSticker {
    pub id: String,
    /// Image reference (`data:` or remote URL).
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl UserSticker {
    /// Prop overrides for a sticker node showing this image.
    pub fn overrides(&self) -> Vec<(String, PropValue)> {
        vec![
            ("sticker".to_owned(), PropValue::from(self.url.as_str())),
            ("size".to_owned(), PropValue::Num(USER_STICKER_SIZE)),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerLibrary {
    stickers: Vec<UserSticker>,
}

impl StickerLibrary {
    pub fn iter(&self) -> impl Iterator<Item = &UserSticker> {
        self.stickers.iter()
    }

    pub fn get(&self, id: &str) -> Option<&UserSticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut UserSticker> {
        self.stickers.iter_mut().find(|s| s.id == id)
    }

    /// Add an image under the id `sticker-<raw_id>`, returning the id.
    pub fn add(&mut self, raw_id: u64, url: &str, name: &str) -> String {
        let id = format!("sticker-{raw_id}");
        self.stickers.push(UserSticker {
            id: id.clone(),
            url: url.to_owned(),
            name: name.to_owned(),
            tags: Vec::new(),
        });
        id
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        match self.get_mut(id) {
            Some(s) if !name.is_empty() => {
                s.name = name.to_owned();
                true
            }
            _ => false,
        }
    }

    /// Swap in an edited image.
    pub fn replace_image(&mut self, id: &str, url: &str) -> bool {
        match self.get_mut(id) {
            Some(s) => {
                s.url = url.to_owned();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<UserSticker> {
        let index = self.stickers.iter().position(|s| s.id == id)?;
        Some(self.stickers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn library_lifecycle() {
        let mut lib = StickerLibrary::default();
        let id = lib.add(42, "data:image/png;base64,AAAA", "cat");
        assert_eq!(id, "sticker-42");
        assert!(lib.rename(&id, "  kitty "));
        assert!(!lib.rename(&id, "   "));
        assert!(lib.replace_image(&id, "data:image/png;base64,BBBB"));
        let s = lib.get(&id).unwrap();
        assert_eq!(s.name, "kitty");
        assert_eq!(
            s.overrides(),
            vec![
                ("sticker".to_owned(), PropValue::from("data:image/png;base64,BBBB")),
                ("size".to_owned(), PropValue::Num(100.0)),
            ]
        );
        assert!(lib.remove(&id).is_some());
        assert!(lib.is_empty());
    }
}
