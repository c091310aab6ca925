//! Editor configuration.
//!
//! Everything is optional on the wire; missing keys take the defaults below.

use sb_core::geometry::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// How long the page-flip effect runs before the new page is committed.
    pub flip_duration_ms: u32,
    /// Supersampling factor handed to the rasterizer.
    pub pixel_ratio: f32,
    /// Blank pages in a freshly created scrapbook.
    pub initial_page_count: usize,
    /// Logical point where click-to-add places a node.
    pub palette_drop_point: Point,
    /// Canvas zoom used until the host reports its real size.
    pub default_editor_scale: f32,
    pub default_title: String,
    pub default_category: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            flip_duration_ms: 400,
            pixel_ratio: 2.0,
            initial_page_count: 4,
            palette_drop_point: Point::new(100.0, 100.0),
            default_editor_scale: 0.5,
            default_title: "My new scrapbook".into(),
            default_category: "life".into(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, ignoring unknown keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace values no editor could work with by their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            log::warn!("pixelRatio {} is not usable, using {}", self.pixel_ratio, defaults.pixel_ratio);
            self.pixel_ratio = defaults.pixel_ratio;
        }
        if !(self.default_editor_scale.is_finite() && self.default_editor_scale > 0.0) {
            self.default_editor_scale = defaults.default_editor_scale;
        }
        if self.initial_page_count == 0 {
            self.initial_page_count = defaults.initial_page_count;
        }
        self
    }
}
