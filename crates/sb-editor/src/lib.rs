pub mod canvas;
pub mod config;
pub mod document;
pub mod editor;
pub mod export;
pub mod input;
pub mod navigator;
pub mod notice;
pub mod stickers;
pub mod suggest;

pub use canvas::{EditorSession, Interaction, Mode};
pub use config::EditorConfig;
pub use document::{DocumentError, DocumentStore, NodePatch, PageMutation};
pub use editor::{Editor, PendingSuggestion};
pub use export::{ImageArtifact, ImageExport, RasterJob, Rasterizer};
pub use input::CanvasEvent;
pub use navigator::{Flip, FlipDirection, PageNavigator, spread_count};
pub use notice::{Notice, NoticeLevel};
pub use stickers::{StickerLibrary, UserSticker};
pub use suggest::{ImageEdit, ImageEditRequest, SuggestError, SuggestionService, TextRequest, TextSuggestion};

// Re-export so hosts only need this crate
pub use sb_core;
pub use sb_render;
