pub mod color;
pub mod geometry;
pub mod id;
pub mod model;
pub mod props;
pub mod registry;

pub use color::Color;
pub use geometry::{ANCHOR_OFFSET, PAGE_HEIGHT, PAGE_WIDTH, Point, ViewTransform};
pub use id::{Clock, IdAllocator, NodeId, SystemClock};
pub use model::*;
pub use props::{ImageList, NodeKind, NodeProps, PropError, PropField, PropValue};
pub use registry::{PropControl, PropDefinition, Template, is_image_ref, lookup, sticker_presets, templates};
