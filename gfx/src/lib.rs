mod atlas;
pub use atlas::{
    SpriteMap, cell_rect, grow_to_fit, patch_atlas, patch_atlas_from,
    required_height,
};

mod buffer;
pub use buffer::{AssetLoadError, Buffer, load_image};

mod pixel;
pub use pixel::{Pixel, Rgba};

pub type Rect = util::Rect;
