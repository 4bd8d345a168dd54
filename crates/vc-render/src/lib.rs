pub mod canvas;
pub mod hit;
pub mod paint;
pub mod texture;

pub use canvas::{Brush, Canvas, DisplayList, DrawOp, TextStyle, VelloCanvas};
pub use hit::{ALPHA_HIT_THRESHOLD, HitShape, alpha_allows_hit, point_in_shape};
pub use texture::{ImageTextureLoader, MemoryTextures, Texture, TextureLoader};

// Geometry types appear in the `Canvas` contract; re-export so widget crates
// don't need their own kurbo dependency.
pub use kurbo;
