//! Software stereo rendering
//!
//! Every entity is drawn as flat rectangles at its depth. Each eye gets
//! its own off-axis projection; the two images are merged into an anaglyph.

pub mod framebuffer;
pub mod projection;
pub mod stereo;

pub use framebuffer::{Framebuffer, Rgba, anaglyph};
pub use projection::{ProjectionParams, project};
pub use stereo::{Camera, Canvas, DrawCommand, DrawStyle, StereoRenderer};
