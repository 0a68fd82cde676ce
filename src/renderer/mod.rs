//! WebGPU rendering module
//!
//! Draws two mirrored optotype outlines from a `FrameOutput`.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{frame_vertices, optotype_outline, pair_transforms};
pub use vertex::Vertex;
