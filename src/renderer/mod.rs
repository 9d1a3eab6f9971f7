//! WebGPU rendering module
//!
//! A small forward pipeline: meshes are assembled on the CPU each frame
//! from the scene registry and the sea grid, lit flat-shaded in the
//! fragment shader with distance fog.

pub mod meshes;
pub mod pipeline;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
