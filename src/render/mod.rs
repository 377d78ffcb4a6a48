//! Boundary with the external rendering pipeline

pub mod draw;
pub mod uniforms;

pub use draw::{BatchDraw, DrawCounter, DrawSink, SegmentDraw};
pub use uniforms::{BatchUniforms, SegmentUniforms};
