//! Procedural road: segments, the streaming window and curve accumulation

pub mod segment;
pub mod curve;
pub mod stream;
pub mod policy;

pub use segment::{CurveState, Segment};
pub use curve::{clip, walk, ClipParams, CurveWalk, VisibleSegment};
pub use stream::{AdvanceReport, SegmentStream, StreamConfig};
pub use policy::{HashSegmentPolicy, PolicyConfig, SegmentPolicy, SegmentShape};
