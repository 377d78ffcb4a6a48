//! GPU uniform layouts for road and item draws

use bytemuck::{Pod, Zeroable};

use crate::render::draw::{BatchDraw, SegmentDraw};

/// Per-segment road surface uniforms (must match shader struct exactly)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SegmentUniforms {
    /// Perspective × pitch × translation (64 bytes, offset 0)
    pub camera: [[f32; 4]; 4],
    /// (x, dx, curvature, 0) (16 bytes, offset 64)
    pub segment_curve: [f32; 4],
    /// Clipped segment start (offset 80)
    pub segment_offset: f32,
    /// Visible length (offset 84)
    pub segment_length: f32,
    /// Unclipped segment length (offset 88)
    pub segment_full_length: f32,
    /// Padding to 96 bytes
    pub _pad: f32,
}

impl SegmentUniforms {
    pub fn from_draw(draw: &SegmentDraw) -> Self {
        let [x, dx, curvature] = draw.segment.curve.to_array();
        Self {
            camera: draw.camera.to_cols_array_2d(),
            segment_curve: [x, dx, curvature, 0.0],
            segment_offset: draw.segment.offset as f32,
            segment_length: draw.segment.length as f32,
            segment_full_length: draw.segment.segment.length() as f32,
            _pad: 0.0,
        }
    }
}

/// Per-batch item uniforms (must match shader struct exactly)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BatchUniforms {
    /// Perspective × pitch × translation (64 bytes, offset 0)
    pub camera: [[f32; 4]; 4],
    /// (x, dx, curvature, 0) (16 bytes, offset 64)
    pub segment_curve: [f32; 4],
    /// Clipped segment start (offset 80)
    pub segment_offset: f32,
    /// Visible length (offset 84)
    pub segment_length: f32,
    /// Items per batch (offset 88)
    pub batch_size: f32,
    /// Item spacing (offset 92)
    pub item_spacing: f32,
    /// Item phase offset (offset 96)
    pub item_offset: f32,
    /// Camera offset along the road (offset 100)
    pub camera_offset: f32,
    /// Near end of the depth window, or 0 (offset 104)
    pub visible_min_depth: f32,
    /// Far end of the depth window, or f32::MAX (offset 108)
    pub visible_max_depth: f32,
    /// Batch index within the segment (offset 112)
    pub batch_index: i32,
    /// Padding to 128 bytes
    pub _pad: [i32; 3],
}

impl BatchUniforms {
    pub fn from_draw(draw: &BatchDraw<'_>) -> Self {
        let [x, dx, curvature] = draw.batch.curve.to_array();
        let (min_depth, max_depth) = match draw.family.depth_window {
            Some(window) => (window.min as f32, window.max as f32),
            None => (0.0, f32::MAX),
        };
        Self {
            camera: draw.camera.to_cols_array_2d(),
            segment_curve: [x, dx, curvature, 0.0],
            segment_offset: draw.batch.segment_offset as f32,
            segment_length: draw.segment.length as f32,
            batch_size: draw.batch.spacing.batch_size as f32,
            item_spacing: draw.batch.spacing.spacing as f32,
            item_offset: draw.batch.spacing.phase as f32,
            camera_offset: draw.camera_offset as f32,
            visible_min_depth: min_depth,
            visible_max_depth: max_depth,
            batch_index: draw.batch.batch_index as i32,
            _pad: [0; 3],
        }
    }
}
