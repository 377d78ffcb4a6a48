//! Road segments and the curve state carried between them

use crate::core::types::{Result, Vec3};
use crate::core::error::Error;

/// One stretch of road with constant curvature.
///
/// Segments are contiguous: a segment starts where the previous one ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    length: f64,
    curvature: f64,
    end: f64,
}

impl Segment {
    /// Create a segment starting at `start`.
    ///
    /// Rejects non-finite or non-positive lengths; a zero-length segment
    /// would otherwise be silently clipped away downstream.
    pub fn new(start: f64, length: f64, curvature: f64) -> Result<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::DegenerateSegment { length });
        }
        if !curvature.is_finite() {
            return Err(Error::CurvatureOutOfRange { curvature, max: f64::INFINITY });
        }
        Ok(Self {
            length,
            curvature,
            end: start + length,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Rate of lateral-slope change with distance
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Absolute longitudinal coordinate where the segment terminates
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn start(&self) -> f64 {
        self.end - self.length
    }
}

/// Accumulated lateral offset and slope at the start of a segment.
///
/// Packed for the renderer as `(x, dx, curvature)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurveState {
    /// Lateral offset
    pub x: f64,
    /// Lateral slope
    pub dx: f64,
    /// Curvature of the segment this state belongs to
    pub curvature: f64,
}

impl CurveState {
    /// Lateral offset `depth` units into the segment.
    ///
    /// Uses the same quadratic as the accumulator, so evaluating at the
    /// visible length gives the next segment's `x`.
    pub fn lateral_at(&self, depth: f64, curvature_scale: f64) -> f64 {
        let d = curvature_scale * depth;
        self.x + self.curvature * d * d + self.dx * d
    }

    /// State at the start of the following segment after `length` units
    pub fn advanced(&self, length: f64, curvature_scale: f64) -> (f64, f64) {
        let depth = curvature_scale * length;
        (
            self.x + self.curvature * depth * depth + self.dx * depth,
            self.dx + 2.0 * self.curvature * depth,
        )
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x as f32, self.dx as f32, self.curvature as f32]
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::from_array(self.to_array())
    }
}
