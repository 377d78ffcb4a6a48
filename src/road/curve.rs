//! Curve accumulation and near-plane clipping
//!
//! Walks the segment stream head to tail, clipping each segment so no part
//! of it lies closer to the camera than the near margin, and integrating
//! curvature into the lateral offset/slope of the next segment.
//!
//! Geometry at or behind the camera plane breaks the perspective divide, so
//! clipping happens per segment. The clipped `(offset, length)` pair is
//! computed exactly once here and reused by item placement.

use crate::road::segment::{CurveState, Segment};

/// Parameters shared by every walk of a frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipParams {
    /// Distance in front of the camera below which geometry is clipped (> 0)
    pub near_margin: f64,
    /// Curvature-to-offset integration constant `k`
    pub curvature_scale: f64,
}

impl Default for ClipParams {
    fn default() -> Self {
        Self {
            near_margin: 3.0,
            curvature_scale: 0.01,
        }
    }
}

/// The visible part of one segment for the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleSegment {
    /// Clipped start, never closer than `camera_offset + near_margin`
    pub offset: f64,
    /// `segment.end() - offset`, always > 0
    pub length: f64,
    /// Lateral offset/slope at `offset`
    pub curve: CurveState,
    /// The segment this was clipped from
    pub segment: Segment,
}

impl VisibleSegment {
    /// End of the visible range (equals the segment end)
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }
}

/// Clip one segment against the near margin.
///
/// Returns `(offset, visible_length)`; a non-positive length means the
/// segment is entirely behind the near plane.
pub fn clip(segment: &Segment, camera_offset: f64, near_margin: f64) -> (f64, f64) {
    let offset = (camera_offset + near_margin).max(segment.start());
    (offset, segment.end() - offset)
}

/// Lazy walk over the visible segments of a stream
pub struct CurveWalk<'a, I>
where
    I: Iterator<Item = &'a Segment>,
{
    segments: I,
    camera_offset: f64,
    params: ClipParams,
    x: f64,
    dx: f64,
}

/// Start a walk over `segments` for the given camera offset.
///
/// The head's curve state is `(0, 0)`; lateral positions are relative to
/// the camera's straight-ahead reference.
pub fn walk<'a, I>(segments: I, camera_offset: f64, params: ClipParams) -> CurveWalk<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a Segment>,
{
    CurveWalk {
        segments: segments.into_iter(),
        camera_offset,
        params,
        x: 0.0,
        dx: 0.0,
    }
}

impl<'a, I> Iterator for CurveWalk<'a, I>
where
    I: Iterator<Item = &'a Segment>,
{
    type Item = VisibleSegment;

    fn next(&mut self) -> Option<VisibleSegment> {
        for segment in self.segments.by_ref() {
            let (offset, length) = clip(segment, self.camera_offset, self.params.near_margin);

            // Fully behind the near plane: contributes neither geometry nor curvature
            if length <= 0.0 {
                continue;
            }

            let curve = CurveState {
                x: self.x,
                dx: self.dx,
                curvature: segment.curvature(),
            };
            (self.x, self.dx) = curve.advanced(length, self.params.curvature_scale);

            return Some(VisibleSegment {
                offset,
                length,
                curve,
                segment: *segment,
            });
        }
        None
    }
}
