//! Segment stream: the stretch of road currently in play
//!
//! Segments are appended at the far end just before they come into view and
//! evicted from the near end once the camera has passed them. The stream
//! only ever grows at the tail and shrinks at the head.

use std::collections::VecDeque;
use std::collections::vec_deque;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::road::curve::{self, ClipParams, CurveWalk};
use crate::road::policy::SegmentPolicy;
use crate::road::segment::Segment;

/// Stream bounds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamConfig {
    /// Camera-plane safety clip distance
    pub near_margin: f64,
    /// Extra distance past the near margin before a segment is evicted
    pub eviction_slack: f64,
    /// Largest accepted absolute curvature
    pub max_curvature: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            near_margin: 3.0,
            eviction_slack: 0.1,
            max_curvature: 8.0,
        }
    }
}

/// Segments generated and evicted by one [`SegmentStream::advance`] call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub generated: usize,
    pub evicted: usize,
}

/// Ordered, contiguous segments ahead of the camera
#[derive(Clone, Debug)]
pub struct SegmentStream {
    config: StreamConfig,
    segments: VecDeque<Segment>,
    /// End of the last segment ever appended (survives full eviction)
    tail_end: f64,
    /// Sequence number of the next segment to generate
    next_sequence: u64,
}

impl SegmentStream {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            segments: VecDeque::new(),
            tail_end: 0.0,
            next_sequence: 0,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Append a segment at the tail.
    ///
    /// Fails on degenerate length or out-of-range curvature; the stream is
    /// left unchanged in that case.
    pub fn push(&mut self, length: f64, curvature: f64) -> Result<Segment> {
        let max = self.config.max_curvature;
        if !curvature.is_finite() || curvature.abs() > max {
            return Err(Error::CurvatureOutOfRange { curvature, max });
        }

        let segment = Segment::new(self.tail_end, length, curvature)?;
        log::trace!(
            "Segment #{} [{:.1}, {:.1}) curvature {:.3}",
            self.next_sequence, segment.start(), segment.end(), curvature
        );

        self.tail_end = segment.end();
        self.next_sequence += 1;
        self.segments.push_back(segment);
        Ok(segment)
    }

    /// Generate ahead and evict behind the camera. Call once per tick.
    ///
    /// Both loops run until their condition holds, so a large camera jump
    /// generates or evicts as many segments as needed.
    pub fn advance<P>(&mut self, camera_offset: f64, draw_distance: f64, policy: &mut P) -> Result<AdvanceReport>
    where
        P: SegmentPolicy + ?Sized,
    {
        let mut report = AdvanceReport::default();

        let horizon = camera_offset + draw_distance;
        while self.tail_end < horizon {
            let shape = policy.next_shape(self.next_sequence);
            self.push(shape.length, shape.curvature)?;
            report.generated += 1;
        }

        report.evicted = self.evict_behind(camera_offset);

        if report.generated > 0 || report.evicted > 0 {
            log::debug!(
                "Stream advance at {:.1}: +{} -{} ({} segments, tail {:.1})",
                camera_offset, report.generated, report.evicted,
                self.segments.len(), self.tail_end
            );
        }
        Ok(report)
    }

    /// Drop head segments that can no longer be visible from `camera_offset`.
    ///
    /// May empty the stream; [`SegmentStream::tail_end`] is kept.
    pub fn evict_behind(&mut self, camera_offset: f64) -> usize {
        let boundary = camera_offset + self.config.near_margin + self.config.eviction_slack;
        let mut evicted = 0;
        while let Some(head) = self.segments.front() {
            if head.end() >= boundary {
                break;
            }
            log::trace!("Evict segment [{:.1}, {:.1})", head.start(), head.end());
            self.segments.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Visible segments with their curve state, head to tail
    pub fn walk(&self, camera_offset: f64, curvature_scale: f64) -> CurveWalk<'_, vec_deque::Iter<'_, Segment>> {
        curve::walk(
            &self.segments,
            camera_offset,
            ClipParams {
                near_margin: self.config.near_margin,
                curvature_scale,
            },
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the furthest segment generated so far.
    ///
    /// 0 only for a stream that never held a segment. Once segments have
    /// been generated this keeps the last end even if [`evict_behind`]
    /// empties the deque, so the next segment starts where the road left
    /// off rather than back at 0. `advance` never empties the stream under
    /// a validated config, so this only shows after a direct eviction.
    ///
    /// [`evict_behind`]: SegmentStream::evict_behind
    pub fn tail_end(&self) -> f64 {
        self.tail_end
    }

    /// Total segments generated over the stream's lifetime
    pub fn generated_count(&self) -> u64 {
        self.next_sequence
    }
}

impl Default for SegmentStream {
    fn default() -> Self {
        Self::new(StreamConfig::default())
    }
}
