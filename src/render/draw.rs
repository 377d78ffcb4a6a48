//! Draw records handed to the rendering pipeline
//!
//! One [`SegmentDraw`] per visible segment and one [`BatchDraw`] per item
//! batch per frame. Geometry and colour are decided by the consumer; these
//! records only carry placement and curve data.

use crate::core::types::Mat4;
use crate::items::family::ItemFamily;
use crate::items::placement::{ItemBatch, ItemPlacement};
use crate::render::uniforms::{BatchUniforms, SegmentUniforms};
use crate::road::curve::VisibleSegment;

/// Road surface draw for one visible segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentDraw {
    pub segment: VisibleSegment,
    pub camera: Mat4,
    pub camera_offset: f64,
}

impl SegmentDraw {
    pub fn uniforms(&self) -> SegmentUniforms {
        SegmentUniforms::from_draw(self)
    }
}

/// One batch invocation for an item family
#[derive(Clone, Copy, Debug)]
pub struct BatchDraw<'a> {
    /// Index of the family in the scene configuration
    pub family_index: usize,
    pub family: &'a ItemFamily,
    pub segment: VisibleSegment,
    pub batch: ItemBatch,
    pub camera: Mat4,
    pub camera_offset: f64,
    pub curvature_scale: f64,
}

impl BatchDraw<'_> {
    pub fn uniforms(&self) -> BatchUniforms {
        BatchUniforms::from_draw(self)
    }

    /// Whether an item is owned by this segment and inside the family's
    /// depth window. Items failing this are drawn degenerate.
    pub fn is_visible(&self, item: &ItemPlacement) -> bool {
        if !item.owned {
            return false;
        }
        match self.family.depth_window {
            Some(window) => window.contains(item.position - self.camera_offset),
            None => true,
        }
    }

    /// Every slot of the batch with its visibility
    pub fn placements(&self) -> impl Iterator<Item = (ItemPlacement, bool)> + '_ {
        self.batch
            .slots(self.curvature_scale)
            .map(move |item| (item, self.is_visible(&item)))
    }

    /// Only the items that should actually appear this frame
    pub fn visible_items(&self) -> impl Iterator<Item = ItemPlacement> + '_ {
        self.placements().filter_map(|(item, visible)| visible.then_some(item))
    }
}

/// Receiver of a frame's draw records
pub trait DrawSink {
    fn draw_segment(&mut self, draw: &SegmentDraw);

    fn draw_batch(&mut self, draw: &BatchDraw<'_>);
}

/// Sink that records draw counts; useful for headless runs and tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawCounter {
    pub segments: usize,
    /// Batches per family index
    pub batches: Vec<usize>,
}

impl DrawCounter {
    pub fn total_batches(&self) -> usize {
        self.batches.iter().sum()
    }
}

impl DrawSink for DrawCounter {
    fn draw_segment(&mut self, _draw: &SegmentDraw) {
        self.segments += 1;
    }

    fn draw_batch(&mut self, draw: &BatchDraw<'_>) {
        if self.batches.len() <= draw.family_index {
            self.batches.resize(draw.family_index + 1, 0);
        }
        self.batches[draw.family_index] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::placement::{place_on, ItemSpacing};
    use crate::road::segment::{CurveState, Segment};

    fn visible(offset: f64, length: f64) -> VisibleSegment {
        VisibleSegment {
            offset,
            length,
            curve: CurveState::default(),
            segment: Segment::new(offset, length, 0.0).unwrap(),
        }
    }

    #[test]
    fn test_depth_window_culls_far_items() {
        let family = ItemFamily::new("fence", 10.0, 0.0, 4).with_depth_window(0.0, 25.0);
        let segment = visible(100.0, 100.0);
        let batch = place_on(&segment, ItemSpacing::from(&family)).next().unwrap();
        let draw = BatchDraw {
            family_index: 0,
            family: &family,
            segment,
            batch,
            camera: Mat4::IDENTITY,
            camera_offset: 97.0,
            curvature_scale: 0.01,
        };

        // items at 100, 110, 120 are within 25 of 97; 130 is not
        let positions: Vec<_> = draw.visible_items().map(|i| i.position).collect();
        assert_eq!(positions, vec![100.0, 110.0, 120.0]);
        assert_eq!(draw.placements().count(), 4);
    }

    #[test]
    fn test_batch_uniforms_carry_parameters() {
        let family = ItemFamily::new("light", 50.0, 12.5, 4);
        let segment = visible(200.0, 400.0);
        let batch = place_on(&segment, ItemSpacing::from(&family)).nth(1).unwrap();
        let draw = BatchDraw {
            family_index: 0,
            family: &family,
            segment,
            batch,
            camera: Mat4::IDENTITY,
            camera_offset: 150.0,
            curvature_scale: 0.01,
        };

        let u = draw.uniforms();
        assert_eq!(u.batch_index, 1);
        assert_eq!(u.batch_size, 4.0);
        assert_eq!(u.item_spacing, 50.0);
        assert_eq!(u.item_offset, 12.5);
        assert_eq!(u.segment_offset, 200.0);
        assert_eq!(u.segment_length, 400.0);
        assert_eq!(u.visible_max_depth, f32::MAX);
        assert_eq!(u.camera, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_counter_tracks_families() {
        let family = ItemFamily::new("sign", 1000.0, 80.0, 1);
        let segment = visible(0.0, 500.0);
        let batch = place_on(&segment, ItemSpacing::from(&family)).next().unwrap();
        let draw = BatchDraw {
            family_index: 2,
            family: &family,
            segment,
            batch,
            camera: Mat4::IDENTITY,
            camera_offset: 0.0,
            curvature_scale: 0.01,
        };

        let mut counter = DrawCounter::default();
        counter.draw_batch(&draw);
        counter.draw_segment(&SegmentDraw { segment, camera: Mat4::IDENTITY, camera_offset: 0.0 });
        assert_eq!(counter.batches, vec![0, 0, 1]);
        assert_eq!(counter.segments, 1);
        assert_eq!(counter.total_batches(), 1);
    }
}
