//! Per-frame draw data
//!
//! A [`Frame`] borrows the scene read-only and exposes lazy sequences of
//! draw records. Nothing is cached: every sequence re-walks the stream, and
//! two walks of the same frame produce identical results.

use crate::core::types::Mat4;
use crate::items::placement::{place_on, ItemSpacing};
use crate::render::draw::{BatchDraw, DrawSink, SegmentDraw};
use crate::road::curve::VisibleSegment;
use crate::road::stream::SegmentStream;
use super::config::SceneConfig;

/// Read-only view of one rendered frame; `Copy`, iterator methods take a copy
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    config: &'a SceneConfig,
    stream: &'a SegmentStream,
    camera_offset: f64,
    now: f32,
    camera: Mat4,
}

impl<'a> Frame<'a> {
    pub fn new(
        config: &'a SceneConfig,
        stream: &'a SegmentStream,
        camera_offset: f64,
        now: f32,
        aspect: f32,
    ) -> Self {
        let camera = config.camera.view_projection(
            camera_offset,
            now,
            aspect,
            config.draw_distance as f32,
        );
        Self {
            config,
            stream,
            camera_offset,
            now,
            camera,
        }
    }

    /// Perspective × pitch × translation for this frame
    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    pub fn camera_offset(&self) -> f64 {
        self.camera_offset
    }

    /// Seconds since the first frame
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Visible segments with clipped ranges and curve state, near to far
    pub fn segments(self) -> impl Iterator<Item = VisibleSegment> + 'a {
        self.stream.walk(self.camera_offset, self.config.curvature_scale)
    }

    /// Road surface draws, one per visible segment
    pub fn segment_draws(self) -> impl Iterator<Item = SegmentDraw> + 'a {
        let camera = self.camera;
        let camera_offset = self.camera_offset;
        self.segments().map(move |segment| SegmentDraw {
            segment,
            camera,
            camera_offset,
        })
    }

    /// Batch draws of one family across all visible segments.
    ///
    /// Yields nothing for an unknown family index.
    pub fn batches(self, family_index: usize) -> impl Iterator<Item = BatchDraw<'a>> + 'a {
        let family = self.config.families.get(family_index);
        let camera = self.camera;
        let camera_offset = self.camera_offset;
        let curvature_scale = self.config.curvature_scale;

        family
            .into_iter()
            .flat_map(move |family| {
                let spacing = ItemSpacing::from(family);
                self.segments().flat_map(move |segment| {
                    place_on(&segment, spacing).map(move |batch| BatchDraw {
                        family_index,
                        family,
                        segment,
                        batch,
                        camera,
                        camera_offset,
                        curvature_scale,
                    })
                })
            })
    }

    /// Batch draws of every family, in configuration order
    pub fn all_batches(self) -> impl Iterator<Item = BatchDraw<'a>> + 'a {
        (0..self.config.families.len()).flat_map(move |index| self.batches(index))
    }

    /// Hand every draw of the frame to `sink`: road first, then items
    pub fn submit<S: DrawSink + ?Sized>(&self, sink: &mut S) {
        for draw in self.segment_draws() {
            sink.draw_segment(&draw);
        }
        for draw in self.all_batches() {
            sink.draw_batch(&draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::placement::ItemRange;
    use crate::render::draw::DrawCounter;
    use crate::scene::manager::RoadScene;

    #[test]
    fn test_frame_is_idempotent() {
        let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
        for _ in 0..500 {
            scene.tick().unwrap();
        }

        let frame = scene.frame(1.0, 1.5);
        let a: Vec<_> = frame.segments().collect();
        let b: Vec<_> = scene.frame(1.0, 1.5).segments().collect();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_segments_start_past_near_margin() {
        let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
        for _ in 0..1000 {
            scene.tick().unwrap();
        }
        let frame = scene.frame(0.0, 1.5);
        for segment in frame.segments() {
            assert!(segment.offset >= frame.camera_offset() + 3.0);
            assert!(segment.length > 0.0);
        }
    }

    #[test]
    fn test_batch_count_matches_placement() {
        let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
        for _ in 0..300 {
            scene.tick().unwrap();
        }
        let frame = scene.frame(0.0, 1.5);

        for (index, family) in scene.config().families.iter().enumerate() {
            let expected: u32 = frame
                .segments()
                .map(|seg| {
                    ItemRange::for_span(seg.offset, seg.length, family.spacing, family.offset)
                        .batch_count(family.batch_size)
                })
                .sum();
            assert_eq!(frame.batches(index).count(), expected as usize);
        }
    }

    #[test]
    fn test_submit_counts_every_draw() {
        let scene = RoadScene::new(SceneConfig::default()).unwrap();
        let frame = scene.frame(0.0, 1.5);

        let mut counter = DrawCounter::default();
        frame.submit(&mut counter);

        assert_eq!(counter.segments, frame.segments().count());
        assert_eq!(counter.total_batches(), frame.all_batches().count());
        assert_eq!(counter.batches[0], frame.batches(0).count());
    }

    #[test]
    fn test_unknown_family_is_empty() {
        let scene = RoadScene::new(SceneConfig::default()).unwrap();
        assert_eq!(scene.frame(0.0, 1.5).batches(42).count(), 0);
    }

    #[test]
    fn test_signs_every_kilometre() {
        let config = SceneConfig {
            draw_distance: 3000.0,
            ..Default::default()
        };
        let scene = RoadScene::new(config).unwrap();
        let frame = scene.frame(0.0, 1.5);
        let sign_index = scene
            .config()
            .families
            .iter()
            .position(|f| f.name == "sign")
            .unwrap();

        let positions: Vec<f64> = frame
            .batches(sign_index)
            .flat_map(|draw| draw.visible_items().map(|i| i.position).collect::<Vec<_>>())
            .collect();
        // the tail may reach past 3000, so there can be a fourth sign
        assert!(positions.starts_with(&[80.0, 1080.0, 2080.0]));
    }
}
