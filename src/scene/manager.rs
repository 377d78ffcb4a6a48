//! Road scene: owns the segment stream and the camera offset

use std::time::Instant;

use crate::core::time::FixedTimestep;
use crate::core::types::Result;
use crate::road::policy::{HashSegmentPolicy, SegmentPolicy};
use crate::road::stream::{AdvanceReport, SegmentStream};
use super::config::SceneConfig;
use super::frame::Frame;

/// An independent endless-road scene.
///
/// `tick` mutates (camera offset and stream); `frame` only reads, so any
/// number of frames can be built between ticks and they all agree.
pub struct RoadScene<P: SegmentPolicy = HashSegmentPolicy> {
    config: SceneConfig,
    stream: SegmentStream,
    policy: P,
    camera_offset: f64,
    ticks: u64,
}

impl RoadScene<HashSegmentPolicy> {
    /// Create a scene using the configured hash policy
    pub fn new(config: SceneConfig) -> Result<Self> {
        let policy = HashSegmentPolicy::new(config.policy.clone());
        Self::with_policy(config, policy)
    }
}

impl<P: SegmentPolicy> RoadScene<P> {
    /// Create a scene with a custom segment policy.
    ///
    /// The stream is filled up to the draw distance immediately, so the
    /// first frame already has road to show.
    pub fn with_policy(config: SceneConfig, policy: P) -> Result<Self> {
        config.validate()?;

        let mut scene = Self {
            stream: SegmentStream::new(config.stream_config()),
            config,
            policy,
            camera_offset: 0.0,
            ticks: 0,
        };
        scene.advance(0.0)?;

        log::info!(
            "Road scene ready: draw distance {}, {} segments, {} item families",
            scene.config.draw_distance,
            scene.stream.len(),
            scene.config.families.len()
        );
        Ok(scene)
    }

    /// Move the camera to `camera_offset` and bring the stream up to date
    pub fn advance(&mut self, camera_offset: f64) -> Result<AdvanceReport> {
        self.camera_offset = camera_offset;
        self.stream.advance(camera_offset, self.config.draw_distance, &mut self.policy)
    }

    /// One fixed simulation step: move the camera forward at `speed`
    pub fn tick(&mut self) -> Result<AdvanceReport> {
        self.ticks += 1;
        let offset = self.camera_offset + self.config.speed * f64::from(self.config.step_seconds);
        self.advance(offset)
    }

    /// Build this frame's draw data. `now` is seconds since the first frame.
    pub fn frame(&self, now: f32, aspect: f32) -> Frame<'_> {
        Frame::new(&self.config, &self.stream, self.camera_offset, now, aspect)
    }

    /// Alias of [`RoadScene::frame`] matching the scheduler contract
    pub fn render(&self, now: f32, aspect: f32) -> Frame<'_> {
        self.frame(now, aspect)
    }

    /// Run the ticks due at `now`, then build the frame
    pub fn step(&mut self, timer: &mut FixedTimestep, now: Instant, aspect: f32) -> Result<Frame<'_>> {
        let step = timer.update(now);
        for _ in 0..step.ticks {
            self.tick()?;
        }
        Ok(self.frame(step.now, aspect))
    }

    /// Scheduler matching this scene's step settings
    pub fn timer(&self) -> Result<FixedTimestep> {
        Ok(FixedTimestep::new(self.config.step_seconds, 0.0)?
            .with_max_elapsed(self.config.max_frame_seconds))
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn stream(&self) -> &SegmentStream {
        &self.stream
    }

    pub fn camera_offset(&self) -> f64 {
        self.camera_offset
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::policy::SegmentShape;

    #[test]
    fn test_new_scene_fills_draw_distance() {
        let scene = RoadScene::new(SceneConfig::default()).unwrap();
        assert!(!scene.stream().is_empty());
        assert!(scene.stream().tail_end() >= 800.0);
        assert_eq!(scene.camera_offset(), 0.0);
    }

    #[test]
    fn test_tick_moves_camera() {
        let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
        for _ in 0..60 {
            scene.tick().unwrap();
        }
        // one second at 25 m/s
        assert!((scene.camera_offset() - 25.0).abs() < 1e-4);
        assert_eq!(scene.tick_count(), 60);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SceneConfig { near_margin: -1.0, ..Default::default() };
        assert!(RoadScene::new(config).is_err());
    }

    #[test]
    fn test_tiny_step_rejected_before_scheduling() {
        let config = SceneConfig { step_seconds: 1e-9, ..Default::default() };
        assert!(RoadScene::new(config).is_err());
    }

    #[test]
    fn test_custom_policy() {
        let straight = |_seq: u64| SegmentShape { length: 100.0, curvature: 0.0 };
        let scene = RoadScene::with_policy(SceneConfig::default(), straight).unwrap();
        assert_eq!(scene.stream().len(), 8);
        assert!(scene.stream().iter().all(|s| s.curvature() == 0.0));
    }

    #[test]
    fn test_step_runs_due_ticks() {
        let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
        let mut timer = scene.timer().unwrap();
        let start = Instant::now();

        scene.step(&mut timer, start, 1.5).unwrap();
        assert_eq!(scene.tick_count(), 0);

        let frame_now = scene
            .step(&mut timer, start + std::time::Duration::from_millis(100), 1.5)
            .unwrap()
            .now();
        assert!((frame_now - 0.1).abs() < 1e-3);
        assert!(scene.tick_count() >= 5 && scene.tick_count() <= 6);
    }
}
