//! Scene configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::camera::RoadCamera;
use crate::core::time::MAX_TICKS_PER_FRAME;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::items::family::ItemFamily;
use crate::road::policy::PolicyConfig;
use crate::road::stream::StreamConfig;

/// Configuration for a road scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// How far ahead segments are generated; also the camera far plane
    pub draw_distance: f64,
    /// Camera-plane safety clip distance (> 0)
    pub near_margin: f64,
    /// Slack past the near margin before a segment is evicted
    pub eviction_slack: f64,
    /// Curvature-to-offset integration constant
    pub curvature_scale: f64,
    /// Largest absolute curvature the stream accepts
    pub max_curvature: f64,
    /// Fixed simulation step in seconds
    pub step_seconds: f32,
    /// Longest frame the scheduler credits before clamping (seconds)
    pub max_frame_seconds: f32,
    /// Camera speed in distance units per second
    pub speed: f64,
    /// Camera placement
    pub camera: RoadCamera,
    /// Default segment generation policy
    pub policy: PolicyConfig,
    /// Roadside item families, drawn in this order
    pub families: Vec<ItemFamily>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            draw_distance: 800.0,
            near_margin: 3.0,
            eviction_slack: 0.1,
            curvature_scale: 0.01,
            max_curvature: 8.0,
            step_seconds: 1.0 / 60.0,
            max_frame_seconds: 0.1,
            speed: 90.0 / 3.6, // 90 km/h
            camera: RoadCamera::default(),
            policy: PolicyConfig::default(),
            families: ItemFamily::defaults(),
        }
    }
}

impl SceneConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!(
            "Loaded scene config from {} ({} item families)",
            path.display(), config.families.len()
        );
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Bounds used by the segment stream
    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            near_margin: self.near_margin,
            eviction_slack: self.eviction_slack,
            max_curvature: self.max_curvature,
        }
    }

    pub fn family(&self, name: &str) -> Option<&ItemFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    pub fn family_mut(&mut self, name: &str) -> Option<&mut ItemFamily> {
        self.families.iter_mut().find(|f| f.name == name)
    }

    /// Check every parameter against its constraint
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: String) -> Result<()> {
            Err(Error::InvalidConfig(msg))
        }

        if !(self.near_margin > 0.0) {
            return invalid(format!("near_margin must be > 0, got {}", self.near_margin));
        }
        if !(self.eviction_slack >= 0.0) {
            return invalid(format!("eviction_slack must be >= 0, got {}", self.eviction_slack));
        }
        if !(self.draw_distance > self.near_margin + self.eviction_slack) {
            return invalid(format!(
                "draw_distance {} must exceed near_margin + eviction_slack",
                self.draw_distance
            ));
        }
        if !(self.curvature_scale > 0.0) || !self.curvature_scale.is_finite() {
            return invalid(format!("curvature_scale must be > 0, got {}", self.curvature_scale));
        }
        if !(self.max_curvature >= 0.0) {
            return invalid(format!("max_curvature must be >= 0, got {}", self.max_curvature));
        }
        if !(self.step_seconds > 0.0) {
            return invalid(format!("step_seconds must be > 0, got {}", self.step_seconds));
        }
        if !(self.max_frame_seconds >= self.step_seconds) {
            return invalid(format!(
                "max_frame_seconds {} must be >= step_seconds {}",
                self.max_frame_seconds, self.step_seconds
            ));
        }
        if !(self.max_frame_seconds / self.step_seconds <= MAX_TICKS_PER_FRAME as f32) {
            return invalid(format!(
                "step_seconds {} allows more than {} ticks per frame",
                self.step_seconds, MAX_TICKS_PER_FRAME
            ));
        }
        if !self.speed.is_finite() {
            return invalid("speed must be finite".to_string());
        }
        if !(self.policy.base_length > 0.0) || !(self.policy.length_step >= 0.0) {
            return invalid("policy lengths must be positive".to_string());
        }
        if self.policy.max_curvature.abs() > self.max_curvature {
            return invalid(format!(
                "policy max_curvature {} exceeds max_curvature {}",
                self.policy.max_curvature, self.max_curvature
            ));
        }

        for family in &self.families {
            family.validate()?;
        }
        Ok(())
    }
}
