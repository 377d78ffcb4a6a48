//! Periodic roadside item families (light posts, fence panels, signs)
//!
//! A family places one item every `spacing` units along the road, shifted
//! by a global phase `offset`. Items are drawn in fixed-size batches. How an
//! item looks is described by its layers; the renderer draws every layer for
//! every batch.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Depth range (relative to the camera offset) in which a family is drawn
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthWindow {
    pub min: f64,
    pub max: f64,
}

impl DepthWindow {
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min && depth <= self.max
    }
}

/// One drawable part of an item (post, lamp head, sign board...)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemLayer {
    pub name: String,
    /// Center relative to the item's road position (lateral, longitudinal, up)
    pub center: [f32; 3],
    /// Half extents of the billboard quad (lateral, up)
    pub size: [f32; 2],
    /// Linear RGB
    pub color: [f32; 3],
}

impl ItemLayer {
    pub fn new(name: impl Into<String>, center: [f32; 3], size: [f32; 2], color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            color,
        }
    }
}

/// Placement and appearance of a periodic item type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemFamily {
    pub name: String,
    /// Distance between consecutive items
    pub spacing: f64,
    /// Phase: item `i` sits at `i * spacing + offset`
    pub offset: f64,
    /// Items per draw invocation
    pub batch_size: u32,
    /// Optional far/near cull window independent of the road draw distance
    #[serde(default)]
    pub depth_window: Option<DepthWindow>,
    #[serde(default)]
    pub layers: Vec<ItemLayer>,
}

impl ItemFamily {
    pub fn new(name: impl Into<String>, spacing: f64, offset: f64, batch_size: u32) -> Self {
        Self {
            name: name.into(),
            spacing,
            offset,
            batch_size,
            depth_window: None,
            layers: Vec::new(),
        }
    }

    pub fn with_depth_window(mut self, min: f64, max: f64) -> Self {
        self.depth_window = Some(DepthWindow { min, max });
        self
    }

    pub fn with_layer(mut self, layer: ItemLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Check spacing, batch size and depth window
    pub fn validate(&self) -> Result<()> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "family '{}': spacing must be > 0, got {}",
                self.name, self.spacing
            )));
        }
        if !self.offset.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "family '{}': offset must be finite",
                self.name
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "family '{}': batch size must be >= 1",
                self.name
            )));
        }
        if let Some(window) = self.depth_window {
            if !(window.min <= window.max) {
                return Err(Error::InvalidConfig(format!(
                    "family '{}': depth window [{}, {}] is empty",
                    self.name, window.min, window.max
                )));
            }
        }
        Ok(())
    }

    /// Light posts with a pole, a top arm and a lamp
    pub fn light_posts() -> Self {
        Self::new("light", 50.0, 12.5, 4)
            .with_layer(ItemLayer::new("post", [-7.0, 0.0, 4.0], [0.08, 4.0], [0.35, 0.36, 0.4]))
            .with_layer(ItemLayer::new("post_top", [-6.2, 0.0, 8.0], [0.8, 0.08], [0.35, 0.36, 0.4]))
            .with_layer(ItemLayer::new("post_light", [-5.6, 0.0, 7.9], [0.3, 0.06], [1.0, 0.95, 0.8]))
    }

    /// Low fence along the shoulder; only drawn close to the camera
    pub fn fence() -> Self {
        Self::new("fence", 2.5, 0.0, 32)
            .with_depth_window(0.0, 200.0)
            .with_layer(ItemLayer::new("fence_panel", [7.5, 0.0, 0.5], [0.05, 0.5], [0.5, 0.48, 0.45]))
    }

    /// Large overhead-style sign every kilometre
    pub fn signs() -> Self {
        let (width, height) = (4.0_f32, 2.0_f32);
        Self::new("sign", 1000.0, 80.0, 1)
            .with_layer(ItemLayer::new(
                "sign_board",
                [-7.8, 0.0, 0.5 + height * 0.5],
                [width * 0.5, height * 0.5],
                [0.2, 0.35, 0.3],
            ))
    }

    /// The family set a default scene is decorated with
    pub fn defaults() -> Vec<Self> {
        vec![Self::light_posts(), Self::fence(), Self::signs()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for family in ItemFamily::defaults() {
            family.validate().unwrap();
            assert!(!family.layers.is_empty());
        }
    }

    #[test]
    fn test_rejects_bad_spacing() {
        let family = ItemFamily::new("bad", 0.0, 0.0, 4);
        assert!(matches!(family.validate(), Err(Error::InvalidConfig(_))));
        let family = ItemFamily::new("bad", -3.0, 0.0, 4);
        assert!(family.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_batch() {
        assert!(ItemFamily::new("bad", 10.0, 0.0, 0).validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_window() {
        let family = ItemFamily::new("bad", 10.0, 0.0, 1).with_depth_window(100.0, 10.0);
        assert!(family.validate().is_err());
    }

    #[test]
    fn test_depth_window_contains() {
        let window = DepthWindow { min: 0.0, max: 200.0 };
        assert!(window.contains(0.0));
        assert!(window.contains(200.0));
        assert!(!window.contains(200.5));
        assert!(!window.contains(-1.0));
    }

    #[test]
    fn test_family_json() {
        let json = r#"{ "name": "reflector", "spacing": 25.0, "offset": 5.0, "batch_size": 8 }"#;
        let family: ItemFamily = serde_json::from_str(json).unwrap();
        assert_eq!(family.batch_size, 8);
        assert!(family.depth_window.is_none());
        assert!(family.layers.is_empty());
        family.validate().unwrap();
    }
}
