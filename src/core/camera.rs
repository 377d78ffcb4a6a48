//! Chase camera for the road scene
//!
//! The road runs along +Y with +Z up. The camera sits `height` above the
//! road at the current camera offset, pitched to look down the road, with a
//! small vertical shake.

use serde::{Deserialize, Serialize};

use crate::core::types::{Mat4, Vec3};

/// Camera projection and placement parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadCamera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near clip plane
    pub near: f32,
    /// Eye height above the road surface
    pub height: f32,
    /// Vertical shake amplitude
    pub shake_amplitude: f32,
    /// Vertical shake angular rate (radians per second)
    pub shake_rate: f32,
}

impl Default for RoadCamera {
    fn default() -> Self {
        Self {
            fov_y: 0.6,
            near: 1.0,
            height: 2.5,
            shake_amplitude: 0.02,
            shake_rate: 2.31,
        }
    }
}

impl RoadCamera {
    /// Eye position at the given camera offset and time
    pub fn eye(&self, camera_offset: f64, now: f32) -> Vec3 {
        Vec3::new(
            0.0,
            camera_offset as f32,
            self.height - self.shake_amplitude * (now * self.shake_rate).cos(),
        )
    }

    /// Projection matrix (camera to clip space); `far` is the draw distance
    pub fn projection_matrix(&self, aspect: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, far)
    }

    /// View matrix: pitch the Z-up world into view space, then translate
    pub fn view_matrix(&self, camera_offset: f64, now: f32) -> Mat4 {
        let pitch = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        pitch * Mat4::from_translation(-self.eye(camera_offset, now))
    }

    /// Combined perspective × pitch × translation
    pub fn view_projection(&self, camera_offset: f64, now: f32, aspect: f32, far: f32) -> Mat4 {
        self.projection_matrix(aspect, far) * self.view_matrix(camera_offset, now)
    }
}
