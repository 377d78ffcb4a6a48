//! Pursuit - procedural generator for an endless curving highway
//!
//! The road is a stream of constant-curvature segments generated just ahead
//! of the camera and evicted once passed. Each frame the stream is walked to
//! clip segments against the camera plane and integrate curvature, and
//! repeating roadside items are derived from segment boundaries in batches.
//! Drawing is left to the caller, which consumes the per-frame records.
//!
//! ```
//! use pursuit::render::DrawCounter;
//! use pursuit::scene::{RoadScene, SceneConfig};
//!
//! let mut scene = RoadScene::new(SceneConfig::default()).unwrap();
//! for _ in 0..120 {
//!     scene.tick().unwrap();
//! }
//!
//! let mut counter = DrawCounter::default();
//! scene.frame(2.0, 16.0 / 9.0).submit(&mut counter);
//! assert!(counter.segments > 0);
//! ```

pub mod core;
pub mod road;
pub mod items;
pub mod render;
pub mod scene;
