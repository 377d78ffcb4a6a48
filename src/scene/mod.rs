//! Scene management: configuration, the owning scene and per-frame views

pub mod config;
pub mod settings;
pub mod manager;
pub mod frame;

pub use config::SceneConfig;
pub use settings::parse_defines;
pub use manager::RoadScene;
pub use frame::Frame;
