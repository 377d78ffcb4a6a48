//! Core types and utilities shared by the road and item modules

pub mod types;
pub mod error;
pub mod logging;
pub mod time;
pub mod camera;

pub use types::*;
pub use error::Error;
