//! Periodic roadside items placed in batches along the road

pub mod family;
pub mod placement;

pub use family::{DepthWindow, ItemFamily, ItemLayer};
pub use placement::{
    batch_count_bound, place_items, place_on,
    ItemBatch, ItemBatches, ItemPlacement, ItemRange, ItemSpacing,
};
