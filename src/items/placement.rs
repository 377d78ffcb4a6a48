//! Periodic item placement along a visible segment
//!
//! Item existence is derived from segment boundaries and a global phase
//! alone: nothing is stored between frames, so memory stays bounded no
//! matter how far the camera has driven.
//!
//! Item `i` of a family sits at `i * spacing + phase`. A segment owns the
//! indices whose position falls in `[offset, offset + length)`, i.e.
//! `[ceil((offset - phase) / spacing), ceil((offset + length - phase) / spacing))`.
//! Adjacent segments share a boundary, so every index has exactly one owner.

use crate::items::family::ItemFamily;
use crate::road::curve::VisibleSegment;
use crate::road::segment::CurveState;

/// Spacing parameters of one item family
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemSpacing {
    pub spacing: f64,
    pub phase: f64,
    pub batch_size: u32,
}

impl From<&ItemFamily> for ItemSpacing {
    fn from(family: &ItemFamily) -> Self {
        Self {
            spacing: family.spacing,
            phase: family.offset,
            batch_size: family.batch_size,
        }
    }
}

/// Half-open range of item indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemRange {
    pub start: i64,
    pub end: i64,
}

impl ItemRange {
    /// Indices whose nominal position lies in `[offset, offset + length)`
    pub fn for_span(offset: f64, length: f64, spacing: f64, phase: f64) -> Self {
        let start = ((offset - phase) / spacing).ceil() as i64;
        let end = ((offset + length - phase) / spacing).ceil() as i64;
        Self { start, end: end.max(start) }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start).max(0) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: i64) -> bool {
        index >= self.start && index < self.end
    }

    /// Batches needed to cover every index in the range
    pub fn batch_count(&self, batch_size: u32) -> u32 {
        let batch_size = u64::from(batch_size.max(1));
        u32::try_from(self.len().div_ceil(batch_size)).unwrap_or(u32::MAX)
    }
}

/// Upper bound on batches for a visible length: `ceil(length / (spacing * batch_size))`.
///
/// [`ItemRange::batch_count`] never exceeds this.
pub fn batch_count_bound(visible_length: f64, spacing: f64, batch_size: u32) -> u32 {
    (visible_length / (spacing * f64::from(batch_size.max(1)))).ceil().max(0.0) as u32
}

/// A resolved item slot within a batch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPlacement {
    /// Absolute item index
    pub index: i64,
    /// Slot within the batch (0..batch_size)
    pub slot: u32,
    /// Longitudinal road coordinate
    pub position: f64,
    /// Distance from the segment's visible offset
    pub depth: f64,
    /// Lateral curve-following offset
    pub lateral: f64,
    /// False for trailing slots past the segment's last owned index
    pub owned: bool,
}

/// One group of `batch_size` consecutive items drawn in a single invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemBatch {
    pub batch_index: u32,
    /// Indices owned by the segment (not just this batch)
    pub range: ItemRange,
    pub spacing: ItemSpacing,
    pub segment_offset: f64,
    pub curve: CurveState,
}

impl ItemBatch {
    /// First absolute index covered by this batch
    pub fn first_index(&self) -> i64 {
        self.range
            .start
            .saturating_add(i64::from(self.batch_index) * i64::from(self.spacing.batch_size))
    }

    /// Resolve one slot to its index, position and lateral offset.
    ///
    /// The lateral offset uses the segment's curve state; it is not
    /// re-accumulated per item.
    pub fn resolve(&self, slot: u32, curvature_scale: f64) -> ItemPlacement {
        let index = self.first_index().saturating_add(i64::from(slot));
        let position = index as f64 * self.spacing.spacing + self.spacing.phase;
        let depth = position - self.segment_offset;
        ItemPlacement {
            index,
            slot,
            position,
            depth,
            lateral: self.curve.lateral_at(depth, curvature_scale),
            owned: index < self.range.end,
        }
    }

    /// All slots of the batch, including unowned trailing ones
    pub fn slots(&self, curvature_scale: f64) -> impl Iterator<Item = ItemPlacement> + '_ {
        (0..self.spacing.batch_size).map(move |slot| self.resolve(slot, curvature_scale))
    }

    /// Only the slots this segment owns
    pub fn items(&self, curvature_scale: f64) -> impl Iterator<Item = ItemPlacement> + '_ {
        self.slots(curvature_scale).filter(|item| item.owned)
    }
}

/// Lazy sequence of batches for one segment and family
#[derive(Clone, Debug)]
pub struct ItemBatches {
    template: ItemBatch,
    next: u32,
    count: u32,
}

impl ItemBatches {
    /// Number of batches this sequence yields in total
    pub fn batch_count(&self) -> u32 {
        self.count
    }

    pub fn range(&self) -> ItemRange {
        self.template.range
    }
}

impl Iterator for ItemBatches {
    type Item = ItemBatch;

    fn next(&mut self) -> Option<ItemBatch> {
        if self.next >= self.count {
            return None;
        }
        let batch = ItemBatch {
            batch_index: self.next,
            ..self.template
        };
        self.next += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ItemBatches {}

/// Enumerate the batches of a family on one clipped segment
pub fn place_items(offset: f64, visible_length: f64, curve: CurveState, spacing: ItemSpacing) -> ItemBatches {
    let range = if visible_length > 0.0 {
        ItemRange::for_span(offset, visible_length, spacing.spacing, spacing.phase)
    } else {
        ItemRange { start: 0, end: 0 }
    };

    ItemBatches {
        template: ItemBatch {
            batch_index: 0,
            range,
            spacing,
            segment_offset: offset,
            curve,
        },
        next: 0,
        count: range.batch_count(spacing.batch_size),
    }
}

/// [`place_items`] on the clipped range produced by the curve walk
pub fn place_on(visible: &VisibleSegment, spacing: ItemSpacing) -> ItemBatches {
    place_items(visible.offset, visible.length, visible.curve, spacing)
}
