//! Segment generation policies
//!
//! A policy decides the length and curvature of each new segment. The
//! stream validates whatever the policy returns, so a policy only needs to
//! aim for positive lengths and bounded curvature.

use serde::{Deserialize, Serialize};

/// Length and curvature for the next segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentShape {
    pub length: f64,
    pub curvature: f64,
}

/// Chooses the shape of each generated segment
pub trait SegmentPolicy {
    /// Shape of the segment with the given sequence number (0 = first ever)
    fn next_shape(&mut self, sequence: u64) -> SegmentShape;
}

impl<F> SegmentPolicy for F
where
    F: FnMut(u64) -> SegmentShape,
{
    fn next_shape(&mut self, sequence: u64) -> SegmentShape {
        self(sequence)
    }
}

/// Parameters for [`HashSegmentPolicy`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Random seed
    pub seed: u32,
    /// Shortest segment length
    pub base_length: f64,
    /// Length increment between choices
    pub length_step: f64,
    /// Number of distinct lengths (`base_length + i * length_step`, i < steps)
    pub length_steps: u32,
    /// Curvature is drawn uniformly from `[-max_curvature, max_curvature]`
    pub max_curvature: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            base_length: 150.0,
            length_step: 50.0,
            length_steps: 8,
            max_curvature: 8.0,
        }
    }
}

/// Deterministic pseudo-random policy.
///
/// Lengths come from a small discrete set, curvature from a bounded range.
/// The same seed always produces the same road.
#[derive(Clone, Debug)]
pub struct HashSegmentPolicy {
    config: PolicyConfig,
}

impl HashSegmentPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Integer hash producing a value in [0, 1].
    fn hash_2d(ix: u32, iz: u32, seed: u32) -> f64 {
        let mut h = ix.wrapping_mul(374761393)
            .wrapping_add(iz.wrapping_mul(668265263))
            .wrapping_add(seed.wrapping_mul(1274126177));
        h = (h ^ (h >> 13)).wrapping_mul(1103515245);
        h = h ^ (h >> 16);
        (h & 0x7FFFFFFF) as f64 / 0x7FFFFFFF_u32 as f64
    }

    fn sample(&self, sequence: u64, channel: u32) -> f64 {
        // Fold the high half in so sequences past u32::MAX don't repeat
        let lo = sequence as u32;
        let hi = (sequence >> 32) as u32;
        Self::hash_2d(lo, channel, self.config.seed ^ hi.wrapping_mul(2654435761))
    }
}

impl Default for HashSegmentPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl SegmentPolicy for HashSegmentPolicy {
    fn next_shape(&mut self, sequence: u64) -> SegmentShape {
        let c = &self.config;
        let steps = c.length_steps.max(1);

        let pick = ((self.sample(sequence, 0) * steps as f64) as u32).min(steps - 1);
        let length = c.base_length + pick as f64 * c.length_step;
        let curvature = c.max_curvature * (self.sample(sequence, 1) * 2.0 - 1.0);

        SegmentShape { length, curvature }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_from_discrete_set() {
        let mut policy = HashSegmentPolicy::default();
        for seq in 0..500 {
            let shape = policy.next_shape(seq);
            let steps = (shape.length - 150.0) / 50.0;
            assert!(steps >= 0.0 && steps <= 7.0, "length {}", shape.length);
            assert_eq!(steps.fract(), 0.0);
        }
    }

    #[test]
    fn test_curvature_bounded() {
        let mut policy = HashSegmentPolicy::default();
        for seq in 0..500 {
            assert!(policy.next_shape(seq).curvature.abs() <= 8.0);
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let mut a = HashSegmentPolicy::default();
        let mut b = HashSegmentPolicy::default();
        let mut c = HashSegmentPolicy::new(PolicyConfig { seed: 99, ..Default::default() });

        let seq_a: Vec<_> = (0..32).map(|i| a.next_shape(i)).collect();
        let seq_b: Vec<_> = (0..32).map(|i| b.next_shape(i)).collect();
        let seq_c: Vec<_> = (0..32).map(|i| c.next_shape(i)).collect();
        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_c);
    }

    #[test]
    fn test_closure_policy() {
        let mut straight = |_seq: u64| SegmentShape { length: 100.0, curvature: 0.0 };
        assert_eq!(straight.next_shape(7).length, 100.0);
    }
}
