//! Fixed-timestep scheduling
//!
//! Simulation advances in fixed steps while rendering happens once per
//! display frame. Leftover time is carried forward in an accumulator so a
//! tick never runs with a variable duration.

use std::time::{Duration, Instant};

use crate::core::error::Error;
use crate::core::types::Result;

/// Most ticks a single frame may request
pub const MAX_TICKS_PER_FRAME: u32 = 10_000;

/// Result of one scheduler update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Number of fixed ticks to run before rendering (may be zero)
    pub ticks: u32,
    /// Seconds since the first update
    pub now: f32,
}

/// Fixed-timestep accumulator driving tick and frame callbacks
pub struct FixedTimestep {
    step: f32,
    max_elapsed: f32,
    accumulator: f32,
    first_update: Option<Instant>,
    last_update: Option<Instant>,
    tick_count: u64,
    frame_count: u64,
}

impl FixedTimestep {
    /// Create a scheduler with the given step length (seconds).
    ///
    /// `initial_run` pre-loads the accumulator, so the first frame can
    /// already run ticks. Fails unless `step` is finite and > 0.
    pub fn new(step: f32, initial_run: f32) -> Result<Self> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "timestep must be finite and > 0, got {}",
                step
            )));
        }

        Ok(Self {
            step,
            max_elapsed: 0.1,
            accumulator: initial_run.max(0.0),
            first_update: None,
            last_update: None,
            tick_count: 0,
            frame_count: 0,
        })
    }

    /// Cap on wall time credited per frame (seconds). Longer stalls are clamped.
    pub fn with_max_elapsed(mut self, max_elapsed: f32) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Credit `elapsed` seconds and return how many ticks are due.
    ///
    /// Ticks run while the accumulator is strictly greater than one step.
    /// At most [`MAX_TICKS_PER_FRAME`] (or one stall's worth of steps, if
    /// fewer) are issued per call; time beyond that is dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let mut elapsed = elapsed.max(0.0);
        if elapsed > self.max_elapsed {
            log::warn!(
                "Frame took {:.3}s, clamping to {:.3}s",
                elapsed, self.max_elapsed
            );
            elapsed = self.max_elapsed;
        }

        self.accumulator += elapsed;

        let due = ((self.accumulator / self.step).ceil() - 1.0).max(0.0);
        let cap = (self.max_elapsed / self.step)
            .ceil()
            .max(1.0)
            .min(MAX_TICKS_PER_FRAME as f32);

        let ticks = due.min(cap) as u32;
        if due > cap {
            log::warn!("{} ticks due, running {}", due, ticks);
            self.accumulator = self.step;
        } else {
            self.accumulator = (self.accumulator - ticks as f32 * self.step).max(0.0);
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Call once per display frame with the current time
    pub fn update(&mut self, now: Instant) -> FrameStep {
        let elapsed = match self.last_update {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_update = Some(now);
        let first = *self.first_update.get_or_insert(now);

        let ticks = self.advance(elapsed.as_secs_f32());
        self.frame_count += 1;

        FrameStep {
            ticks,
            now: now.saturating_duration_since(first).as_secs_f32(),
        }
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over to the next frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }

    /// Total ticks issued
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Total frames issued
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0,
            max_elapsed: 0.1,
            accumulator: 0.0,
            first_update: None,
            last_update: None,
            tick_count: 0,
            frame_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ticks_below_step() {
        let mut timer = FixedTimestep::new(0.1, 0.0).unwrap();
        assert_eq!(timer.advance(0.05), 0);
        assert!((timer.leftover() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_leftover_carries_forward() {
        let mut timer = FixedTimestep::new(0.025, 0.0).unwrap();
        assert_eq!(timer.advance(0.06), 2);
        // 0.01 carried, next 0.02 pushes it over one step
        assert_eq!(timer.advance(0.02), 1);
        assert_eq!(timer.tick_count(), 3);
    }

    #[test]
    fn test_elapsed_is_clamped() {
        let mut timer = FixedTimestep::new(0.01, 0.0).unwrap().with_max_elapsed(0.1);
        let ticks = timer.advance(5.0);
        assert!(ticks <= 10);
        assert!(ticks >= 9);
    }

    #[test]
    fn test_initial_run_preloads() {
        let mut timer = FixedTimestep::new(0.01, 0.035).unwrap();
        assert_eq!(timer.advance(0.0), 3);
    }

    #[test]
    fn test_negative_elapsed_ignored() {
        let mut timer = FixedTimestep::new(0.01, 0.0).unwrap();
        assert_eq!(timer.advance(-1.0), 0);
        assert_eq!(timer.leftover(), 0.0);
    }

    #[test]
    fn test_update_reports_time_since_first() {
        let mut timer = FixedTimestep::new(0.01, 0.0).unwrap();
        let start = Instant::now();

        let first = timer.update(start);
        assert_eq!(first.ticks, 0);
        assert_eq!(first.now, 0.0);

        let second = timer.update(start + Duration::from_millis(50));
        assert!((second.now - 0.05).abs() < 1e-4);
        assert!(second.ticks >= 4 && second.ticks <= 5);
        assert_eq!(timer.frame_count(), 2);
    }

    #[test]
    fn test_rejects_non_positive_step() {
        assert!(matches!(FixedTimestep::new(0.0, 0.0), Err(Error::InvalidConfig(_))));
        assert!(FixedTimestep::new(-0.01, 0.0).is_err());
        assert!(FixedTimestep::new(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn test_tiny_step_is_capped() {
        // 1e-9 is below the f32 resolution of a 0.1 s accumulator
        let mut timer = FixedTimestep::new(1e-9, 0.0).unwrap();
        let ticks = timer.advance(0.1);
        assert_eq!(ticks, MAX_TICKS_PER_FRAME);
        assert!(timer.leftover() <= timer.step());
        assert_eq!(timer.advance(0.0), 0);
    }

    #[test]
    fn test_default_matches_sixty_hertz() {
        let mut timer = FixedTimestep::default();
        assert_eq!(timer.step(), 1.0 / 60.0);
        assert_eq!(timer.advance(0.04), 2);
    }
}
