//! Spin controller: the Idle → Spinning → Settling → Idle state machine.
//!
//! The controller never touches the terminal, the clock or a random number
//! generator directly. Frame pacing, redraws and sound go through
//! [`SpinHost`]; every random draw goes through [`RandomSource`]. Each step
//! asks the host for at most one further frame, so steps never overlap.

use crate::error::Result;
use crate::math::{bounce_offset, ease_out_cubic, resolve_sector, sector_width, POINTER_ANGLE};
use crate::state::{Phase, Settle, SpinState};
use std::f64::consts::TAU;
use std::ops::Range;
use std::time::{Duration, Instant};

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource {
    fn unit(&mut self) -> f64;
}

impl<R: rand::Rng> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Capabilities the controller needs from whoever drives it
pub trait SpinHost {
    /// Run one more [`SpinController::step`] on the next frame
    fn request_frame(&mut self);
    /// Draw the wheel at `angle` now
    fn redraw(&mut self, angle: f64);
    /// Best effort; must not fail
    fn spin_started(&mut self) {}
    /// Best effort; must not fail
    fn spin_stopped(&mut self) {}
    /// The wheel came to rest with sector `index` under the pointer
    fn landed(&mut self, index: usize);
}

/// Timing and randomization ranges of a spin
#[derive(Clone, Debug, PartialEq)]
pub struct SpinTuning {
    pub min_full_rotations: f64,
    /// Upper bound of the uniformly drawn extra rotations
    pub max_extra_rotations: f64,
    pub duration: Range<Duration>,
    pub overshoot: Range<f64>,
    pub bounce_duration: Duration,
}

impl Default for SpinTuning {
    fn default() -> Self {
        SpinTuning {
            min_full_rotations: 5.0,
            max_extra_rotations: 3.0,
            duration: Duration::from_millis(4500)..Duration::from_millis(5700),
            overshoot: 0.02..0.08,
            bounce_duration: Duration::from_millis(360),
        }
    }
}

pub struct SpinController {
    state: SpinState,
    tuning: SpinTuning,
    sector_count: usize,
    sector_width: f64,
    rng: Box<dyn RandomSource>,
}

impl SpinController {
    /// Creates an idle controller for a wheel of `sector_count` sectors
    pub fn new(
        sector_count: usize,
        tuning: SpinTuning,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        Ok(SpinController {
            state: SpinState::default(),
            tuning,
            sector_count,
            sector_width: sector_width(sector_count)?,
            rng,
        })
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    /// Sector currently under the pointer
    pub fn current_sector(&self) -> usize {
        resolve_sector(
            self.state.current_angle,
            POINTER_ANGLE,
            self.sector_width,
            self.sector_count,
        )
    }

    /// Starts a spin. Returns `false` and changes nothing unless idle.
    pub fn trigger(&mut self, host: &mut impl SpinHost) -> bool {
        if self.state.phase != Phase::Idle {
            tracing::trace!(phase = self.state.phase.name(), "trigger ignored");
            return false;
        }

        let extra_rotations = self.rng.unit() * self.tuning.max_extra_rotations;
        let offset = self.rng.unit() * TAU;
        let duration = lerp_duration(&self.tuning.duration, self.rng.unit());

        let start = self.state.current_angle;
        let target = start + (self.tuning.min_full_rotations + extra_rotations) * TAU + offset;
        self.state = SpinState {
            phase: Phase::Spinning,
            current_angle: start,
            start_angle: start,
            target_angle: target,
            start_timestamp: None,
            duration,
        };
        tracing::debug!(start, target, ?duration, "spin started");

        host.spin_started();
        host.request_frame();
        true
    }

    /// Advances the animation to frame time `now`
    pub fn step(&mut self, now: Instant, host: &mut impl SpinHost) {
        match self.state.phase {
            Phase::Idle => {}
            Phase::Spinning => self.step_spinning(now, host),
            Phase::Settling(settle) => self.step_settling(settle, now, host),
        }
    }

    fn step_spinning(&mut self, now: Instant, host: &mut impl SpinHost) {
        let started = *self.state.start_timestamp.get_or_insert(now);
        let progress = progress(now.saturating_duration_since(started), self.state.duration);
        let eased = ease_out_cubic(progress);
        let state = &mut self.state;
        state.current_angle = state.start_angle + (state.target_angle - state.start_angle) * eased;
        host.redraw(state.current_angle);

        if progress < 1.0 {
            host.request_frame();
            return;
        }

        host.spin_stopped();
        let overshoot = lerp(&self.tuning.overshoot, self.rng.unit());
        let state = &mut self.state;
        state.phase = Phase::Settling(Settle {
            base: state.current_angle,
            overshoot,
            started: now,
        });
        tracing::debug!(angle = state.current_angle, overshoot, "spin stopped, settling");
        host.request_frame();
    }

    fn step_settling(&mut self, settle: Settle, now: Instant, host: &mut impl SpinHost) {
        let p = progress(
            now.saturating_duration_since(settle.started),
            self.tuning.bounce_duration,
        );
        self.state.current_angle = settle.base + bounce_offset(p, settle.overshoot);
        host.redraw(self.state.current_angle);

        if p < 1.0 {
            host.request_frame();
            return;
        }

        self.state.phase = Phase::Idle;
        let index = self.current_sector();
        tracing::debug!(angle = self.state.current_angle, index, "wheel at rest");
        host.landed(index);
    }
}

/// `elapsed / total` clamped to `[0, 1]`; an empty span is complete at once
fn progress(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0)
}

fn lerp(range: &Range<f64>, t: f64) -> f64 {
    range.start + (range.end - range.start) * t
}

fn lerp_duration(range: &Range<Duration>, t: f64) -> Duration {
    let span = range.end.saturating_sub(range.start);
    range.start + Duration::from_nanos((span.as_nanos() as f64 * t) as u64)
}

#[cfg(test)]
#[path = "spin_test.rs"]
mod tests;
