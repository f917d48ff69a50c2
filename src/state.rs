use std::time::{Duration, Instant};

/// Phase of the spin state machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Spinning,
    /// Bouncing back after the spin stopped
    Settling(Settle),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Spinning => "Spinning",
            Phase::Settling(_) => "Settling",
        }
    }
}

/// Bounce parameters frozen when the main spin ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settle {
    /// Angle at the moment the spin stopped
    pub base: f64,
    /// Peak height of the bounce in radians
    pub overshoot: f64,
    /// Frame time the bounce started at
    pub started: Instant,
}

/// Spin state
#[derive(Clone, Debug, PartialEq)]
pub struct SpinState {
    pub phase: Phase,
    /// Current rotation angle of the wheel, the only angle the renderer reads
    pub current_angle: f64,
    /// Angle the current spin started from
    pub start_angle: f64,
    /// Angle the current spin decelerates into
    pub target_angle: f64,
    /// Time of the first frame of the current spin
    pub start_timestamp: Option<Instant>,
    /// Length of the decelerating part of the spin
    pub duration: Duration,
}

impl Default for SpinState {
    fn default() -> Self {
        SpinState {
            phase: Phase::Idle,
            current_angle: 0.0,
            start_angle: 0.0,
            target_angle: 0.0,
            start_timestamp: None,
            duration: Duration::ZERO,
        }
    }
}
