//! Best-effort side effects of a spin: sound and the confetti burst.

use crate::graphics::{Canvas, Rgb};
use crate::math::Point;
use crate::spin::RandomSource;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Sound played around a spin. Failures are reported but never fatal.
pub trait SoundPort {
    fn start_spin_loop(&mut self) -> io::Result<()>;
    fn stop_spin_loop(&mut self) -> io::Result<()>;
}

/// Plays nothing
pub struct Silent;

impl SoundPort for Silent {
    fn start_spin_loop(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn stop_spin_loop(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Terminal bell. A terminal cannot loop a sound, so only the stop rings.
pub struct Bell<W: Write> {
    out: W,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Bell { out }
    }
}

impl<W: Write> SoundPort for Bell<W> {
    fn start_spin_loop(&mut self) -> io::Result<()> {
        tracing::trace!("spin loop sound unavailable on a terminal bell");
        Ok(())
    }

    fn stop_spin_loop(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Logs and drops a side-effect failure
pub fn best_effort(what: &str, result: io::Result<()>) {
    if let Err(err) = result {
        tracing::debug!(%err, "{what} failed, ignoring");
    }
}

/// Parameters of one confetti burst
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub particle_count: usize,
    /// Width of the launch cone in degrees
    pub spread: f64,
    /// Vertical origin as a fraction of the surface height
    pub origin_y: f64,
}

/// The burst fired after every completed spin
pub const CELEBRATION: Burst = Burst {
    particle_count: 200,
    spread: 90.0,
    origin_y: 0.6,
};

const PALETTE: [Rgb; 7] = [
    Rgb::new(0x26, 0xcc, 0xff),
    Rgb::new(0xa2, 0x5a, 0xfd),
    Rgb::new(0xff, 0x5e, 0x7e),
    Rgb::new(0x88, 0xff, 0x5a),
    Rgb::new(0xfc, 0xff, 0x42),
    Rgb::new(0xff, 0xa6, 0x2d),
    Rgb::new(0xff, 0x36, 0xff),
];

const PARTICLE_LIFE: Duration = Duration::from_millis(2000);
/// Fraction of velocity kept after one second
const DRAG_PER_SECOND: f64 = 0.35;

struct Particle {
    position: Point,
    velocity: (f64, f64),
    color: Rgb,
    age: Duration,
}

/// Particle burst drawn over the wheel
pub struct Confetti {
    particles: Vec<Particle>,
    last_tick: Option<Instant>,
    rng: Box<dyn RandomSource>,
}

impl Confetti {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Confetti {
            particles: Vec::new(),
            last_tick: None,
            rng,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Launches `burst` upward from the horizontal center of a
    /// `width × height` pixel surface
    pub fn burst(&mut self, burst: Burst, width: f64, height: f64, now: Instant) {
        let origin = Point::new(width * 0.5, height * burst.origin_y);
        let half_spread = burst.spread.to_radians() / 2.0;
        let base_speed = height.max(1.0) * 1.4;
        for i in 0..burst.particle_count {
            let tilt = (self.rng.unit() * 2.0 - 1.0) * half_spread;
            let direction = -std::f64::consts::FRAC_PI_2 + tilt;
            let speed = base_speed * (0.45 + 0.55 * self.rng.unit());
            let (sin, cos) = direction.sin_cos();
            self.particles.push(Particle {
                position: origin,
                velocity: (cos * speed, sin * speed),
                color: PALETTE[i % PALETTE.len()],
                age: Duration::ZERO,
            });
        }
        self.last_tick = Some(now);
        tracing::debug!(particles = burst.particle_count, "confetti burst");
    }

    /// Advances every particle to `now` and drops the expired ones
    pub fn tick(&mut self, now: Instant, height: f64) {
        let Some(last) = self.last_tick.replace(now) else {
            return;
        };
        let dt = now.saturating_duration_since(last);
        let secs = dt.as_secs_f64();
        let gravity = height.max(1.0) * 1.2;
        let drag = DRAG_PER_SECOND.powf(secs);
        for particle in &mut self.particles {
            particle.velocity.0 *= drag;
            particle.velocity.1 = particle.velocity.1 * drag + gravity * secs;
            particle.position.x += particle.velocity.0 * secs;
            particle.position.y += particle.velocity.1 * secs;
            particle.age += dt;
        }
        self.particles
            .retain(|p| p.age < PARTICLE_LIFE && p.position.y < height + 1.0);
    }

    /// Draws live particles, dimming them as they age
    pub fn draw(&self, canvas: &mut Canvas) {
        for particle in &self.particles {
            let remaining = 1.0 - particle.age.as_secs_f64() / PARTICLE_LIFE.as_secs_f64();
            let color = particle.color.shade(0.4 + 0.6 * remaining);
            canvas.set_pixel(
                particle.position.x.floor() as isize,
                particle.position.y.floor() as isize,
                color,
            );
        }
    }
}
