mod config;
mod effects;
mod error;
mod graphics;
mod math;
mod presenter;
mod sector;
mod spin;
mod state;
mod surface;
mod widget;

use clap::Parser;
use config::Args;
use crossterm::{cursor, execute, terminal};
use effects::{Bell, Confetti, Silent, SoundPort};
use error::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spin::{RandomSource, SpinTuning};
use std::fs::File;
use std::io::{self, BufWriter};
use std::sync::Mutex;
use surface::Surface;
use widget::WheelWidget;

/// Restores the terminal however the widget exits
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(args: &Args) -> Result<()> {
    // stdout belongs to the wheel, so logs only go to a file
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(args.log_level())
            .init();
    }
    Ok(())
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    }
}

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let sectors = args.sectors()?;
    // Confetti gets its own stream so seeded spins do not depend on it
    let confetti = Confetti::new(random_source(args.seed.map(|seed| seed.wrapping_add(1))));
    let sound: Box<dyn SoundPort> = if args.mute {
        Box::new(Silent)
    } else {
        Box::new(Bell::new(io::stdout()))
    };
    let mut widget = WheelWidget::new(
        sectors,
        Surface::detect(),
        SpinTuning::default(),
        random_source(args.seed),
        sound,
        confetti,
        args.debug,
    )?;

    let _guard = TerminalGuard::enter()?;
    let mut out = BufWriter::new(io::stdout());
    let result = widget.run(&mut out, args.frame_interval());
    if let Err(err) = &result {
        tracing::error!(%err, "wheel stopped");
    }
    result
}
