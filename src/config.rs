use crate::error::Result;
use crate::sector::{self, Sector};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Spin a category wheel in the terminal
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Sector as LABEL:#RRGGBB:ICON; repeat to replace the default categories
    #[arg(long = "sector", value_name = "SECTOR")]
    pub sectors: Vec<String>,

    /// Seed for reproducible spins
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub mute: bool,

    /// Frames per second of the animation loop
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Start with the debug overlay enabled
    #[arg(long)]
    pub debug: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Sectors from the command line, or the defaults
    pub fn sectors(&self) -> Result<Vec<Sector>> {
        if self.sectors.is_empty() {
            return Ok(sector::default_sectors());
        }
        let parsed = self
            .sectors
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Sector>>>()?;
        sector::validate(parsed)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WheelError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wheelspin").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.sectors().unwrap().len(), 5);
        assert_eq!(args.frame_interval(), Duration::from_secs(1) / 60);
        assert_eq!(args.log_level(), tracing::Level::WARN);
        assert!(!args.mute);
        assert!(args.seed.is_none());
    }

    #[test]
    fn custom_sectors_replace_defaults() {
        let args = parse(&["--sector", "Yes:#00ff00:+", "--sector", "No:#ff0000:-"]);
        let sectors = args.sectors().unwrap();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[1].label, "No");
    }

    #[test]
    fn bad_sector_fails() {
        let args = parse(&["--sector", "Yes"]);
        assert!(matches!(args.sectors(), Err(WheelError::InvalidSector(_))));
    }

    #[test]
    fn fps_is_bounded() {
        assert!(Args::try_parse_from(["wheelspin", "--fps", "0"]).is_err());
        assert!(Args::try_parse_from(["wheelspin", "--fps", "500"]).is_err());
        assert_eq!(parse(&["--fps", "30"]).frame_interval(), Duration::from_secs(1) / 30);
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).log_level(), tracing::Level::DEBUG);
        assert_eq!(parse(&["-vvvv"]).log_level(), tracing::Level::TRACE);
    }
}
