/// Runtime configuration for the terminal front-end (not gameplay tuning).

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use thiserror::Error;

use crate::render::Skin;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// Smallest terminal that still shows every formation column apart; 24 rows
/// leaves a 22-row field under the HUD.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown skin '{0}' (expected neon or classic)")]
    UnknownSkin(String),

    #[error("fps must be between {min} and {max}, got {got}")]
    InvalidFps { got: u32, min: u32, max: u32 },

    #[error("terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}

#[derive(Debug, Parser)]
#[command(name = "space_invaders", about = "Space Invaders in the terminal")]
pub struct Cli {
    /// RNG seed for enemy fire; defaults to the current time.
    #[arg(long, env = "INVADERS_SEED")]
    pub seed: Option<u64>,

    /// Sprite skin: neon or classic.
    #[arg(long, default_value = "neon")]
    pub skin: Skin,

    /// Host frame rate.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Write logs here. Without it logging is off (stderr is the screen).
    #[arg(long, env = "INVADERS_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub seed: u64,
    pub skin: Skin,
    pub frame: Duration,
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::InvalidFps {
                got: self.fps,
                min: MIN_FPS,
                max: MAX_FPS,
            });
        }
        let seed = self.seed.unwrap_or_else(time_seed);
        Ok(Config {
            seed,
            skin: self.skin,
            frame: Duration::from_micros(1_000_000 / self.fps as u64),
            log_file: self.log_file,
        })
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

pub fn check_terminal(cols: u16, rows: u16) -> Result<(), ConfigError> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(ConfigError::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let cli = Cli::try_parse_from(["space_invaders", "--seed", "7"]).unwrap();
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.skin, Skin::Neon);
        assert_eq!(cfg.frame, Duration::from_micros(16_666));
    }

    #[test]
    fn skin_flag_parses() {
        let cli = Cli::try_parse_from(["space_invaders", "--skin", "classic"]).unwrap();
        assert_eq!(cli.skin, Skin::Classic);
        assert!(Cli::try_parse_from(["space_invaders", "--skin", "plaid"]).is_err());
    }

    #[test]
    fn fps_out_of_range_is_rejected() {
        let cli = Cli::try_parse_from(["space_invaders", "--fps", "0"]).unwrap();
        assert!(matches!(
            cli.into_config(),
            Err(ConfigError::InvalidFps { got: 0, .. })
        ));
    }

    #[test]
    fn small_terminal_is_rejected() {
        assert!(check_terminal(80, 24).is_ok());
        assert!(check_terminal(80, 23).is_err());
        let err = check_terminal(20, 40).unwrap_err();
        assert_eq!(err.to_string(), "terminal is 20x40, need at least 40x24");
    }
}
