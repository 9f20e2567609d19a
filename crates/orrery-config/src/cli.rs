//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Args;

use crate::{Config, SizeScale};

/// Configuration overrides accepted on the command line.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default)]
pub struct CliArgs {
    /// Julian days advanced per frame (0 freezes time).
    #[arg(long)]
    pub bodies_speed: Option<u32>,

    /// Body size scale: a positive factor or `large`.
    #[arg(long, value_parser = parse_size_scale)]
    pub size_scale: Option<SizeScale>,

    /// Hide body labels.
    #[arg(long)]
    pub hide_labels: bool,

    /// Directory holding ephemeris batch files.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Julian day to start the simulated clock at.
    #[arg(long)]
    pub start_julian: Option<i64>,

    /// Load ephemeris batches on the calling thread.
    #[arg(long)]
    pub foreground_loading: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_size_scale(value: &str) -> Result<SizeScale, String> {
    value.parse().map_err(|e: crate::ConfigError| e.to_string())
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(speed) = args.bodies_speed {
            self.space.bodies_speed = speed;
        }
        if let Some(scale) = args.size_scale {
            self.space.bodies_size_scale = scale;
        }
        if args.hide_labels {
            self.space.show_labels = false;
        }
        if let Some(ref dir) = args.data_dir {
            self.ephemeris.data_dir = dir.clone();
        }
        if let Some(julian) = args.start_julian {
            self.ephemeris.start_julian = julian;
        }
        if args.foreground_loading {
            self.ephemeris.background_loading = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
