use std::path::PathBuf;

use clap::Parser;

use crate::color::ColorMode;
use crate::config::CheckerConfig;

/// Check paired proto/names tables for duplicate and missing keys.
#[derive(Debug, Parser)]
#[command(name = "proto-checker", version, about)]
pub struct Cli {
    /// Directory holding the tables (overrides the config file)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Plain-text log written at the end of the run (overrides the config file)
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Console coloring
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Exit with status 1 when duplicates or missing keys are found
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, config: &mut CheckerConfig) {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
    }
}
