//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Snapshot the routes of a built single-page site into static html.
///
/// Run once after the site bundler has produced its output directory.
/// With no flags, reads `prerender.toml` if one is found and otherwise uses
/// the built-in route table.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: prerender.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Build output directory holding index.html (default: dist)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Port for the local origin server (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip the headless browser and write meta-only html for every route
    #[arg(long)]
    pub no_browser: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "prerender.toml";
