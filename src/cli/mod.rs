//! Command-line interface module.

mod args;

pub use args::{Cli, DEFAULT_CONFIG_NAME};
