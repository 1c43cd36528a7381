//! Miscellaneous utilities for kaser.
//!
//! - [cli]: argument parsing, `--help`, `--init` and `--keybinds`
//! - [helpers]: color parsing, recursive copy and home directory handling
//! - [logging]: the optional tracing file subscriber

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{copy_recursive, expand_home, get_home, parse_color, shorten_home_path};
