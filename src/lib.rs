//! Internal library crate for kaser.
//!
//! The shipped application is the `kaser` binary (`src/main.rs`).
//!
//! This library exists to share code between the binary and the integration tests.
//! It is not considered a library for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
