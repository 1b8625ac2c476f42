//! Scheduled checker for the published PGSharp version.
//!
//! Each invocation runs the [`monitor::runner::Monitor`] pipeline once and exits.

pub mod config;
pub mod logging;
pub mod monitor;
