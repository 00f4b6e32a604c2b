//! `real-gold` library crate.
//!
//! The binary (`gold`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - data sources can be swapped for fakes or snapshots
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
