//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input observations (`PricePoint`, `CpiRecord`)
//! - engine outputs (`MergedRecord`, `YearlyCagr`, `Analysis`)
//! - run configuration (`RunConfig`, `InputSource`)

pub mod types;

pub use types::*;
