//! Shared utilities for the homedash crates.

pub mod logger;
pub mod time;
