//! Smart-home dashboard server library.
//!
//! This library polls device APIs, deduplicates the resulting snapshots and pushes
//! changes to browsers over Server-Sent Events, keeping the set of live
//! connections healthy with heartbeats and sweeps.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
