//! River cross-section study tool.
//!
//! Collects width and depth readings for a handful of sites along a river
//! and turns them into plot-ready geometry: a 2D cross-section per site, a
//! composite 3D river profile across all sites, and a CSV table of the raw
//! readings.
//!
//! Modules:
//! - `model`: sites, the study, geometry value types, limits.
//! - `form`: input clamping and the reset-on-change reducer.
//! - `geometry`: cross-section, interpolation, bank and composite builders.
//! - `export`: measurement table and CSV download.
//! - `session`: per-user state and view recomputation.
//! - `config`: TOML and environment configuration.
//! - `logging`: structured console/file logging.

pub mod config;
pub mod export;
pub mod form;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod session;
