//! Form state handling for the measurement study.
//!
//! Submodules:
//! - `inputs`: clamps raw widget values into their allowed ranges and
//!   supplies the prefill values for empty sites.
//! - `reducer`: turns one user edit into the next `Study`.

pub mod inputs;
pub mod reducer;

pub use reducer::{ResetScope, StudyChange, apply_change, reset_scope};
