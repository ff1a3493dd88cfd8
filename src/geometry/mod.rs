//! Measurement-to-geometry transforms.
//!
//! Everything here is a pure function of its inputs. Renderers consume the
//! coordinate arrays; no drawing happens in this crate.
//!
//! Submodules:
//! - `cross_section`: 2D primitives for one site.
//! - `interpolate`: resamples one site's readings across its width.
//! - `banks`: ground and bank meshes between neighbouring sites.
//! - `composite`: the assembled 3D profile for the whole study.

pub mod banks;
pub mod composite;
pub mod cross_section;
pub mod interpolate;

pub use composite::{CompositeProfile, build_composite};
pub use cross_section::{CrossSection, build_cross_section};
pub use interpolate::{DepthProfile, InterpolationKind, resample_site};
