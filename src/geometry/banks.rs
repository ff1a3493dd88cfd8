//! Synthetic ground geometry between consecutive sites.
//!
//! For each pair of neighbouring sites the composite view draws three
//! surfaces that make the channel look cut into the ground: a left bank,
//! a mirrored right bank, and a flat floor under the riverbed. Widths are
//! blended linearly between the two sites along the site axis.

use serde::{Deserialize, Serialize};

use crate::form::inputs::linspace;
use crate::model::{
    BANK_EXTENSION_RATIO, BANK_HEIGHT, BANK_SLOPE_RATIO, BOTTOM_STRIP_POINTS, GROUND_DEPTH_RATIO,
    Point3, Site, SurfaceGrid,
};

/// Positions along the site axis, as fractions between two sites, at which
/// bank profiles are taken.
pub const BANK_PROFILE_FRACTIONS: [f64; 3] = [0.0, 0.5, 1.0];

/// Vertices in one bank profile.
pub const BANK_PROFILE_POINTS: usize = 6;

/// Lateral reach of the synthetic banks beyond each edge of the river.
pub fn bank_extension(max_width: f64) -> f64 {
    BANK_EXTENSION_RATIO * max_width
}

/// Which side of the channel a bank strip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankSide {
    Left,
    Right,
}

/// Ground surfaces joining site `index` to site `index + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    /// Index of the upstream site of the pair.
    pub index: usize,
    /// Deeper of the two sites' deepest readings.
    pub max_depth: f64,
    /// 3×6 left bank mesh.
    pub left_bank: SurfaceGrid,
    /// 3×6 right bank mesh.
    pub right_bank: SurfaceGrid,
    /// 2×10 floor mesh under the channel.
    pub bottom: SurfaceGrid,
}

/// Builds the ground surfaces between `current` (at site axis `index`) and
/// `next` (at `index + 1`). `bank_extension` comes from the widest site in
/// the whole study.
pub fn ground_segment(
    index: usize,
    current: &Site,
    next: &Site,
    bank_extension: f64,
) -> GroundSegment {
    let max_depth = current.max_depth().max(next.max_depth());
    GroundSegment {
        index,
        max_depth,
        left_bank: bank_strip(
            BankSide::Left,
            index,
            current.width,
            next.width,
            bank_extension,
            max_depth,
        ),
        right_bank: bank_strip(
            BankSide::Right,
            index,
            current.width,
            next.width,
            bank_extension,
            max_depth,
        ),
        bottom: bottom_strip(index, current.width, next.width, max_depth),
    }
}

fn width_at(current_width: f64, next_width: f64, fraction: f64) -> f64 {
    current_width + (next_width - current_width) * fraction
}

/// One bank as a 3×6 grid: a profile per fraction in
/// `BANK_PROFILE_FRACTIONS`, each running from the water's edge up over the
/// bank top, down the far side and back under to the edge.
pub fn bank_strip(
    side: BankSide,
    index: usize,
    current_width: f64,
    next_width: f64,
    bank_extension: f64,
    max_depth: f64,
) -> SurfaceGrid {
    let floor = -max_depth * GROUND_DEPTH_RATIO;
    let mut points = Vec::with_capacity(BANK_PROFILE_FRACTIONS.len() * BANK_PROFILE_POINTS);

    for fraction in BANK_PROFILE_FRACTIONS {
        let y = index as f64 + fraction;
        // Water's edge and the signed direction away from the channel.
        let (edge, outward) = match side {
            BankSide::Left => (0.0, -1.0),
            BankSide::Right => (width_at(current_width, next_width, fraction), 1.0),
        };
        let half = edge + outward * bank_extension / 2.0;
        let far = edge + outward * bank_extension;

        points.extend([
            Point3::new(edge, y, 0.0),
            Point3::new(half, y, BANK_HEIGHT * BANK_SLOPE_RATIO),
            Point3::new(far, y, BANK_HEIGHT),
            Point3::new(far, y, floor),
            Point3::new(half, y, floor),
            Point3::new(edge, y, floor),
        ]);
    }

    SurfaceGrid::from_points(&points, BANK_PROFILE_POINTS)
}

/// The floor under the channel as a 2×10 grid at both sites of the pair.
pub fn bottom_strip(
    index: usize,
    current_width: f64,
    next_width: f64,
    max_depth: f64,
) -> SurfaceGrid {
    let floor = -max_depth * GROUND_DEPTH_RATIO;
    let mut grid = SurfaceGrid::default();
    for fraction in [0.0, 1.0] {
        let y = index as f64 + fraction;
        let width = width_at(current_width, next_width, fraction);
        grid.push_row(
            linspace(0.0, width, BOTTOM_STRIP_POINTS),
            vec![y; BOTTOM_STRIP_POINTS],
            vec![floor; BOTTOM_STRIP_POINTS],
        );
    }
    grid
}
