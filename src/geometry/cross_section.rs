//! 2D cross-section geometry for a single site.
//!
//! Produces the drawable primitives for the per-site preview: two bank
//! wedges, the riverbed polyline (depths negated so the bed sits below the
//! water line), the water surface, a label under every reading, and a width
//! indicator above the channel.
//!
//! Readings are drawn in the order they were entered. Unsorted distances
//! give a zig-zag bed; that is left as-is.

use serde::{Deserialize, Serialize};

use crate::model::{CROSS_SECTION_BANK, Point2, Site, display_metres};

/// Height of the width indicator above the water line.
pub const WIDTH_INDICATOR_Y: f64 = 0.2;
/// Lower end of the indicator's end ticks.
pub const WIDTH_TICK_Y: f64 = 0.1;
/// Height of the width label.
pub const WIDTH_LABEL_Y: f64 = 0.3;
/// Gap between a reading and its depth label.
pub const DEPTH_LABEL_OFFSET: f64 = 0.1;

/// Text placed at a point in plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub at: Point2,
    pub text: String,
}

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point2,
    pub to: Point2,
}

impl Segment {
    pub fn new(from: Point2, to: Point2) -> Self {
        Self { from, to }
    }
}

/// The width indicator drawn above the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidthIndicator {
    pub line: Segment,
    pub left_tick: Segment,
    pub right_tick: Segment,
    pub label: Label,
}

/// Everything needed to draw one site's cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub title: String,
    /// Polyline filled down to y = 0.
    pub left_bank: Vec<Point2>,
    /// Polyline filled down to y = 0.
    pub right_bank: Vec<Point2>,
    /// `(distances[j], -depths[j])` in input order, filled up to y = 0.
    pub riverbed: Vec<Point2>,
    pub water_surface: Segment,
    pub depth_labels: Vec<Label>,
    pub width_indicator: WidthIndicator,
    /// Horizontal plot range wide enough to show both banks.
    pub x_range: (f64, f64),
}

/// Builds the cross-section primitives for `site`.
///
/// Panics if the site's distance and depth arrays differ in length.
pub fn build_cross_section(site: &Site) -> CrossSection {
    assert_eq!(
        site.distances.len(),
        site.depths.len(),
        "distances and depths must pair up"
    );
    let width = site.width;
    let bank = CROSS_SECTION_BANK;

    let riverbed: Vec<Point2> = site.points().map(|(d, depth)| Point2::new(d, -depth)).collect();
    let depth_labels: Vec<Label> = site
        .points()
        .map(|(d, depth)| Label {
            at: Point2::new(d, -depth - DEPTH_LABEL_OFFSET),
            text: display_metres(depth),
        })
        .collect();

    CrossSection {
        title: format!("River Cross-Section at {}", site.name),
        left_bank: vec![Point2::new(-bank, bank), Point2::new(0.0, 0.0)],
        right_bank: vec![Point2::new(width, 0.0), Point2::new(width + bank, bank)],
        riverbed,
        water_surface: Segment::new(Point2::new(0.0, 0.0), Point2::new(width, 0.0)),
        depth_labels,
        width_indicator: width_indicator(width),
        x_range: (-bank, width + bank),
    }
}

fn width_indicator(width: f64) -> WidthIndicator {
    let top = WIDTH_INDICATOR_Y;
    let tick = WIDTH_TICK_Y;
    WidthIndicator {
        line: Segment::new(Point2::new(0.0, top), Point2::new(width, top)),
        left_tick: Segment::new(Point2::new(0.0, top), Point2::new(0.0, tick)),
        right_tick: Segment::new(Point2::new(width, top), Point2::new(width, tick)),
        label: Label {
            at: Point2::new(width / 2.0, WIDTH_LABEL_Y),
            text: display_metres(width),
        },
    }
}

// ---------------------------------------------------------------------------
// Grid of all cross-sections
// ---------------------------------------------------------------------------

/// Columns in the "all cross-sections" overview.
pub const OVERVIEW_COLUMNS: usize = 2;

/// Placement of one site's cross-section in the overview grid (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

/// Rows needed to show `site_count` cross-sections two to a row.
pub fn overview_rows(site_count: usize) -> usize {
    site_count.div_ceil(OVERVIEW_COLUMNS)
}

/// Grid cell for site `index`, filling rows left to right.
pub fn overview_cell(index: usize) -> GridCell {
    GridCell {
        row: index / OVERVIEW_COLUMNS + 1,
        column: index % OVERVIEW_COLUMNS + 1,
    }
}
