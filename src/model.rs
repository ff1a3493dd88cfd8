//! Core data types for the river study tool.
//!
//! This module defines the shared domain model imported by all other modules:
//! the measured sites, the study that collects them, the small value types the
//! geometry builders hand to a renderer, and the error type for study-level
//! preconditions. It contains no geometry and no I/O.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input limits
// ---------------------------------------------------------------------------

/// Largest number of sites a study can hold.
pub const MAX_SITES: usize = 20;

/// Smallest river width accepted at a site, in metres.
pub const MIN_WIDTH_M: f64 = 0.1;

/// Deepest reading accepted at a measurement point, in metres.
pub const MAX_DEPTH_M: f64 = 10.0;

/// Bounds on the number of depth measurements taken across one site.
pub const MIN_MEASUREMENTS: usize = 2;
pub const MAX_MEASUREMENTS: usize = 20;

/// Width and measurement count given to a freshly created site.
pub const DEFAULT_WIDTH_M: f64 = 1.0;
pub const DEFAULT_MEASUREMENTS: usize = 3;

/// Number of interpolated columns per site in the composite surfaces.
pub const DEFAULT_RESAMPLE_COUNT: usize = 30;

// ---------------------------------------------------------------------------
// Presentation constants
// ---------------------------------------------------------------------------
//
// Hand-tuned so the 3D scene looks like a channel cut into the ground.
// They have no physical meaning.

/// Height of the synthetic banks above the water line, in metres.
pub const BANK_HEIGHT: f64 = 0.5;

/// Bank extension as a fraction of the widest site in the study.
pub const BANK_EXTENSION_RATIO: f64 = 0.5;

/// Height of the mid-slope bank vertex as a fraction of `BANK_HEIGHT`.
pub const BANK_SLOPE_RATIO: f64 = 0.7;

/// Depth of the ground floor as a multiple of the deepest adjacent reading.
pub const GROUND_DEPTH_RATIO: f64 = 1.2;

/// Number of x positions across the bottom strip under the channel.
pub const BOTTOM_STRIP_POINTS: usize = 10;

/// Lateral size and height of the 2D bank wedges drawn beside a cross-section.
pub const CROSS_SECTION_BANK: f64 = 0.5;

// ---------------------------------------------------------------------------
// Site and study
// ---------------------------------------------------------------------------

/// One measurement location along the river.
///
/// `distances[j]` is measured from the left bank and pairs with
/// `depths[j]`. Both arrays are empty until the form collects them; a change
/// to `num_measurements` empties them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub width: f64,
    pub num_measurements: usize,
    pub distances: Vec<f64>,
    pub depths: Vec<f64>,
}

impl Site {
    /// A site as the form first presents it: default name, 1 m wide,
    /// three measurement slots and no readings yet.
    pub fn new(index: usize) -> Self {
        Self {
            name: default_site_name(index),
            width: DEFAULT_WIDTH_M,
            num_measurements: DEFAULT_MEASUREMENTS,
            distances: Vec::new(),
            depths: Vec::new(),
        }
    }

    /// Builds a fully measured site.
    ///
    /// Panics if the arrays differ in length; that is a caller bug, not a
    /// user input problem.
    pub fn with_measurements(
        name: impl Into<String>,
        width: f64,
        distances: Vec<f64>,
        depths: Vec<f64>,
    ) -> Self {
        assert_eq!(
            distances.len(),
            depths.len(),
            "distances and depths must pair up one-to-one"
        );
        Self {
            name: name.into(),
            width,
            num_measurements: distances.len(),
            distances,
            depths,
        }
    }

    /// True once at least one depth has been recorded.
    pub fn has_depths(&self) -> bool {
        !self.depths.is_empty()
    }

    /// Deepest reading at this site, or 0 when nothing is recorded.
    pub fn max_depth(&self) -> f64 {
        self.depths.iter().copied().fold(0.0, f64::max)
    }

    fn validate(&self) -> Result<(), String> {
        if !(MIN_MEASUREMENTS..=MAX_MEASUREMENTS).contains(&self.num_measurements) {
            return Err(format!("measurement count {} outside 2..=20", self.num_measurements));
        }
        if !self.width.is_finite() || self.width < MIN_WIDTH_M {
            return Err(format!("width {} below {}", self.width, MIN_WIDTH_M));
        }
        if self.distances.len() != self.depths.len() {
            return Err(format!(
                "{} distances against {} depths",
                self.distances.len(),
                self.depths.len()
            ));
        }
        if !self.depths.is_empty() && self.depths.len() != self.num_measurements {
            return Err(format!(
                "{} readings for {} measurements",
                self.depths.len(),
                self.num_measurements
            ));
        }
        if let Some(d) = self.distances.iter().find(|d| !(0.0..=self.width).contains(*d)) {
            return Err(format!("distance {} outside 0..={}", d, self.width));
        }
        if let Some(d) = self.depths.iter().find(|d| !(0.0..=MAX_DEPTH_M).contains(*d)) {
            return Err(format!("depth {} outside 0..={}", d, MAX_DEPTH_M));
        }
        Ok(())
    }

    /// Iterates `(distance, depth)` pairs in input order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.distances.iter().copied().zip(self.depths.iter().copied())
    }
}

/// Default display label for the site at `index` (zero-based).
pub fn default_site_name(index: usize) -> String {
    format!("Site {}", index + 1)
}

/// The whole collection of sites, ordered downstream.
///
/// Sites are addressed by position only; the position doubles as the
/// ordinal "distance downstream" axis in the composite view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub sites: Vec<Site>,
}

impl Study {
    pub fn new() -> Self {
        Self::default()
    }

    /// A study of `count` default sites.
    pub fn with_site_count(count: usize) -> Self {
        Self {
            sites: (0..count).map(Site::new).collect(),
        }
    }

    pub fn from_sites(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn site(&self, index: usize) -> Result<&Site, StudyError> {
        self.sites.get(index).ok_or(StudyError::SiteIndexOutOfRange {
            index,
            len: self.sites.len(),
        })
    }

    /// Indices of sites that have no depth recorded yet.
    pub fn incomplete_sites(&self) -> Vec<usize> {
        self.sites
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.has_depths())
            .map(|(i, _)| i)
            .collect()
    }

    /// Gate for the composite view: every site needs at least one depth.
    pub fn check_ready(&self) -> Result<(), StudyError> {
        let missing = self.incomplete_sites();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StudyError::IncompleteSites(missing))
        }
    }

    /// Widest site in the study, or 0 for an empty study.
    pub fn max_width(&self) -> f64 {
        self.sites.iter().map(|s| s.width).fold(0.0, f64::max)
    }

    /// Deepest reading anywhere in the study.
    pub fn max_depth(&self) -> f64 {
        self.sites.iter().map(Site::max_depth).fold(0.0, f64::max)
    }

    /// Checks the invariants the form maintains, for studies that arrive by
    /// another route such as a stored snapshot.
    pub fn validate(&self) -> Result<(), StudyError> {
        if self.sites.len() > MAX_SITES {
            return Err(StudyError::TooManySites(self.sites.len()));
        }
        for (index, site) in self.sites.iter().enumerate() {
            site.validate().map_err(|reason| StudyError::InvalidSite { site: index, reason })?;
        }
        Ok(())
    }

    /// Total number of recorded measurement points.
    pub fn point_count(&self) -> usize {
        self.sites.iter().map(|s| s.distances.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Geometry value types
// ---------------------------------------------------------------------------

/// A point in a 2D cross-section plot: x across the river, y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in the 3D scene: x across the river, y along the site axis,
/// z elevation relative to the water surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Three aligned row-major grids describing a mesh surface, in the shape
/// plotting libraries expect for `x`, `y` and `z` surface inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGrid {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
}

impl SurfaceGrid {
    /// Appends one row of the mesh.
    ///
    /// Panics if the three rows differ in length or disagree with rows
    /// already present.
    pub fn push_row(&mut self, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) {
        assert!(
            x.len() == y.len() && y.len() == z.len(),
            "surface row components must have equal length"
        );
        if let Some(first) = self.x.first() {
            assert_eq!(first.len(), x.len(), "surface rows must have equal length");
        }
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Builds a grid from a flat row-major list of vertices.
    pub fn from_points(points: &[Point3], columns: usize) -> Self {
        assert!(
            columns > 0 && points.len() % columns == 0,
            "{} points do not reshape into rows of {}",
            points.len(),
            columns
        );
        let mut grid = Self::default();
        for row in points.chunks(columns) {
            grid.push_row(
                row.iter().map(|p| p.x).collect(),
                row.iter().map(|p| p.y).collect(),
                row.iter().map(|p| p.z).collect(),
            );
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.x.len()
    }

    pub fn columns(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    /// The vertex at `(row, column)`, if present.
    pub fn point(&self, row: usize, column: usize) -> Option<Point3> {
        Some(Point3::new(
            *self.x.get(row)?.get(column)?,
            *self.y.get(row)?.get(column)?,
            *self.z.get(row)?.get(column)?,
        ))
    }
}

/// Formats a length in metres the way the form displays entered values:
/// shortest round-trip representation, always with a decimal point.
///
/// Very large or small magnitudes switch to exponent form without a sign
/// (`1e16m`); the form's input limits keep values well inside plain notation.
pub fn display_metres(value: f64) -> String {
    format!("{:?}m", value)
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Study-level preconditions that can fail at the edge of the geometry code.
#[derive(Debug, Clone, PartialEq)]
pub enum StudyError {
    /// A site index beyond the end of the study.
    SiteIndexOutOfRange { index: usize, len: usize },
    /// A measurement slot beyond the site's measurement count.
    PointIndexOutOfRange { site: usize, point: usize, len: usize },
    /// These sites have no depth readings, so the composite cannot be built.
    IncompleteSites(Vec<usize>),
    /// More sites than the form allows.
    TooManySites(usize),
    /// A site breaks one of the form's limits.
    InvalidSite { site: usize, reason: String },
}

impl std::fmt::Display for StudyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyError::SiteIndexOutOfRange { index, len } => {
                write!(f, "Site index {} out of range for study of {} sites", index, len)
            }
            StudyError::PointIndexOutOfRange { site, point, len } => write!(
                f,
                "Point {} out of range for {} ({} measurements)",
                point + 1,
                default_site_name(*site),
                len
            ),
            StudyError::IncompleteSites(sites) => {
                let labels: Vec<String> = sites.iter().map(|i| default_site_name(*i)).collect();
                write!(f, "No depth readings recorded for: {}", labels.join(", "))
            }
            StudyError::TooManySites(count) => {
                write!(f, "Study has {} sites, at most {} allowed", count, MAX_SITES)
            }
            StudyError::InvalidSite { site, reason } => {
                write!(f, "{} is invalid: {}", default_site_name(*site), reason)
            }
        }
    }
}

impl std::error::Error for StudyError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
