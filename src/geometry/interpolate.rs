//! Depth-surface interpolation for a single site.
//!
//! Resamples a site's irregular `(distance, depth)` readings onto `M` evenly
//! spaced positions across its width so that every site contributes a row of
//! the same length to the composite surface. Output is elevation (negated
//! depth).
//!
//! The interpolant is chosen by how many distinct distances were measured:
//!
//!   more than 3  →  not-a-knot cubic spline
//!   2 or 3       →  piecewise linear
//!   fewer than 2 →  constant
//!
//! A site whose depths are all equal is also treated as constant. Positions
//! outside the measured range extrapolate along the outermost segment; they
//! are never rejected.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::form::inputs::linspace;
use crate::model::Site;

/// Which interpolant produced a resampled profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationKind {
    Constant,
    Linear,
    Cubic,
}

/// One site's resampled riverbed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthProfile {
    /// Evenly spaced positions over `[0, width]`.
    pub x: Vec<f64>,
    /// Interpolated elevation at each position (depth negated).
    pub elevation: Vec<f64>,
    pub kind: InterpolationKind,
}

/// Resamples a site's readings onto `count` positions across its width.
pub fn resample_site(site: &Site, count: usize) -> DepthProfile {
    resample(&site.distances, &site.depths, site.width, count)
}

/// Resamples `(distances[j], depths[j])` onto `count` positions over
/// `[0, width]`.
///
/// Panics if the arrays differ in length or `count < 2`.
pub fn resample(distances: &[f64], depths: &[f64], width: f64, count: usize) -> DepthProfile {
    assert_eq!(distances.len(), depths.len(), "distances and depths must pair up");
    assert!(count >= 2, "resample count must be at least 2, got {}", count);

    let interpolant = Interpolant::fit(distances, depths);
    let x = linspace(0.0, width, count);
    let elevation = x.iter().map(|&xi| -interpolant.eval(xi)).collect();

    DepthProfile { x, elevation, kind: interpolant.kind() }
}

// ---------------------------------------------------------------------------
// Interpolants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Interpolant {
    Constant(f64),
    Linear { xs: Vec<f64>, ys: Vec<f64> },
    Cubic(CubicSpline),
}

impl Interpolant {
    fn fit(distances: &[f64], depths: &[f64]) -> Self {
        let (xs, ys) = distinct_points(distances, depths);

        let flat = ys.windows(2).all(|w| w[0] == w[1]);
        if xs.len() < 2 || flat {
            return Interpolant::Constant(ys.first().copied().unwrap_or(0.0));
        }
        if xs.len() > 3 {
            if let Some(spline) = CubicSpline::not_a_knot(&xs, &ys) {
                return Interpolant::Cubic(spline);
            }
        }
        Interpolant::Linear { xs, ys }
    }

    fn kind(&self) -> InterpolationKind {
        match self {
            Interpolant::Constant(_) => InterpolationKind::Constant,
            Interpolant::Linear { .. } => InterpolationKind::Linear,
            Interpolant::Cubic(_) => InterpolationKind::Cubic,
        }
    }

    fn eval(&self, x: f64) -> f64 {
        match self {
            Interpolant::Constant(y) => *y,
            Interpolant::Linear { xs, ys } => {
                let i = segment_index(xs, x);
                let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
                ys[i] + t * (ys[i + 1] - ys[i])
            }
            Interpolant::Cubic(spline) => spline.eval(x),
        }
    }
}

/// Sorts readings by distance and merges readings taken at the same
/// distance into their mean depth.
fn distinct_points(distances: &[f64], depths: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> =
        distances.iter().copied().zip(depths.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut xs: Vec<f64> = Vec::with_capacity(pairs.len());
    let mut ys: Vec<f64> = Vec::with_capacity(pairs.len());
    let mut run = 0usize;
    for (x, y) in pairs {
        match xs.last() {
            Some(&last) if last == x => {
                run += 1;
                if let Some(mean) = ys.last_mut() {
                    *mean += (y - *mean) / run as f64;
                }
            }
            _ => {
                xs.push(x);
                ys.push(y);
                run = 1;
            }
        }
    }
    (xs, ys)
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used to evaluate `x`.
/// Positions beyond either end map to the outermost segment.
fn segment_index(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&xi| xi <= x);
    upper.saturating_sub(1).min(xs.len() - 2)
}

// ---------------------------------------------------------------------------
// Cubic spline
// ---------------------------------------------------------------------------

/// Interpolating cubic spline stored as knot values plus second derivatives.
#[derive(Debug, Clone)]
struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fits a spline with not-a-knot ends: the third derivative is
    /// continuous across the second and second-to-last knots.
    ///
    /// Needs at least 4 strictly increasing knots. Returns `None` if the
    /// system is singular.
    fn not_a_knot(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 4 {
            return None;
        }
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);

        a[(0, 0)] = h[1];
        a[(0, 1)] = -(h[0] + h[1]);
        a[(0, 2)] = h[0];

        for i in 1..n - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
            b[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        a[(n - 1, n - 3)] = h[n - 2];
        a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        a[(n - 1, n - 1)] = h[n - 3];

        let second = solve_knots(a, &b)?;
        Some(Self { xs: xs.to_vec(), ys: ys.to_vec(), second })
    }

    fn eval(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let h = x1 - x0;
        let left = x1 - x;
        let right = x - x0;

        m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right
    }
}

/// LU solve of the knot system. `None` when the matrix is singular or the
/// solution is not finite.
fn solve_knots(a: DMatrix<f64>, b: &DVector<f64>) -> Option<Vec<f64>> {
    let x = a.lu().solve(b)?;
    x.iter().all(|v| v.is_finite()).then(|| x.iter().copied().collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
