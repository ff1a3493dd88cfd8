//! The form's state transitions as a pure reducer.
//!
//! Each user interaction becomes one `StudyChange`; `apply_change` returns
//! the next `Study` without touching the old one. Two changes discard data:
//!
//! - changing the site count rebuilds every site from defaults;
//! - changing one site's measurement count empties that site's
//!   distances and depths, and no other site's.
//!
//! Everything else edits in place. Numeric values are clamped on the way in.

use crate::form::inputs::{
    clamp_depth, clamp_distance, clamp_measurement_count, clamp_site_count, clamp_width,
    default_depths, default_distances,
};
use crate::model::{Site, Study, StudyError};

/// One user edit to the study form.
#[derive(Debug, Clone, PartialEq)]
pub enum StudyChange {
    /// How many sites were measured. Any actual change resets the study.
    SetSiteCount(usize),
    RenameSite { site: usize, name: String },
    SetWidth { site: usize, width: f64 },
    /// Measurement slots across a site. Any actual change clears its arrays.
    SetMeasurementCount { site: usize, count: usize },
    /// Replaces a site's readings wholesale, as the form submits them.
    SetMeasurements { site: usize, distances: Vec<f64>, depths: Vec<f64> },
    SetDistance { site: usize, point: usize, distance: f64 },
    SetDepth { site: usize, point: usize, depth: f64 },
}

/// What a change threw away, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Every site was rebuilt from defaults.
    AllSites { old_count: usize, new_count: usize },
    /// One site's distance and depth arrays were emptied.
    SiteMeasurements { site: usize },
}

/// Reports the data a change would discard when applied to `study`.
pub fn reset_scope(study: &Study, change: &StudyChange) -> Option<ResetScope> {
    match change {
        StudyChange::SetSiteCount(count) => {
            let new_count = clamp_site_count(*count);
            (new_count != study.len()).then_some(ResetScope::AllSites {
                old_count: study.len(),
                new_count,
            })
        }
        StudyChange::SetMeasurementCount { site, count } => study
            .sites
            .get(*site)
            .filter(|s| s.num_measurements != clamp_measurement_count(*count))
            .map(|_| ResetScope::SiteMeasurements { site: *site }),
        _ => None,
    }
}

/// Applies one edit and returns the resulting study.
///
/// Fails only when the change addresses a site or measurement slot that
/// does not exist. Panics if `SetMeasurements` arrays disagree with the
/// site's measurement count, which is a caller bug.
pub fn apply_change(old: &Study, change: StudyChange) -> Result<Study, StudyError> {
    let mut next = old.clone();
    match change {
        StudyChange::SetSiteCount(count) => {
            let count = clamp_site_count(count);
            if count != next.len() {
                next = Study::with_site_count(count);
            }
        }
        StudyChange::RenameSite { site, name } => {
            site_mut(&mut next, site)?.name = name;
        }
        StudyChange::SetWidth { site, width } => {
            let entry = site_mut(&mut next, site)?;
            entry.width = clamp_width(width);
            let width = entry.width;
            for d in entry.distances.iter_mut() {
                *d = clamp_distance(*d, width);
            }
        }
        StudyChange::SetMeasurementCount { site, count } => {
            let entry = site_mut(&mut next, site)?;
            let count = clamp_measurement_count(count);
            if count != entry.num_measurements {
                entry.num_measurements = count;
                entry.distances.clear();
                entry.depths.clear();
            }
        }
        StudyChange::SetMeasurements { site, distances, depths } => {
            let entry = site_mut(&mut next, site)?;
            assert_eq!(distances.len(), depths.len(), "distances and depths must pair up");
            assert_eq!(
                distances.len(),
                entry.num_measurements,
                "readings must fill every measurement slot"
            );
            let width = entry.width;
            entry.distances = distances.into_iter().map(|d| clamp_distance(d, width)).collect();
            entry.depths = depths.into_iter().map(clamp_depth).collect();
        }
        StudyChange::SetDistance { site, point, distance } => {
            let entry = slot_mut(&mut next, site, point)?;
            let width = entry.width;
            entry.distances[point] = clamp_distance(distance, width);
        }
        StudyChange::SetDepth { site, point, depth } => {
            let entry = slot_mut(&mut next, site, point)?;
            entry.depths[point] = clamp_depth(depth);
        }
    }
    Ok(next)
}

fn site_mut(study: &mut Study, index: usize) -> Result<&mut Site, StudyError> {
    let len = study.len();
    study
        .sites
        .get_mut(index)
        .ok_or(StudyError::SiteIndexOutOfRange { index, len })
}

/// Resolves a single measurement slot, materialising the form's prefill
/// values first if the site's arrays are still empty.
fn slot_mut(study: &mut Study, site: usize, point: usize) -> Result<&mut Site, StudyError> {
    let entry = site_mut(study, site)?;
    if point >= entry.num_measurements {
        return Err(StudyError::PointIndexOutOfRange {
            site,
            point,
            len: entry.num_measurements,
        });
    }
    if entry.distances.len() != entry.num_measurements {
        entry.distances = default_distances(entry.width, entry.num_measurements);
    }
    if entry.depths.len() != entry.num_measurements {
        entry.depths = default_depths(entry.num_measurements);
    }
    Ok(entry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
