//! Composite 3D river profile across all sites.
//!
//! Sites sit on an ordinal "downstream" axis at y = 0, 1, .., N-1. The
//! assembler stitches every site's resampled riverbed row into one surface,
//! adds ground geometry between neighbouring sites, lays a flat water
//! surface that follows each site's own width, and places a marker at
//! every raw reading plus a name label per site beyond the right bank.

use serde::{Deserialize, Serialize};

use crate::form::inputs::linspace;
use crate::geometry::banks::{GroundSegment, bank_extension, ground_segment};
use crate::geometry::interpolate::{DepthProfile, resample_site};
use crate::model::{BANK_HEIGHT, Point3, Study, StudyError, SurfaceGrid, display_metres};

/// Extra margin around the scene and beyond the bank for site labels.
pub const SCENE_MARGIN: f64 = 0.5;
/// Headroom below the deepest reading in the scene, as a multiple of it.
pub const SCENE_DEPTH_RATIO: f64 = 1.3;

/// A labelled marker at one raw reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub at: Point3,
    /// Depth to one decimal place, e.g. `0.5m`.
    pub text: String,
    pub hover: String,
}

/// A text-only label in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLabel {
    pub at: Point3,
    pub text: String,
}

/// Axis ranges and camera target for the 3D scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub x_range: (f64, f64),
    pub z_range: (f64, f64),
    pub camera_center: Point3,
}

/// Everything needed to draw the 3D river profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeProfile {
    /// N×M riverbed mesh; absent for a single-site study.
    pub riverbed: Option<SurfaceGrid>,
    /// Ground between each pair of neighbouring sites.
    pub ground: Vec<GroundSegment>,
    /// N×M water mesh at elevation 0; absent for a single-site study.
    pub water: Option<SurfaceGrid>,
    pub markers: Vec<Marker>,
    pub site_labels: Vec<SceneLabel>,
    pub bank_extension: f64,
    pub bounds: SceneBounds,
}

/// Assembles the composite profile with `resample_count` columns per site.
///
/// Fails with `IncompleteSites` unless every site has at least one depth.
/// Surfaces need two rows, so a one-site study gets markers and labels
/// only.
pub fn build_composite(
    study: &Study,
    resample_count: usize,
) -> Result<CompositeProfile, StudyError> {
    study.check_ready()?;

    let max_width = study.max_width();
    let extension = bank_extension(max_width);

    let (riverbed, water, ground) = if study.len() >= 2 {
        let profiles: Vec<DepthProfile> = study
            .sites
            .iter()
            .map(|site| resample_site(site, resample_count))
            .collect();
        let ground: Vec<GroundSegment> = study
            .sites
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ground_segment(i, &pair[0], &pair[1], extension))
            .collect();
        (
            Some(riverbed_surface(&profiles)),
            Some(water_surface(study, resample_count)),
            ground,
        )
    } else {
        (None, None, Vec::new())
    };

    Ok(CompositeProfile {
        riverbed,
        ground,
        water,
        markers: markers(study),
        site_labels: site_labels(study, max_width + extension + SCENE_MARGIN),
        bank_extension: extension,
        bounds: scene_bounds(study, extension),
    })
}

/// Stacks resampled rows into one mesh; row `i` lies at y = i.
pub fn riverbed_surface(profiles: &[DepthProfile]) -> SurfaceGrid {
    let mut grid = SurfaceGrid::default();
    for (i, profile) in profiles.iter().enumerate() {
        grid.push_row(
            profile.x.clone(),
            vec![i as f64; profile.x.len()],
            profile.elevation.clone(),
        );
    }
    grid
}

/// Flat water mesh; each row spans only that site's own width.
pub fn water_surface(study: &Study, resample_count: usize) -> SurfaceGrid {
    let mut grid = SurfaceGrid::default();
    for (i, site) in study.sites.iter().enumerate() {
        grid.push_row(
            linspace(0.0, site.width, resample_count),
            vec![i as f64; resample_count],
            vec![0.0; resample_count],
        );
    }
    grid
}

fn markers(study: &Study) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(study.point_count());
    for (i, site) in study.sites.iter().enumerate() {
        for (j, (distance, depth)) in site.points().enumerate() {
            markers.push(Marker {
                at: Point3::new(distance, i as f64, -depth),
                text: format!("{:.1}m", depth),
                hover: format!(
                    "Site {} ({}) / Point {} / Width: {} / Depth: {:.1}m",
                    i + 1,
                    site.name,
                    j + 1,
                    display_metres(site.width),
                    depth
                ),
            });
        }
    }
    markers
}

fn site_labels(study: &Study, x: f64) -> Vec<SceneLabel> {
    study
        .sites
        .iter()
        .enumerate()
        .map(|(i, site)| SceneLabel {
            at: Point3::new(x, i as f64, BANK_HEIGHT / 2.0),
            text: site.name.clone(),
        })
        .collect()
}

fn scene_bounds(study: &Study, extension: f64) -> SceneBounds {
    SceneBounds {
        x_range: (
            -extension - SCENE_MARGIN,
            study.max_width() + extension + SCENE_MARGIN,
        ),
        z_range: (
            -study.max_depth() * SCENE_DEPTH_RATIO,
            BANK_HEIGHT + SCENE_MARGIN,
        ),
        camera_center: Point3::new(0.5, study.len() as f64 / 2.0, -0.3),
    }
}
