/// End-to-end tests for the study workflow
///
/// These tests drive the public API the way the form layer does:
/// 1. Size the study and enter readings through `StudyChange`s
/// 2. Check the reset-on-change rules across sites
/// 3. Build cross-sections and the composite profile
/// 4. Export the table as CSV and round-trip the session snapshot
/// 5. Load configuration from a TOML file on disk
///
/// Run with: cargo test --test study_workflow

use river_study::config::{StudyConfig, load_config};
use river_study::export::{measurement_table, prepare_download, save_download, to_csv_string};
use river_study::form::{StudyChange, apply_change};
use river_study::geometry::banks::{bank_extension, ground_segment};
use river_study::geometry::{InterpolationKind, build_composite, build_cross_section};
use river_study::geometry::interpolate::resample_site;
use river_study::model::{Site, Study};
use river_study::session::{Session, Visualization};
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn apply_all(study: Study, changes: Vec<StudyChange>) -> Study {
    changes.into_iter().fold(study, |s, change| {
        apply_change(&s, change).expect("change should address an existing site")
    })
}

/// Two sites entered through the form: A deepest at 0.5 m, B at 0.3 m.
fn entered_study() -> Study {
    apply_all(
        Study::new(),
        vec![
            StudyChange::SetSiteCount(2),
            StudyChange::RenameSite { site: 0, name: "Upstream".to_string() },
            StudyChange::SetWidth { site: 0, width: 2.0 },
            StudyChange::SetMeasurements {
                site: 0,
                distances: vec![0.0, 1.0, 2.0],
                depths: vec![0.0, 0.5, 0.0],
            },
            StudyChange::SetWidth { site: 1, width: 2.0 },
            StudyChange::SetMeasurements {
                site: 1,
                distances: vec![0.0, 1.0, 2.0],
                depths: vec![0.0, 0.3, 0.0],
            },
        ],
    )
}

// ---------------------------------------------------------------------------
// Form workflow
// ---------------------------------------------------------------------------

#[test]
fn test_form_entry_produces_measured_study() {
    let study = entered_study();
    assert_eq!(study.len(), 2);
    assert_eq!(study.sites[0].name, "Upstream");
    assert_eq!(study.sites[1].name, "Site 2");
    assert!(study.check_ready().is_ok());
}

#[test]
fn test_measurement_count_reset_is_local_to_one_site() {
    let study = entered_study();
    let next = apply_change(&study, StudyChange::SetMeasurementCount { site: 1, count: 5 })
        .expect("site 1 exists");

    assert_eq!(next.sites[0].distances, vec![0.0, 1.0, 2.0]);
    assert_eq!(next.sites[0].depths, vec![0.0, 0.5, 0.0]);
    assert!(next.sites[1].distances.is_empty());
    assert!(next.sites[1].depths.is_empty());
    assert!(build_composite(&next, 30).is_err(), "composite must wait for site 2");
}

#[test]
fn test_resizing_study_discards_everything() {
    let next = apply_change(&entered_study(), StudyChange::SetSiteCount(3)).expect("valid change");
    assert_eq!(next, Study::with_site_count(3));
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn test_end_to_end_composite_rows_track_each_sites_depth() {
    let profile = build_composite(&entered_study(), 30).expect("all sites measured");
    let bed = profile.riverbed.expect("two sites give a surface");
    assert_eq!((bed.rows(), bed.columns()), (2, 30));

    let min = |row: &Vec<f64>| row.iter().copied().fold(f64::INFINITY, f64::min);
    assert!((min(&bed.z[0]) + 0.5).abs() < 0.05, "row 0 min {}", min(&bed.z[0]));
    assert!((min(&bed.z[1]) + 0.3).abs() < 0.05, "row 1 min {}", min(&bed.z[1]));
}

#[test]
fn test_cross_section_matches_entered_readings() {
    let study = entered_study();
    let xs = build_cross_section(&study.sites[0]);
    let bed: Vec<(f64, f64)> = xs.riverbed.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(bed, vec![(0.0, 0.0), (1.0, -0.5), (2.0, 0.0)]);
    assert_eq!(xs.width_indicator.label.text, "2.0m");
}

#[test]
fn test_bank_grid_for_four_and_six_metre_sites() {
    let a = Site::with_measurements("A", 4.0, vec![0.0, 2.0, 4.0], vec![0.0, 2.0, 0.0]);
    let b = Site::with_measurements("B", 6.0, vec![0.0, 3.0, 6.0], vec![0.0, 1.0, 0.0]);
    let study = Study::from_sites(vec![a.clone(), b.clone()]);

    let segment = ground_segment(0, &a, &b, bank_extension(study.max_width()));
    let left = &segment.left_bank;
    assert_eq!((left.rows(), left.columns()), (3, 6));
    for row in 0..3 {
        assert_eq!(left.x[row][0], 0.0);
        assert_eq!(left.z[row][0], 0.0);
        assert_eq!(left.x[row][5], 0.0);
        assert!((left.z[row][5] + 2.4).abs() < 1e-12);
        assert_eq!(left.x[row][2], -3.0);
    }
}

#[test]
fn test_twenty_point_site_uses_cubic_and_keeps_resample_length() {
    let distances: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
    let depths: Vec<f64> = distances.iter().map(|d| (d * (9.5 - d)) / 25.0).collect();
    let site = Site::with_measurements("Wide", 9.5, distances, depths);
    let profile = resample_site(&site, 30);
    assert_eq!(profile.kind, InterpolationKind::Cubic);
    assert_eq!(profile.elevation.len(), 30);
}

// ---------------------------------------------------------------------------
// Export and session
// ---------------------------------------------------------------------------

#[test]
fn test_csv_export_of_two_and_three_point_sites() {
    let study = Study::from_sites(vec![
        Site::with_measurements("Source", 1.0, vec![0.0, 1.0], vec![0.1, 0.2]),
        Site::with_measurements("Mouth", 3.0, vec![0.0, 1.5, 3.0], vec![0.4, 1.2, 0.3]),
    ]);
    let rows = measurement_table(&study);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].site_number, 1);
    assert_eq!(rows[1].site_number, 1);
    assert_eq!(rows[2].site_number, 2);

    let csv = to_csv_string(&rows).expect("in-memory write");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Site Number,Site Name,Point Number,Distance from Bank (m),Depth (m)");
    assert_eq!(lines[5], "2,Mouth,3,3.0,0.3");
}

#[test]
fn test_download_is_written_under_configured_name() {
    let dir = tempdir().expect("temp dir");
    let download = prepare_download(&entered_study(), "river_measurements.csv").expect("has rows");
    let path = save_download(&download, dir.path()).expect("writable dir");
    assert!(path.ends_with("river_measurements.csv"));

    let written = std::fs::read_to_string(&path).expect("file exists");
    assert_eq!(written, download.data);
}

#[test]
fn test_session_snapshot_round_trip_restores_view() {
    let session = Session::with_study(StudyConfig::default(), entered_study());
    let snapshot = session.snapshot().expect("study serializes");

    let restored = Session::restore(StudyConfig::default(), &snapshot).expect("snapshot parses");
    assert_eq!(restored.study(), session.study());
    assert_eq!(restored.view(), session.view());
}

#[test]
fn test_session_walkthrough_from_empty_to_ready() {
    let mut session = Session::new(StudyConfig::default());
    let view = session.apply(StudyChange::SetSiteCount(2)).expect("valid");
    assert!(matches!(view.visualization, Visualization::Placeholder { .. }));

    session.apply(StudyChange::SetDepth { site: 0, point: 1, depth: 0.4 }).expect("valid");
    let view = session
        .apply(StudyChange::SetDepth { site: 1, point: 1, depth: 0.6 })
        .expect("valid");

    match view.visualization {
        Visualization::Ready { composite, table, .. } => {
            assert_eq!(table.len(), 6);
            assert_eq!(composite.markers.len(), 6);
            assert_eq!(composite.ground.len(), 1);
        }
        other => panic!("expected ready view, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_on_disk() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("river_study.toml");
    std::fs::write(
        &path,
        "[plot]\nresample_count = 40\n\n[export]\nfile_name = \"field_trip.csv\"\n",
    )
    .expect("writable dir");

    let config = load_config(&path).expect("valid config");
    assert_eq!(config.plot.resample_count, 40);
    assert_eq!(config.export.file_name, "field_trip.csv");

    let session = Session::with_study(config, entered_study());
    match session.view().visualization {
        Visualization::Ready { composite, download, .. } => {
            assert_eq!(composite.water.map(|w| w.columns()), Some(40));
            assert_eq!(download.map(|d| d.file_name), Some("field_trip.csv".to_string()));
        }
        other => panic!("expected ready view, got {:?}", other),
    }
}
