//! One user's editing session.
//!
//! Holds the current `Study` and recomputes the whole view after every
//! change: a preview cross-section per measured site, then either the
//! composite visualization with its data table and CSV download, or a
//! placeholder until every site has readings. Updates are strictly
//! sequential; nothing is shared between sessions.

use serde::Serialize;

use crate::config::StudyConfig;
use crate::export::{self, CsvDownload, ExportError, MeasurementRow};
use crate::form::{StudyChange, apply_change, reset_scope};
use crate::geometry::cross_section::{
    CrossSection, GridCell, build_cross_section, overview_cell, overview_rows,
};
use crate::geometry::{CompositeProfile, build_composite};
use crate::logging::{self, Component};
use crate::model::{Study, StudyError};

/// Shown in place of the visualization while any site lacks readings.
pub const PLACEHOLDER_MESSAGE: &str =
    "Please enter measurement data for all points to see the visualization.";

/// A measured site's preview and its place in the overview grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteView {
    pub index: usize,
    pub cell: GridCell,
    pub cross_section: CrossSection,
}

/// The visualization tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Visualization {
    /// The study has no sites yet.
    NoSites,
    /// Some sites still need readings.
    Placeholder { message: String, incomplete_sites: Vec<usize> },
    Ready {
        composite: CompositeProfile,
        overview_rows: usize,
        table: Vec<MeasurementRow>,
        download: Option<CsvDownload>,
    },
}

/// Everything the page shows after one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyView {
    pub previews: Vec<SiteView>,
    pub visualization: Visualization,
}

impl StudyView {
    /// JSON handed to the rendering layer.
    pub fn render_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The in-memory study for one user, plus the settings it is viewed with.
#[derive(Debug, Clone)]
pub struct Session {
    study: Study,
    config: StudyConfig,
}

impl Session {
    pub fn new(config: StudyConfig) -> Self {
        Self { study: Study::new(), config }
    }

    pub fn with_study(config: StudyConfig, study: Study) -> Self {
        Self { study, config }
    }

    pub fn study(&self) -> &Study {
        &self.study
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Applies one form change and returns the recomputed view. On error
    /// the study is left as it was.
    pub fn apply(&mut self, change: StudyChange) -> Result<StudyView, StudyError> {
        let scope = reset_scope(&self.study, &change);
        logging::debug(Component::Session, None, &format!("Applying {:?}", change));

        match apply_change(&self.study, change) {
            Ok(next) => {
                if let Some(scope) = scope {
                    logging::log_reset(&scope);
                }
                self.study = next;
                Ok(self.view())
            }
            Err(e) => {
                logging::warn(Component::Form, None, &format!("Change rejected: {}", e));
                Err(e)
            }
        }
    }

    /// Recomputes the full view from the current study.
    pub fn view(&self) -> StudyView {
        StudyView {
            previews: self.previews(),
            visualization: self.visualization(),
        }
    }

    fn previews(&self) -> Vec<SiteView> {
        self.study
            .sites
            .iter()
            .enumerate()
            .filter(|(_, site)| !site.distances.is_empty())
            .map(|(index, site)| SiteView {
                index,
                cell: overview_cell(index),
                cross_section: build_cross_section(site),
            })
            .collect()
    }

    fn visualization(&self) -> Visualization {
        if self.study.is_empty() {
            return Visualization::NoSites;
        }

        let composite = match build_composite(&self.study, self.config.plot.resample_count) {
            Ok(composite) => composite,
            Err(StudyError::IncompleteSites(incomplete_sites)) => {
                logging::debug(
                    Component::Geometry,
                    None,
                    &format!(
                        "Visualization withheld; {} site(s) lack depths",
                        incomplete_sites.len()
                    ),
                );
                return Visualization::Placeholder {
                    message: PLACEHOLDER_MESSAGE.to_string(),
                    incomplete_sites,
                };
            }
            Err(e) => {
                logging::error(Component::Geometry, None, &e.to_string());
                return Visualization::Placeholder {
                    message: PLACEHOLDER_MESSAGE.to_string(),
                    incomplete_sites: Vec::new(),
                };
            }
        };

        let table = export::measurement_table(&self.study);
        let download = match export::prepare_download(&self.study, &self.config.export.file_name) {
            Ok(download) => {
                logging::log_export_summary(&download.file_name, self.study.len(), table.len());
                Some(download)
            }
            Err(ExportError::Empty) => None,
            Err(e) => {
                logging::error(Component::Export, None, &e.to_string());
                None
            }
        };

        Visualization::Ready {
            composite,
            overview_rows: overview_rows(self.study.len()),
            table,
            download,
        }
    }

    /// Serializes the study for session storage.
    pub fn snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.study)
    }

    /// Rebuilds a session from a stored snapshot. The study must satisfy
    /// the same limits the form enforces.
    pub fn restore(config: StudyConfig, snapshot: &str) -> Result<Self, RestoreError> {
        let study: Study = serde_json::from_str(snapshot)?;
        if let Err(e) = study.validate() {
            logging::warn(Component::Session, None, &format!("Snapshot rejected: {}", e));
            return Err(RestoreError::Invalid(e));
        }
        logging::debug(
            Component::Session,
            None,
            &format!("Restored study with {} site(s)", study.len()),
        );
        Ok(Self::with_study(config, study))
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a stored snapshot could not be turned back into a session.
#[derive(Debug)]
pub enum RestoreError {
    /// The snapshot is not a serialized study.
    Parse(serde_json::Error),
    /// The study parsed but breaks the form's limits.
    Invalid(StudyError),
}

impl std::fmt::Display for RestoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreError::Parse(e) => write!(f, "Snapshot parse error: {}", e),
            RestoreError::Invalid(e) => write!(f, "Snapshot rejected: {}", e),
        }
    }
}

impl std::error::Error for RestoreError {}

impl From<serde_json::Error> for RestoreError {
    fn from(e: serde_json::Error) -> Self {
        RestoreError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Site;

    fn measured_session() -> Session {
        Session::with_study(
            StudyConfig::default(),
            Study::from_sites(vec![
                Site::with_measurements("A", 2.0, vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 0.0]),
                Site::with_measurements("B", 2.0, vec![0.0, 1.0, 2.0], vec![0.0, 0.3, 0.0]),
            ]),
        )
    }

    #[test]
    fn test_new_session_has_no_sites() {
        let view = Session::new(StudyConfig::default()).view();
        assert!(view.previews.is_empty());
        assert_eq!(view.visualization, Visualization::NoSites);
    }

    #[test]
    fn test_unmeasured_sites_show_placeholder() {
        let mut session = Session::new(StudyConfig::default());
        let view = session.apply(StudyChange::SetSiteCount(2)).expect("valid change");
        match view.visualization {
            Visualization::Placeholder { message, incomplete_sites } => {
                assert_eq!(message, PLACEHOLDER_MESSAGE);
                assert_eq!(incomplete_sites, vec![0, 1]);
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
    }

    #[test]
    fn test_measured_study_is_ready_with_table_and_download() {
        let view = measured_session().view();
        assert_eq!(view.previews.len(), 2);
        assert_eq!(view.previews[1].cell, GridCell { row: 1, column: 2 });
        match view.visualization {
            Visualization::Ready { composite, overview_rows, table, download } => {
                assert_eq!(composite.riverbed.map(|g| g.rows()), Some(2));
                assert_eq!(overview_rows, 1);
                assert_eq!(table.len(), 6);
                assert_eq!(
                    download.map(|d| d.file_name),
                    Some("river_measurements.csv".to_string())
                );
            }
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_configured_resample_count_is_used() {
        let mut config = StudyConfig::default();
        config.plot.resample_count = 12;
        let session = Session::with_study(config, measured_session().study().clone());
        match session.view().visualization {
            Visualization::Ready { composite, .. } => {
                assert_eq!(composite.riverbed.map(|g| g.columns()), Some(12));
            }
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_change_keeps_study() {
        let mut session = measured_session();
        let before = session.study().clone();
        let result = session.apply(StudyChange::SetWidth { site: 9, width: 1.0 });
        assert!(result.is_err());
        assert_eq!(session.study(), &before);
    }

    #[test]
    fn test_measurement_count_change_withholds_visualization() {
        let mut session = measured_session();
        let view = session
            .apply(StudyChange::SetMeasurementCount { site: 1, count: 5 })
            .expect("valid change");
        assert_eq!(view.previews.len(), 1);
        assert!(matches!(
            view.visualization,
            Visualization::Placeholder { ref incomplete_sites, .. } if incomplete_sites == &vec![1]
        ));
    }

    #[test]
    fn test_restore_rejects_unpaired_readings() {
        let snapshot = r#"{"sites":[{"name":"A","width":1.0,"num_measurements":2,
            "distances":[0.0,1.0],"depths":[0.5]}]}"#;
        let result = Session::restore(StudyConfig::default(), snapshot);
        assert!(matches!(
            result,
            Err(RestoreError::Invalid(StudyError::InvalidSite { site: 0, .. }))
        ));
    }

    #[test]
    fn test_restore_rejects_values_outside_form_limits() {
        let snapshot = r#"{"sites":[{"name":"A","width":-2.0,"num_measurements":2,
            "distances":[0.0,1.0],"depths":[50.0,-3.0]}]}"#;
        let result = Session::restore(StudyConfig::default(), snapshot);
        assert!(matches!(result, Err(RestoreError::Invalid(_))));
    }

    #[test]
    fn test_restore_rejects_malformed_json() {
        let result = Session::restore(StudyConfig::default(), "{\"sites\": 3}");
        assert!(matches!(result, Err(RestoreError::Parse(_))));
    }

    #[test]
    fn test_restore_accepts_own_snapshot() {
        let session = measured_session();
        let snapshot = session.snapshot().expect("serializable");
        let restored = Session::restore(StudyConfig::default(), &snapshot).expect("valid snapshot");
        assert_eq!(restored.view(), session.view());
    }

    #[test]
    fn test_render_payload_tags_visualization_state() {
        let payload = measured_session().view().render_payload().expect("serializable");
        assert!(payload.contains("\"state\":\"ready\""));
        assert!(payload.contains("\"Site Number\":1"));
    }
}
