//! Tabular export of the study.
//!
//! Flattens every site's readings into one row per measurement point,
//! ordered by site and then by point, and serializes the table as CSV for
//! download.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::Study;

/// Name offered for the downloaded file unless configured otherwise.
pub const DEFAULT_EXPORT_FILE: &str = "river_measurements.csv";

pub const CSV_MIME: &str = "text/csv";

/// Column headers, in order.
pub const CSV_HEADER: [&str; 5] = [
    "Site Number",
    "Site Name",
    "Point Number",
    "Distance from Bank (m)",
    "Depth (m)",
];

/// One measurement point in the exported table. Numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    #[serde(rename = "Site Number")]
    pub site_number: usize,
    #[serde(rename = "Site Name")]
    pub site_name: String,
    #[serde(rename = "Point Number")]
    pub point_number: usize,
    #[serde(rename = "Distance from Bank (m)")]
    pub distance_m: f64,
    #[serde(rename = "Depth (m)")]
    pub depth_m: f64,
}

/// A ready-to-offer CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvDownload {
    pub file_name: String,
    pub mime: &'static str,
    pub data: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    Csv(String),
    /// The export file could not be written.
    Io(String),
    /// The study has no readings to export.
    Empty,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(msg) => write!(f, "CSV error: {}", msg),
            ExportError::Io(msg) => write!(f, "IO error: {}", msg),
            ExportError::Empty => write!(f, "No measurements to export"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table and CSV
// ---------------------------------------------------------------------------

/// One row per reading, site-ascending then point-ascending.
pub fn measurement_table(study: &Study) -> Vec<MeasurementRow> {
    study
        .sites
        .iter()
        .enumerate()
        .flat_map(|(i, site)| {
            site.points().enumerate().map(move |(j, (distance, depth))| MeasurementRow {
                site_number: i + 1,
                site_name: site.name.clone(),
                point_number: j + 1,
                distance_m: distance,
                depth_m: depth,
            })
        })
        .collect()
}

/// Writes the header and every row to `out`.
pub fn write_csv<W: Write>(rows: &[MeasurementRow], out: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// The table as a CSV string.
pub fn to_csv_string(rows: &[MeasurementRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Packages the study's table for download. Returns `Empty` when no site
/// has readings, in which case no download should be offered.
pub fn prepare_download(study: &Study, file_name: &str) -> Result<CsvDownload, ExportError> {
    let rows = measurement_table(study);
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(CsvDownload {
        file_name: file_name.to_string(),
        mime: CSV_MIME,
        data: to_csv_string(&rows)?,
    })
}

/// Writes a download into `dir` under its file name and returns the path.
pub fn save_download(download: &CsvDownload, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(&download.file_name);
    fs::write(&path, &download.data)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Site;

    fn study() -> Study {
        Study::from_sites(vec![
            Site::with_measurements("Upstream", 1.0, vec![0.0, 1.0], vec![0.2, 0.4]),
            Site::with_measurements("Meander", 2.0, vec![0.0, 1.0, 2.0], vec![0.1, 0.5, 0.0]),
        ])
    }

    #[test]
    fn test_row_count_is_total_readings() {
        let rows = measurement_table(&study());
        assert_eq!(rows.len(), 5);
        assert!(rows[..2].iter().all(|r| r.site_number == 1));
        assert!(rows[2..].iter().all(|r| r.site_number == 2));
    }

    #[test]
    fn test_rows_are_site_then_point_ordered() {
        let rows = measurement_table(&study());
        let keys: Vec<(usize, usize)> =
            rows.iter().map(|r| (r.site_number, r.point_number)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(rows[3].site_name, "Meander");
        assert_eq!(rows[3].distance_m, 1.0);
        assert_eq!(rows[3].depth_m, 0.5);
    }

    #[test]
    fn test_sites_without_readings_contribute_no_rows() {
        let mut s = study();
        s.sites.insert(1, Site::new(1));
        let rows = measurement_table(&s);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2].site_number, 3);
    }

    #[test]
    fn test_csv_header_and_first_row() {
        let csv = to_csv_string(&measurement_table(&study())).expect("in-memory write");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Site Number,Site Name,Point Number,Distance from Bank (m),Depth (m)")
        );
        assert_eq!(lines.next(), Some("1,Upstream,1,0.0,0.2"));
        assert_eq!(csv.lines().count(), 6);
    }

    #[test]
    fn test_site_names_with_commas_are_quoted() {
        let site = Site::with_measurements("Bend, north", 1.0, vec![0.0, 1.0], vec![0.0, 0.0]);
        let s = Study::from_sites(vec![site]);
        let csv = to_csv_string(&measurement_table(&s)).expect("in-memory write");
        assert!(csv.contains("1,\"Bend, north\",1,"));
    }

    #[test]
    fn test_empty_study_offers_no_download() {
        let result = prepare_download(&Study::with_site_count(2), DEFAULT_EXPORT_FILE);
        assert_eq!(result, Err(ExportError::Empty));
    }

    #[test]
    fn test_download_descriptor() {
        let download = prepare_download(&study(), DEFAULT_EXPORT_FILE).expect("has rows");
        assert_eq!(download.file_name, "river_measurements.csv");
        assert_eq!(download.mime, "text/csv");
        assert!(download.data.starts_with("Site Number,"));
    }
}
