//! CSV snapshot of a result table.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::models::candidate::{strip_marker, ResultTable, COLUMNS};

static EXPORT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^resume_analysis_\d{8}_\d{6}(_\d+)?\.csv$").expect("Invalid export name regex")
});

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// `resume_analysis_<YYYYMMDD_HHMMSS>.csv`, or `..._<attempt>.csv` after a
/// name collision.
pub fn export_file_name(timestamp: NaiveDateTime, attempt: u32) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S");
    if attempt == 0 {
        format!("resume_analysis_{stamp}.csv")
    } else {
        format!("resume_analysis_{stamp}_{attempt}.csv")
    }
}

/// Writes `table` (header row, then one row per record, no status markers) to
/// a new file in `export_dir` and returns its path. Existing exports are never
/// overwritten.
pub fn export_table(
    table: &ResultTable,
    export_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let (path, file) = create_export_file(export_dir, timestamp)?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(COLUMNS)?;
    for record in table.records() {
        let mut values = record.values();
        values[0] = strip_marker(values[0]);
        writer.write_record(values)?;
    }
    writer.flush()?;

    Ok(path)
}

fn create_export_file(
    export_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<(PathBuf, File), ExportError> {
    let mut attempt = 0;
    loop {
        let path = export_dir.join(export_file_name(timestamp, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Path of a previously written export, if `file_name` is a valid export name.
pub fn resolve_export(export_dir: &Path, file_name: &str) -> Option<PathBuf> {
    EXPORT_NAME_REGEX
        .is_match(file_name)
        .then(|| export_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateRecord;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
    }

    fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_export_file_name_format() {
        assert_eq!(
            export_file_name(timestamp(), 0),
            "resume_analysis_20250304_050607.csv"
        );
        assert_eq!(
            export_file_name(timestamp(), 2),
            "resume_analysis_20250304_050607_2.csv"
        );
    }

    #[test]
    fn test_same_second_exports_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = ResultTable::from(vec![CandidateRecord::not_available("alice.txt")]);
        let second = ResultTable::from(vec![CandidateRecord::not_available("bob.txt")]);

        let a = export_table(&first, dir.path(), timestamp()).unwrap();
        let b = export_table(&second, dir.path(), timestamp()).unwrap();

        assert_ne!(a, b);
        assert_eq!(
            b,
            dir.path().join("resume_analysis_20250304_050607_1.csv")
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);

        let (_, a_rows) = read_rows(&a);
        let (_, b_rows) = read_rows(&b);
        assert_eq!(a_rows.len(), 1);
        assert_eq!(a_rows[0][0], "alice.txt");
        assert_eq!(b_rows.len(), 1);
        assert_eq!(b_rows[0][0], "bob.txt");
    }

    #[test]
    fn test_export_writes_header_and_rows_without_markers() {
        let dir = tempfile::tempdir().unwrap();
        let table = ResultTable::from(vec![
            CandidateRecord {
                name: "Jane, Doe".to_string(),
                recommendation: "GOOD MATCH".to_string(),
                ..CandidateRecord::not_available("jane.txt")
            },
            CandidateRecord::document_error("🔴 bad.xls", "Unsupported file format: bad.xls"),
        ]);

        let path = export_table(&table, dir.path(), timestamp()).unwrap();
        assert_eq!(path, dir.path().join("resume_analysis_20250304_050607.csv"));

        let (headers, rows) = read_rows(&path);
        assert_eq!(headers, COLUMNS.to_vec());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "jane.txt");
        assert_eq!(rows[0][1], "Jane, Doe");
        assert_eq!(rows[0][8], "GOOD MATCH");
        assert_eq!(rows[1][0], "bad.xls");
        assert_eq!(rows[1][8], "ERROR");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains('🟢'));
        assert!(!raw.contains('🔴'));
    }

    #[test]
    fn test_export_of_empty_table_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_table(&ResultTable::new(), dir.path(), timestamp()).unwrap();
        let (headers, rows) = read_rows(&path);
        assert_eq!(headers.len(), COLUMNS.len());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(export_table(&ResultTable::new(), &missing, timestamp()).is_err());
    }

    #[test]
    fn test_resolve_export_rejects_other_names() {
        let dir = Path::new("/srv/exports");
        assert_eq!(
            resolve_export(dir, "resume_analysis_20250304_050607.csv"),
            Some(dir.join("resume_analysis_20250304_050607.csv"))
        );
        assert_eq!(
            resolve_export(dir, "resume_analysis_20250304_050607_3.csv"),
            Some(dir.join("resume_analysis_20250304_050607_3.csv"))
        );
        assert!(resolve_export(dir, "../secrets.csv").is_none());
        assert!(resolve_export(dir, "resume_analysis_20250304_050607_.csv").is_none());
        assert!(resolve_export(dir, "resume_analysis_2025.csv").is_none());
        assert!(resolve_export(dir, "resume_analysis_20250304_050607.csv.bak").is_none());
    }
}
