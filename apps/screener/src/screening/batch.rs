//! Batch Aggregator — validates a request, screens each uploaded resume in
//! order, merges the new rows after the session's prior rows and exports CSV.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use tracing::{info, warn};

use crate::llm_client::CompletionService;
use crate::models::candidate::{merge, CandidateRecord, ResultTable, COLUMNS};
use crate::screening::analyzer::analyze_candidate;
use crate::screening::export::export_table;
use crate::screening::extractor::{extract_text, is_extraction_failure, UploadedDocument};
use crate::screening::validation::{check_file_count, JobCriteria, ScreeningError};

/// What an analysis call shows: the candidate table, or a one-cell error table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Results(ResultTable),
    Error(ScreeningError),
}

impl TableView {
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            TableView::Results(_) => COLUMNS.to_vec(),
            TableView::Error(_) => vec!["Error"],
        }
    }

    /// Display rows; candidate file names carry their status marker.
    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            TableView::Results(table) => table.display_rows(),
            TableView::Error(e) => vec![vec![e.to_string()]],
        }
    }

    pub fn results(&self) -> Option<&ResultTable> {
        match self {
            TableView::Results(table) => Some(table),
            TableView::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub table: TableView,
    pub csv_path: Option<PathBuf>,
    /// Whether the "analyze more resumes" section should now be shown.
    pub show_analyze_more: bool,
}

impl BatchOutcome {
    fn rejected(error: ScreeningError) -> Self {
        warn!("Batch rejected ({}): {error}", error.kind());
        Self {
            table: TableView::Error(error),
            csv_path: None,
            show_analyze_more: false,
        }
    }
}

/// Screens `files` against `criteria` and appends the results to `prior`.
///
/// `llm` is `None` when no API key is configured. `prior` is read, never
/// modified; the merged table comes back in the outcome.
pub async fn analyze_batch(
    llm: Option<&dyn CompletionService>,
    export_dir: &Path,
    files: &[UploadedDocument],
    criteria: &JobCriteria,
    prior: &ResultTable,
) -> BatchOutcome {
    let Some(llm) = llm else {
        return BatchOutcome::rejected(ScreeningError::NotConfigured);
    };

    if files.is_empty() {
        return BatchOutcome {
            table: TableView::Results(prior.clone()),
            csv_path: None,
            show_analyze_more: false,
        };
    }

    if let Err(e) = check_file_count(files.len()).and_then(|()| criteria.validate()) {
        return BatchOutcome::rejected(e.into());
    }

    info!(
        "Screening {} resume(s) for '{}' ({} prior rows)",
        files.len(),
        criteria.job_title,
        prior.len()
    );

    let now = Local::now();
    let mut new_records = Vec::with_capacity(files.len());

    for file in files {
        let file_name = file.display_name();
        let text = extract_text(Some(file)).await;

        let record = if is_extraction_failure(&text) {
            warn!("Skipping {file_name}: {text}");
            CandidateRecord::document_error(file_name, text)
        } else {
            analyze_candidate(llm, criteria, &text, file_name, now.year()).await
        };

        info!(
            file = file_name,
            recommendation = %record.recommendation,
            "Resume screened"
        );
        new_records.push(record);
    }

    let table = merge(prior, new_records);

    let csv_path = match export_table(&table, export_dir, now.naive_local()) {
        Ok(path) => {
            info!("Exported {} rows to {}", table.len(), path.display());
            Some(path)
        }
        Err(e) => {
            warn!("CSV export failed: {e}");
            None
        }
    };

    BatchOutcome {
        table: TableView::Results(table),
        csv_path,
        show_analyze_more: true,
    }
}
