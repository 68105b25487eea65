use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Sentinel for any field the model did not report.
pub const NOT_AVAILABLE: &str = "Not Available";
/// Field value used on every column of an LLM failure row.
pub const ERROR_VALUE: &str = "Error";
/// Field value used on every column of a document failure row.
pub const NOT_APPLICABLE: &str = "N/A";

/// Column headings, in the fixed table order.
pub const COLUMNS: [&str; 10] = [
    "File Name",
    "Name",
    "Email",
    "Phone",
    "Current Company Name",
    "Current Designation",
    "Total Exp",
    "Match Score",
    "Recommendation",
    "Reason",
];

/// One row of analysis output.
///
/// Field declaration order is the column order: the CSV writer and the table
/// view both rely on it. `file_name` is always the canonical name; the status
/// marker is derived on display and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Current Company Name")]
    pub current_company_name: String,
    #[serde(rename = "Current Designation")]
    pub current_designation: String,
    #[serde(rename = "Total Exp")]
    pub total_experience: String,
    #[serde(rename = "Match Score")]
    pub match_score: String,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl CandidateRecord {
    fn filled(file_name: impl Into<String>, value: &str) -> Self {
        Self {
            file_name: file_name.into(),
            name: value.to_string(),
            email: value.to_string(),
            phone: value.to_string(),
            current_company_name: value.to_string(),
            current_designation: value.to_string(),
            total_experience: value.to_string(),
            match_score: value.to_string(),
            recommendation: value.to_string(),
            reason: value.to_string(),
        }
    }

    /// A record with every extracted field set to `"Not Available"`.
    pub fn not_available(file_name: impl Into<String>) -> Self {
        Self::filled(file_name, NOT_AVAILABLE)
    }

    /// Row for a document whose LLM request failed.
    pub fn service_error(file_name: impl Into<String>, detail: impl Display) -> Self {
        Self {
            reason: format!("API Error: {detail}"),
            ..Self::filled(file_name, ERROR_VALUE)
        }
    }

    /// Row for a document the extractor could not read.
    pub fn document_error(file_name: impl Into<String>, extractor_output: impl Into<String>) -> Self {
        Self {
            recommendation: "ERROR".to_string(),
            reason: extractor_output.into(),
            ..Self::filled(file_name, NOT_APPLICABLE)
        }
    }

    pub fn status_marker(&self) -> StatusMarker {
        StatusMarker::from_recommendation(&self.recommendation)
    }

    /// File name with the status marker prefixed, for display only.
    pub fn display_file_name(&self) -> String {
        self.status_marker().decorate(&self.file_name)
    }

    /// Field values in column order.
    pub fn values(&self) -> [&str; 10] {
        [
            &self.file_name,
            &self.name,
            &self.email,
            &self.phone,
            &self.current_company_name,
            &self.current_designation,
            &self.total_experience,
            &self.match_score,
            &self.recommendation,
            &self.reason,
        ]
    }

    /// Values in column order with the decorated file name in front.
    pub fn display_values(&self) -> Vec<String> {
        let mut row: Vec<String> = self.values().iter().map(|v| v.to_string()).collect();
        row[0] = self.display_file_name();
        row
    }
}

/// Presentation marker derived from a record's recommendation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMarker {
    GoodMatch,
    ConsiderableMatch,
    RejectOrError,
    Unknown,
}

impl StatusMarker {
    pub const ALL: [StatusMarker; 4] = [
        StatusMarker::GoodMatch,
        StatusMarker::ConsiderableMatch,
        StatusMarker::RejectOrError,
        StatusMarker::Unknown,
    ];

    /// Case-insensitive substring match, checked in priority order.
    pub fn from_recommendation(recommendation: &str) -> Self {
        let upper = recommendation.to_uppercase();
        if upper.contains("GOOD MATCH") {
            StatusMarker::GoodMatch
        } else if upper.contains("CONSIDERABLE MATCH") {
            StatusMarker::ConsiderableMatch
        } else if upper.contains("REJECT") || upper.contains("ERROR") {
            StatusMarker::RejectOrError
        } else {
            StatusMarker::Unknown
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StatusMarker::GoodMatch => "🟢",
            StatusMarker::ConsiderableMatch => "🟠",
            StatusMarker::RejectOrError => "🔴",
            StatusMarker::Unknown => "⚪",
        }
    }

    pub fn decorate(self, file_name: &str) -> String {
        format!("{} {file_name}", self.glyph())
    }
}

/// Removes one leading status marker (glyph plus a single space), if present.
pub fn strip_marker(file_name: &str) -> &str {
    StatusMarker::ALL
        .iter()
        .find_map(|m| {
            file_name
                .strip_prefix(m.glyph())
                .and_then(|rest| rest.strip_prefix(' '))
        })
        .unwrap_or(file_name)
}

/// Ordered, append-only collection of candidate rows for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    records: Vec<CandidateRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows as shown to the user, file names decorated.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(CandidateRecord::display_values)
            .collect()
    }
}

impl From<Vec<CandidateRecord>> for ResultTable {
    fn from(records: Vec<CandidateRecord>) -> Self {
        Self { records }
    }
}

/// Prior rows (markers stripped) followed by the new rows. `prior` is left untouched.
pub fn merge(prior: &ResultTable, new_records: Vec<CandidateRecord>) -> ResultTable {
    let mut records = Vec::with_capacity(prior.len() + new_records.len());
    records.extend(prior.records.iter().map(|r| CandidateRecord {
        file_name: strip_marker(&r.file_name).to_string(),
        ..r.clone()
    }));
    records.extend(new_records);
    ResultTable { records }
}
