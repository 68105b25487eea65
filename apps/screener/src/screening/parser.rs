//! Response Parser — reads the line-labeled block the screening prompt asks for.
//!
//! Each field is matched on its own: a reordered or partial response still
//! fills whatever labels it contains, and everything else stays "Not Available".

use std::sync::LazyLock;

use regex::Regex;

use crate::models::candidate::CandidateRecord;

/// A column the model is asked to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    CurrentCompany,
    CurrentDesignation,
    TotalExperience,
    MatchScore,
    Recommendation,
    Reason,
}

/// Output labels, in the order the prompt lists them.
pub const FIELD_LABELS: [(&str, Field); 9] = [
    ("CANDIDATE_NAME", Field::Name),
    ("EMAIL", Field::Email),
    ("PHONE", Field::Phone),
    ("CURRENT_COMPANY", Field::CurrentCompany),
    ("CURRENT_DESIGNATION", Field::CurrentDesignation),
    ("TOTAL_EXPERIENCE", Field::TotalExperience),
    ("MATCH_SCORE", Field::MatchScore),
    ("RECOMMENDATION", Field::Recommendation),
    ("REASON", Field::Reason),
];

/// `LABEL:` at the start of a line (after optional indentation), then the rest
/// of that line. Horizontal whitespace only, so an empty value never captures
/// the next line.
static FIELD_PATTERNS: LazyLock<Vec<(Regex, Field)>> = LazyLock::new(|| {
    FIELD_LABELS
        .iter()
        .map(|(label, field)| {
            let pattern = format!(r"(?im)^[ \t]*{label}:[ \t]*([^\r\n]*)");
            (Regex::new(&pattern).expect("Invalid field label regex"), *field)
        })
        .collect()
});

/// Parses a model response into a record for `file_name`.
pub fn parse_screening_response(response: &str, file_name: &str) -> CandidateRecord {
    let mut record = CandidateRecord::not_available(file_name);

    for (pattern, field) in FIELD_PATTERNS.iter() {
        let value = pattern
            .captures(response)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty());

        if let Some(value) = value {
            *field_slot(&mut record, *field) = value.to_string();
        }
    }

    record
}

fn field_slot(record: &mut CandidateRecord, field: Field) -> &mut String {
    match field {
        Field::Name => &mut record.name,
        Field::Email => &mut record.email,
        Field::Phone => &mut record.phone,
        Field::CurrentCompany => &mut record.current_company_name,
        Field::CurrentDesignation => &mut record.current_designation,
        Field::TotalExperience => &mut record.total_experience,
        Field::MatchScore => &mut record.match_score,
        Field::Recommendation => &mut record.recommendation,
        Field::Reason => &mut record.reason,
    }
}
