// Screening prompt template and rendering.
// The output-format block is a contract with `parser::FIELD_LABELS`: change both together.

use crate::screening::validation::JobCriteria;

/// Candidate evaluation prompt. Placeholders: `{job_title}`, `{important_duties}`,
/// `{considerable_duties}`, `{resume_text}`, `{current_year}`.
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"You are an expert HR analyst. Please analyze this candidate's resume against the job requirements and extract specific information.

JOB TITLE: {job_title}

IMPORTANT DUTIES CANDIDATE SHOULD HANDLE:
{important_duties}

CONSIDERABLE DUTIES CANDIDATE SHOULD HANDLE:
{considerable_duties}

CANDIDATE RESUME:
{resume_text}

ANALYSIS INSTRUCTIONS:
1. Extract candidate's personal and professional information
2. Identify candidate's CURRENT job duties and responsibilities from their resume
3. For CURRENT_COMPANY and CURRENT_DESIGNATION, look for:
   - Jobs with "Present", "Current", or the current year ({current_year}) as end date
   - The most recent position that is still ongoing
   - If multiple current positions, choose the primary/main one
4. Compare candidate's CURRENT job duties (not past roles) with the Important Duties and Considerable Duties
5. Apply the following matching logic:
   - If candidate's CURRENT duties closely match Important Duties → "GOOD MATCH"
   - Otherwise, if candidate's CURRENT duties closely match Considerable Duties → "CONSIDERABLE MATCH"
   - If candidate's CURRENT duties don't match either Important or Considerable Duties → "REJECT"

IMPORTANT: Pay special attention to date ranges. "{current_year}-Present", "{current_year}-Current", or similar patterns indicate the CURRENT position.

Please provide your analysis in the following EXACT format, one field per line:

CANDIDATE_NAME: [Extract full name]
EMAIL: [Extract email address]
PHONE: [Extract phone number]
CURRENT_COMPANY: [Extract CURRENT/most recent ongoing company name - look for "Present" or current year]
CURRENT_DESIGNATION: [Extract CURRENT/most recent ongoing job title - look for "Present" or current year]
TOTAL_EXPERIENCE: [Extract total years of experience across all positions]
MATCH_SCORE: [Rate 1-10 how well candidate's CURRENT duties match job requirements]
RECOMMENDATION: [Either "GOOD MATCH" or "CONSIDERABLE MATCH" or "REJECT" based on CURRENT role duties]
REASON: [One sentence explaining your decision based on CURRENT job duty matching]

If any information is not available in the resume, write "Not Available" for that field."#;

/// Renders the screening prompt for one resume.
pub fn build_screening_prompt(criteria: &JobCriteria, resume_text: &str, current_year: i32) -> String {
    let current_year = current_year.to_string();
    fill_template(
        SCREENING_PROMPT_TEMPLATE,
        &[
            ("job_title", criteria.job_title.as_str()),
            ("important_duties", criteria.important_duties.as_str()),
            ("considerable_duties", criteria.considerable_duties.as_str()),
            ("resume_text", resume_text),
            ("current_year", current_year.as_str()),
        ],
    )
}

/// Single-pass `{name}` substitution. Inserted values are never rescanned, and
/// unknown placeholders are left as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
