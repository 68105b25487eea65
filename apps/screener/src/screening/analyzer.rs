//! Candidate Analyzer — one resume in, one `CandidateRecord` out.

use tracing::warn;

use crate::llm_client::CompletionService;
use crate::models::candidate::CandidateRecord;
use crate::screening::parser::parse_screening_response;
use crate::screening::prompts::build_screening_prompt;
use crate::screening::validation::JobCriteria;

/// Output budget for a single screening reply.
pub const MAX_OUTPUT_TOKENS: u32 = 4000;

/// Builds the prompt, makes exactly one LLM request and parses the reply.
///
/// Any request failure becomes an error row (`"API Error: ..."` in the reason
/// column) instead of an `Err`, so one bad document never stops a batch.
pub async fn analyze_candidate(
    llm: &dyn CompletionService,
    criteria: &JobCriteria,
    resume_text: &str,
    file_name: &str,
    current_year: i32,
) -> CandidateRecord {
    let prompt = build_screening_prompt(criteria, resume_text, current_year);

    match llm.complete(&prompt, MAX_OUTPUT_TOKENS).await {
        Ok(response) => parse_screening_response(&response, file_name),
        Err(e) => {
            warn!("Screening request failed for {file_name}: {e}");
            CandidateRecord::service_error(file_name, e)
        }
    }
}
