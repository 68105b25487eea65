use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_BATCH_FILES: usize = 10;
pub const MAX_DUTIES_CHARS: usize = 500;

/// Job requirements supplied with every analysis call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCriteria {
    pub job_title: String,
    pub important_duties: String,
    pub considerable_duties: String,
}

/// Bad caller input. The caller may correct it and try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Maximum {} resume files allowed", MAX_BATCH_FILES)]
    TooManyFiles,

    #[error("Please enter the job title")]
    EmptyJobTitle,

    #[error("Please enter the important duties")]
    EmptyImportantDuties,

    #[error("Please enter the considerable duties")]
    EmptyConsiderableDuties,

    #[error(
        "Important Duties exceeds {} characters. Current: {count} characters",
        MAX_DUTIES_CHARS
    )]
    ImportantDutiesTooLong { count: usize },

    #[error(
        "Considerable Duties exceeds {} characters. Current: {count} characters",
        MAX_DUTIES_CHARS
    )]
    ConsiderableDutiesTooLong { count: usize },
}

/// Failures that stop a whole analysis call before any document is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreeningError {
    #[error("⚠️ API Key not configured. Please contact administrator.")]
    NotConfigured,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ScreeningError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScreeningError::NotConfigured => "configuration",
            ScreeningError::Validation(_) => "validation",
        }
    }
}

pub fn check_file_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_BATCH_FILES {
        return Err(ValidationError::TooManyFiles);
    }
    Ok(())
}

impl JobCriteria {
    /// Blank checks first, then length checks, each in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.job_title.trim().is_empty() {
            return Err(ValidationError::EmptyJobTitle);
        }
        if self.important_duties.trim().is_empty() {
            return Err(ValidationError::EmptyImportantDuties);
        }
        if self.considerable_duties.trim().is_empty() {
            return Err(ValidationError::EmptyConsiderableDuties);
        }

        let count = char_count(&self.important_duties);
        if count > MAX_DUTIES_CHARS {
            return Err(ValidationError::ImportantDutiesTooLong { count });
        }
        let count = char_count(&self.considerable_duties);
        if count > MAX_DUTIES_CHARS {
            return Err(ValidationError::ConsiderableDutiesTooLong { count });
        }

        Ok(())
    }
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Live counter shown under a duties field.
#[derive(Debug, Clone, Serialize)]
pub struct CharCount {
    pub count: usize,
    pub limit: usize,
    pub exceeds_limit: bool,
    pub display: String,
}

impl CharCount {
    pub fn of(text: &str) -> Self {
        let count = char_count(text);
        let exceeds_limit = count > MAX_DUTIES_CHARS;
        let display = if exceeds_limit {
            format!("⚠️ {count}/{MAX_DUTIES_CHARS} characters (Exceeds limit!)")
        } else {
            format!("✅ {count}/{MAX_DUTIES_CHARS} characters")
        };
        Self {
            count,
            limit: MAX_DUTIES_CHARS,
            exceeds_limit,
            display,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DutiesCharStatus {
    pub important: CharCount,
    pub considerable: CharCount,
    /// Analyze buttons stay disabled while either field is over the limit.
    pub analyze_enabled: bool,
}

pub fn duties_char_status(important_duties: &str, considerable_duties: &str) -> DutiesCharStatus {
    let important = CharCount::of(important_duties);
    let considerable = CharCount::of(considerable_duties);
    let analyze_enabled = !important.exceeds_limit && !considerable.exceeds_limit;
    DutiesCharStatus {
        important,
        considerable,
        analyze_enabled,
    }
}
