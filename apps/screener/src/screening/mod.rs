//! Resume screening pipeline: extract text, prompt the model, parse its reply,
//! aggregate a batch into the session table and export it.

pub mod analyzer;
pub mod batch;
pub mod export;
pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod validation;
