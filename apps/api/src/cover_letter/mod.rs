//! Cover letter generation: job posting sanitizing, prompt assembly, the AI
//! call and post-processing of its output.

pub mod cleaner;
pub mod generator;
pub mod handlers;
pub mod job_cleaner;
pub mod prompts;
pub mod tone;
pub mod validation;
