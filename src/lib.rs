//! Leksemvariasjon Core Library
//!
//! Retrieves corpus selections and concordances from the DH-lab API for a
//! declarative set of lemmas and word forms, inside a resumable job directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`lexicon`] - Lexical configuration model (attribute, language, lemmas, words)
//! - [`query`] - Corpus and concordance request construction
//! - [`api`] - HTTP client for the DH-lab JSON API
//! - [`job`] - Job directory creation, argument persistence, and resume
//! - [`projection`] - Flattening of corpus records into output rows
//! - [`pipeline`] - Stage-by-stage retrieval that skips completed work on resume

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod job;
pub mod lexicon;
pub mod pipeline;
pub mod projection;
pub mod query;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, ConcordanceRecord, CorpusRecord, DHLAB_API_URL};
pub use job::{
    CandidateArguments, JobDirectory, JobError, RunArguments, Stage, resume_job, start_job_at,
    start_or_resume,
};
pub use lexicon::{Lemma, LexicalConfig, LexiconError, Word};
pub use pipeline::{PipelineError, PipelineSummary, run_pipeline};
pub use projection::{CorpusFields, project_corpus_record};
pub use query::{
    ConcordanceQuery, CorpusQuery, QueryOptions, build_concordance_query, build_corpus_query,
    fulltext_query,
};
