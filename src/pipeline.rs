//! Stage-by-stage retrieval for one job.
//!
//! Each API response is stored in the job's `incoming` stage as soon as it
//! arrives. A resumed run finds those files and skips the requests that
//! already completed, so an interrupted job picks up where it stopped.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::api::{ApiClient, ApiError, ConcordanceRecord, CorpusRecord};
use crate::job::{self, JobDirectory, RunArguments, Stage};
use crate::lexicon::LexicalConfig;
use crate::projection::{CorpusFields, project_corpus_record};
use crate::query::{QueryOptions, build_concordance_query, build_corpus_query};

/// File holding the corpus response in the `incoming` stage.
pub const CORPUS_FILE: &str = "corpus.json";

/// File holding the concordance response in the `incoming` stage.
pub const CONCORDANCE_FILE: &str = "concordance.json";

/// File holding the projected corpus rows in the `results` stage.
pub const RESULTS_FILE: &str = "corpus.json";

/// Errors raised while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Documents selected by the corpus query.
    pub documents: usize,
    /// Concordance lines retrieved.
    pub concordances: usize,
    /// Whether the corpus came from an earlier run of this job.
    pub corpus_reused: bool,
    /// Whether the concordances came from an earlier run of this job.
    pub concordance_reused: bool,
    /// Where the projected rows were written.
    pub results_path: PathBuf,
}

/// Runs every stage of the job that has not completed yet.
///
/// # Errors
///
/// Returns [`PipelineError::Api`] if a request fails, and
/// [`PipelineError::Io`] / [`PipelineError::Json`] if stage files cannot be
/// read or written. Stages completed before the failure keep their output.
#[instrument(skip_all, fields(job_dir = %job.path().display()))]
pub async fn run_pipeline(
    job: &JobDirectory,
    args: &RunArguments,
    config: &LexicalConfig,
    client: &ApiClient,
    options: &QueryOptions,
) -> Result<PipelineSummary, PipelineError> {
    let incoming = job.stage_path(Stage::Incoming);

    let corpus_path = incoming.join(CORPUS_FILE);
    let (corpus, corpus_reused) = match load_stage::<CorpusRecord>(&corpus_path)? {
        Some(corpus) => {
            info!(documents = corpus.len(), "Reusing stored corpus");
            (corpus, true)
        }
        None => {
            let query = build_corpus_query(args, config, options);
            debug!(fulltext = %query.fulltext, from = query.from_year, to = query.to_year, "Corpus query built");
            let corpus = client.fetch_corpus(&query).await?;
            store_stage(&corpus_path, &corpus)?;
            info!(documents = corpus.len(), "Corpus retrieved");
            (corpus, false)
        }
    };

    let concordance_path = incoming.join(CONCORDANCE_FILE);
    let (concordance, concordance_reused) =
        match load_stage::<ConcordanceRecord>(&concordance_path)? {
            Some(concordance) => {
                info!(lines = concordance.len(), "Reusing stored concordances");
                (concordance, true)
            }
            None => {
                let ids = corpus.dhlab_ids();
                let concordance = if ids.is_empty() {
                    info!("Corpus is empty, skipping concordance request");
                    ConcordanceRecord::default()
                } else {
                    let query = build_concordance_query(config, &ids, options);
                    client.fetch_concordance(&query).await?
                };
                store_stage(&concordance_path, &concordance)?;
                info!(lines = concordance.len(), "Concordances retrieved");
                (concordance, false)
            }
        };

    let rows: Vec<CorpusFields> = corpus
        .identifiers()
        .into_iter()
        .map(|id| project_corpus_record(id, &corpus))
        .collect();
    let results_path = job.stage_path(Stage::Results).join(RESULTS_FILE);
    store_stage(&results_path, &rows)?;
    info!(rows = rows.len(), path = %results_path.display(), "Results written");

    Ok(PipelineSummary {
        documents: corpus.len(),
        concordances: concordance.len(),
        corpus_reused,
        concordance_reused,
        results_path,
    })
}

fn load_stage<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PipelineError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PipelineError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| PipelineError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn store_stage<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PipelineError> {
    let data = serde_json::to_vec_pretty(value).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    job::write_atomic(path, &data).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
