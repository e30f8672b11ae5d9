//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use leksemvariasjon_core::query::{
    DEFAULT_CONCORDANCE_LIMIT, DEFAULT_CONCORDANCE_WINDOW, DEFAULT_CORPUS_LIMIT,
};
use leksemvariasjon_core::{CandidateArguments, DHLAB_API_URL, QueryOptions};

/// Retrieve corpus and concordance data from the DH-lab API.
///
/// A fresh run creates a uniquely named job directory under --directory.
/// Pass --resume with --directory pointing at that job to continue it.
#[derive(Parser, Debug)]
#[command(name = "leksemvariasjon")]
#[command(author, version, about)]
pub struct Args {
    /// Path to a JSON lexical configuration. Required on an initial run.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to create the job in, or the job directory when resuming.
    #[arg(short, long)]
    pub directory: PathBuf,

    /// The document type to search for.
    #[arg(long)]
    pub doctype: Option<String>,

    /// The start year for the search (inclusive).
    #[arg(long)]
    pub from: Option<i32>,

    /// The end year for the search (inclusive).
    #[arg(long)]
    pub to: Option<i32>,

    /// Resume a previously started job.
    #[arg(long)]
    pub resume: bool,

    /// Only create or check the job directory; do not contact the API.
    #[arg(long)]
    pub no_fetch: bool,

    /// Base URL of the DH-lab API.
    #[arg(long, default_value = DHLAB_API_URL)]
    pub api_url: String,

    /// Maximum number of documents selected by the corpus query (1-10000)
    #[arg(long, default_value_t = DEFAULT_CORPUS_LIMIT, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub corpus_limit: u32,

    /// Maximum number of concordance lines (1-10000)
    #[arg(long, default_value_t = DEFAULT_CONCORDANCE_LIMIT, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub concordance_limit: u32,

    /// Tokens of context around each concordance hit (1-100)
    #[arg(long, default_value_t = DEFAULT_CONCORDANCE_WINDOW, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub window: u32,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Fresh-run parameters exactly as given on the command line.
    pub fn candidate(&self) -> CandidateArguments {
        CandidateArguments {
            config: self.config.clone(),
            doctype: self.doctype.clone(),
            from: self.from,
            to: self.to,
        }
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            corpus_limit: self.corpus_limit,
            concordance_limit: self.concordance_limit,
            window: self.window,
            ..QueryOptions::default()
        }
    }

    /// Default log level from the verbosity flags; `RUST_LOG` overrides it.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
