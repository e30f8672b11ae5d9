//! CLI entry point for leksemvariasjon.

use anyhow::{Context, Result};
use clap::Parser;
use leksemvariasjon_core::{ApiClient, run_pipeline, start_or_resume};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let (job, run_args) = start_or_resume(&args.directory, args.resume, &args.candidate())
        .context("could not prepare the job directory")?;
    let config = job
        .load_config(&run_args)
        .context("could not load the configuration snapshot")?;

    info!(
        job_dir = %job.path().display(),
        attribute = %config.attribute,
        language = %config.language,
        lemmas = config.lemmas.len(),
        words = config.word_count(),
        "Job ready"
    );
    // The job directory is the handle for --resume, so it goes to stdout.
    println!("{}", job.path().display());

    if args.no_fetch {
        info!("Skipping retrieval (--no-fetch)");
        return Ok(());
    }

    let client = ApiClient::with_base_url(&args.api_url).context("invalid --api-url")?;
    let summary = run_pipeline(&job, &run_args, &config, &client, &args.query_options())
        .await
        .with_context(|| {
            format!(
                "retrieval failed; resume with --resume -d {}",
                job.path().display()
            )
        })?;

    info!(
        documents = summary.documents,
        concordances = summary.concordances,
        corpus_reused = summary.corpus_reused,
        concordance_reused = summary.concordance_reused,
        results = %summary.results_path.display(),
        "Retrieval complete"
    );

    Ok(())
}
