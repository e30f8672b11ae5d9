//! Job state management.
//!
//! A job directory holds everything one run needs to be restarted: a snapshot
//! of the lexical configuration, the persisted [`RunArguments`], and the four
//! pipeline stage directories. Fresh runs create it exactly once; resumed runs
//! reload it and take all parameters from the persisted record.
//!
//! The arguments record is written last and atomically. Its presence marks a
//! fully initialized job, and any failure before that point removes the
//! directory again, so a later resume never sees a half-built job.
//!
//! No locking is performed. Running two processes against the same job
//! directory is unsupported.

mod args;
mod error;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::lexicon::LexicalConfig;

pub use args::{CandidateArguments, RunArguments};
pub use error::{JobError, PersistError};

/// File name of the persisted arguments record.
pub const ARGS_FILE_NAME: &str = "args.json";

/// Timestamp layout used in job directory names (UTC, second precision).
pub const JOB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Pipeline stage subdirectories of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Incoming,
    Working,
    Outgoing,
    Results,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 4] = [
        Stage::Incoming,
        Stage::Working,
        Stage::Outgoing,
        Stage::Results,
    ];

    /// Directory name of the stage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Working => "working",
            Self::Outgoing => "outgoing",
            Self::Results => "results",
        }
    }
}

/// An initialized job directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDirectory {
    path: PathBuf,
}

impl JobDirectory {
    /// Root of the job directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the persisted arguments record.
    #[must_use]
    pub fn args_path(&self) -> PathBuf {
        self.path.join(ARGS_FILE_NAME)
    }

    /// Path of the configuration snapshot named by `args`.
    #[must_use]
    pub fn config_path(&self, args: &RunArguments) -> PathBuf {
        self.path.join(&args.config_file_name)
    }

    /// Path of a stage subdirectory.
    #[must_use]
    pub fn stage_path(&self, stage: Stage) -> PathBuf {
        self.path.join(stage.as_str())
    }

    /// Loads the configuration snapshot of this job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::ConfigLoad`] if the snapshot cannot be read or decoded.
    pub fn load_config(&self, args: &RunArguments) -> Result<LexicalConfig, JobError> {
        Ok(LexicalConfig::load(&self.config_path(args))?)
    }

    /// Builds the directory name of a fresh job started at `now`.
    ///
    /// The name is the UTC timestamp followed by the configuration file's
    /// base name without its extension.
    #[must_use]
    pub fn name_for(config: &Path, now: DateTime<Utc>) -> String {
        let stem = config
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        format!("{}-{stem}", now.format(JOB_TIMESTAMP_FORMAT))
    }

    /// Fills a freshly created job directory and commits `args`.
    ///
    /// On failure the whole directory is removed, so nothing resumable
    /// remains.
    fn initialize(&self, config: &Path, args: &RunArguments) -> Result<(), JobError> {
        let initialized = self
            .snapshot_config(config, &args.config_file_name)
            .and_then(|()| self.create_stage_dirs())
            .and_then(|()| self.persist_args(args));
        if let Err(err) = initialized {
            if let Err(cleanup) = fs::remove_dir_all(&self.path) {
                warn!(
                    path = %self.path.display(),
                    error = %cleanup,
                    "Failed to remove partially initialized job directory"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    fn snapshot_config(&self, source: &Path, file_name: &str) -> Result<(), JobError> {
        let destination = self.path.join(file_name);
        fs::copy(source, &destination).map_err(|err| JobError::ConfigSnapshot {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: err,
        })?;
        // The snapshot must decode before the job is committed.
        LexicalConfig::load(&destination)?;
        debug!(path = %destination.display(), "Configuration snapshot written");
        Ok(())
    }

    fn create_stage_dirs(&self) -> Result<(), JobError> {
        for stage in Stage::ALL {
            let path = self.stage_path(stage);
            // create_dir, not create_dir_all: an existing stage means the
            // directory is being reused.
            fs::create_dir(&path).map_err(|source| JobError::StageDirectory { path, source })?;
        }
        Ok(())
    }

    fn persist_args(&self, args: &RunArguments) -> Result<(), JobError> {
        let path = self.args_path();
        let data =
            serde_json::to_vec_pretty(args).map_err(|err| JobError::persistence(&path, err))?;
        write_atomic(&path, &data).map_err(|err| JobError::persistence(&path, err))?;
        debug!(path = %path.display(), "Run arguments persisted");
        Ok(())
    }

    fn read_args(&self) -> Result<RunArguments, JobError> {
        let path = self.args_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(JobError::ResumeStateMissing { path });
            }
            Err(err) => return Err(JobError::persistence(&path, err)),
        };
        let args: RunArguments =
            serde_json::from_slice(&data).map_err(|err| JobError::persistence(&path, err))?;

        if Path::new(&args.config_file_name).file_name()
            != Some(std::ffi::OsStr::new(&args.config_file_name))
        {
            return Err(JobError::persistence(
                &path,
                PersistError::InvalidConfigName(args.config_file_name),
            ));
        }
        Ok(args)
    }
}

/// Starts a fresh job under `base_dir`, or resumes the job at `base_dir`.
///
/// On resume, `candidate` must be empty: every parameter comes from the
/// persisted arguments record.
///
/// # Errors
///
/// See [`JobError`]. Validation failures, including
/// [`JobError::ConflictingArguments`], are reported before the filesystem
/// is touched.
pub fn start_or_resume(
    base_dir: &Path,
    resume: bool,
    candidate: &CandidateArguments,
) -> Result<(JobDirectory, RunArguments), JobError> {
    if resume {
        candidate.ensure_resumable()?;
        resume_job(base_dir)
    } else {
        start_job_at(base_dir, candidate, Utc::now())
    }
}

/// Creates a fresh job under `base_dir` named after `now`.
///
/// # Errors
///
/// Returns [`JobError::Validation`] for bad arguments,
/// [`JobError::DirectoryCreation`] if the job directory exists or cannot be
/// created, [`JobError::ConfigLoad`] if the snapshot does not decode, and the
/// snapshot, stage, or persistence error of whichever step failed afterwards.
/// In the latter cases the job directory is removed.
#[instrument(skip_all, fields(base_dir = %base_dir.display()))]
pub fn start_job_at(
    base_dir: &Path,
    candidate: &CandidateArguments,
    now: DateTime<Utc>,
) -> Result<(JobDirectory, RunArguments), JobError> {
    let fresh = candidate.validate_fresh()?;
    if is_reserved_name(&fresh.config_file_name) {
        return Err(JobError::validation(format!(
            "--config file name '{}' clashes with the job directory layout",
            fresh.config_file_name
        )));
    }

    fs::create_dir_all(base_dir).map_err(|source| JobError::DirectoryCreation {
        path: base_dir.to_path_buf(),
        source,
    })?;
    let path = base_dir.join(JobDirectory::name_for(fresh.config, now));
    fs::create_dir(&path).map_err(|source| JobError::DirectoryCreation {
        path: path.clone(),
        source,
    })?;
    let job = JobDirectory { path };

    let args = RunArguments {
        config_file_name: fresh.config_file_name.clone(),
        doctype: fresh.doctype.to_string(),
        from_year: fresh.from,
        to_year: fresh.to,
    };

    job.initialize(fresh.config, &args)?;

    info!(
        job_dir = %job.path().display(),
        config = %args.config_file_name,
        doctype = %args.doctype,
        from = args.from_year,
        to = args.to_year,
        "Job created"
    );
    Ok((job, args))
}

/// Reloads the job at `job_dir`.
///
/// # Errors
///
/// Returns [`JobError::ResumeStateMissing`] if the arguments record or the
/// configuration snapshot is absent, and [`JobError::ArgumentPersistence`] if
/// the record cannot be read or decoded.
#[instrument(skip_all, fields(job_dir = %job_dir.display()))]
pub fn resume_job(job_dir: &Path) -> Result<(JobDirectory, RunArguments), JobError> {
    let job = JobDirectory {
        path: job_dir.to_path_buf(),
    };
    let args = job.read_args()?;

    let config_path = job.config_path(&args);
    if !config_path.is_file() {
        return Err(JobError::ResumeStateMissing { path: config_path });
    }

    info!(
        config = %args.config_file_name,
        doctype = %args.doctype,
        from = args.from_year,
        to = args.to_year,
        "Job resumed"
    );
    Ok((job, args))
}

fn is_reserved_name(file_name: &str) -> bool {
    file_name == ARGS_FILE_NAME
        || file_name.ends_with(".tmp")
        || Stage::ALL.iter().any(|stage| stage.as_str() == file_name)
}

/// Writes `data` to `path` through a sibling temp file and a rename, so
/// readers see either the old content or the complete new content.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
