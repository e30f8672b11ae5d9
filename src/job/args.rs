//! Run arguments: the persisted parameters of a job and the raw candidates
//! supplied on the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::JobError;

/// Parameters of a run, persisted once at job start and reloaded on resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArguments {
    /// Base name of the configuration snapshot inside the job directory.
    pub config_file_name: String,
    /// Document type to search for.
    pub doctype: String,
    /// First year of the range (inclusive).
    pub from_year: i32,
    /// Last year of the range (inclusive).
    pub to_year: i32,
}

/// Arguments as supplied on one invocation, before validation.
///
/// `None` means the flag was not given.
#[derive(Debug, Clone, Default)]
pub struct CandidateArguments {
    pub config: Option<PathBuf>,
    pub doctype: Option<String>,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

/// Fresh-run arguments after validation.
#[derive(Debug, Clone)]
pub(crate) struct FreshArguments<'a> {
    pub(crate) config: &'a Path,
    pub(crate) config_file_name: String,
    pub(crate) doctype: &'a str,
    pub(crate) from: i32,
    pub(crate) to: i32,
}

impl CandidateArguments {
    /// Names of the fresh-run flags that were supplied.
    #[must_use]
    pub fn supplied_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.config.is_some() {
            flags.push("--config");
        }
        if self.doctype.is_some() {
            flags.push("--doctype");
        }
        if self.from.is_some() {
            flags.push("--from");
        }
        if self.to.is_some() {
            flags.push("--to");
        }
        flags
    }

    /// Rejects any fresh-run parameter on a resume invocation.
    pub(crate) fn ensure_resumable(&self) -> Result<(), JobError> {
        let flags = self.supplied_flags();
        if flags.is_empty() {
            Ok(())
        } else {
            Err(JobError::ConflictingArguments { flags })
        }
    }

    /// Validates the arguments required by a fresh run.
    pub(crate) fn validate_fresh(&self) -> Result<FreshArguments<'_>, JobError> {
        let config = self
            .config
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| JobError::validation("--config must be set when not using --resume"))?;
        let config_file_name = config
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                JobError::validation(format!(
                    "--config '{}' does not name a file",
                    config.display()
                ))
            })?
            .to_string();

        let doctype = self
            .doctype
            .as_deref()
            .filter(|doctype| !doctype.trim().is_empty())
            .ok_or_else(|| JobError::validation("--doctype must be set when not using --resume"))?;
        if doctype.trim() != doctype {
            return Err(JobError::validation(format!(
                "--doctype '{doctype}' has leading or trailing whitespace"
            )));
        }

        let (from, to) = match (self.from, self.to) {
            (Some(from), Some(to)) if from != 0 && to != 0 => (from, to),
            _ => return Err(JobError::validation("--from and --to must both be set")),
        };
        if from > to {
            return Err(JobError::validation(format!(
                "--to ({to}) must be greater than or equal to --from ({from})"
            )));
        }

        Ok(FreshArguments {
            config,
            config_file_name,
            doctype,
            from,
            to,
        })
    }
}
