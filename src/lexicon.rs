//! Lexical configuration model.
//!
//! A configuration names an attribute, a language code, and the lemmas whose
//! word forms drive every query of a run. It is loaded once from the job
//! directory's snapshot and never mutated afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors produced while loading a lexical configuration.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The configuration file could not be read.
    #[error("failed to read lexical configuration {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON of the expected shape.
    #[error("failed to parse lexical configuration {path}: {source}")]
    Parse {
        /// Configuration file path.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// A single surface form realizing a lemma.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Word {
    /// Surface form as it appears in running text.
    #[serde(alias = "Form")]
    pub form: String,
    /// Canonical value recorded for the form.
    #[serde(alias = "Value")]
    pub value: String,
    /// Morphological tags, in declaration order.
    #[serde(alias = "Morphology")]
    pub morphology: Vec<String>,
}

/// A canonical lexeme and the word forms realizing it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lemma {
    #[serde(alias = "Lemma")]
    pub lemma: String,
    #[serde(alias = "Words")]
    pub words: Vec<Word>,
}

/// The attribute/language/lemma hierarchy for one job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Name of the attribute under study.
    #[serde(alias = "Attribute")]
    pub attribute: String,
    /// Language code passed to corpus queries.
    #[serde(alias = "Language")]
    pub language: String,
    /// Lemmas in declaration order.
    #[serde(alias = "Lemmas")]
    pub lemmas: Vec<Lemma>,
}

impl LexicalConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Read`] if the file cannot be read and
    /// [`LexiconError::Parse`] if it does not decode.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let data = fs::read(path).map_err(|source| LexiconError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_slice(&data).map_err(|source| LexiconError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            lemmas = config.lemmas.len(),
            words = config.word_count(),
            "Lexical configuration loaded"
        );
        Ok(config)
    }

    /// Decodes a configuration from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the decode error for malformed input.
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Iterates every word form across every lemma, in declaration order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.lemmas
            .iter()
            .flat_map(|lemma| lemma.words.iter())
            .map(|word| word.form.as_str())
    }

    /// Total number of words across all lemmas.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lemmas.iter().map(|lemma| lemma.words.len()).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "attribute": "tempus",
        "language": "nob",
        "lemmas": [
            {"lemma": "gå", "words": [
                {"form": "går", "value": "presens", "morphology": ["verb", "pres"]},
                {"form": "gikk", "value": "preteritum", "morphology": ["verb", "pret"]}
            ]},
            {"lemma": "stå", "words": [
                {"form": "står", "value": "presens", "morphology": ["verb", "pres"]}
            ]}
        ]
    }"#;

    #[test]
    fn test_from_slice_decodes_full_hierarchy() {
        let config = LexicalConfig::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(config.attribute, "tempus");
        assert_eq!(config.language, "nob");
        assert_eq!(config.lemmas.len(), 2);
        assert_eq!(config.lemmas[0].lemma, "gå");
        assert_eq!(config.lemmas[0].words[1].morphology, vec!["verb", "pret"]);
    }

    #[test]
    fn test_forms_preserve_declaration_order() {
        let config = LexicalConfig::from_slice(SAMPLE.as_bytes()).unwrap();
        let forms: Vec<&str> = config.forms().collect();
        assert_eq!(forms, vec!["går", "gikk", "står"]);
        assert_eq!(config.word_count(), 3);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let raw = r#"{"lemmas":[{"lemma":"gå","words":[{"form":"går"}]}]}"#;
        let config = LexicalConfig::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(config.language, "");
        assert_eq!(config.lemmas[0].words[0].value, "");
        assert!(config.lemmas[0].words[0].morphology.is_empty());
    }

    #[test]
    fn test_capitalized_keys_are_accepted() {
        let raw = r#"{"Language":"nno","Lemmas":[{"Lemma":"gå","Words":[{"Form":"gjekk"}]}]}"#;
        let config = LexicalConfig::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(config.language, "nno");
        assert_eq!(config.forms().collect::<Vec<_>>(), vec!["gjekk"]);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = LexicalConfig::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LexiconError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_load_reports_malformed_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = LexicalConfig::load(&path).unwrap_err();
        assert!(matches!(err, LexiconError::Parse { .. }));
    }
}
