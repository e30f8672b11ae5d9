//! Request construction for the DH-lab corpus and concordance endpoints.
//!
//! Both requests search for the same full-text expression: every word form of
//! every lemma, in declaration order, joined by `" OR "`. Forms repeated across
//! lemmas are kept as they are, and an empty configuration produces an empty
//! expression which is sent unchanged.
//!
//! Builders are pure. Struct field order fixes the serialized key order, so
//! equal inputs always give byte-identical payloads.

use serde::Serialize;

use crate::job::RunArguments;
use crate::lexicon::LexicalConfig;

/// Disjunction operator of the DH-lab full-text syntax.
pub const OR_OPERATOR: &str = " OR ";

/// Default result cap for corpus queries.
pub const DEFAULT_CORPUS_LIMIT: u32 = 10;

/// Default result cap for concordance queries.
pub const DEFAULT_CONCORDANCE_LIMIT: u32 = 100;

/// Default number of context tokens around each concordance hit.
pub const DEFAULT_CONCORDANCE_WINDOW: u32 = 25;

/// Tunable request parameters that are not part of the persisted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub corpus_limit: u32,
    pub concordance_limit: u32,
    pub window: u32,
    pub html_formatting: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            corpus_limit: DEFAULT_CORPUS_LIMIT,
            concordance_limit: DEFAULT_CONCORDANCE_LIMIT,
            window: DEFAULT_CONCORDANCE_WINDOW,
            html_formatting: false,
        }
    }
}

/// Body of a `build_corpus` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusQuery {
    pub doctype: String,
    pub from_year: i32,
    /// Exclusive upper bound, as the API expects.
    pub to_year: i32,
    pub fulltext: String,
    pub lang: String,
    pub limit: u32,
}

/// Body of a `conc` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcordanceQuery {
    pub dhlabids: Vec<i64>,
    pub limit: u32,
    pub query: String,
    pub window: u32,
    pub html_formatting: bool,
}

/// Joins every word form of `config` into one full-text expression.
#[must_use]
pub fn fulltext_query(config: &LexicalConfig) -> String {
    config.forms().collect::<Vec<_>>().join(OR_OPERATOR)
}

/// Builds the corpus selection request for a run.
///
/// The run's year range is inclusive while the API treats `to_year` as
/// exclusive, so `to_year` is submitted as `to + 1`.
#[must_use]
pub fn build_corpus_query(
    args: &RunArguments,
    config: &LexicalConfig,
    options: &QueryOptions,
) -> CorpusQuery {
    CorpusQuery {
        doctype: args.doctype.clone(),
        from_year: args.from_year,
        to_year: args.to_year.saturating_add(1),
        fulltext: fulltext_query(config),
        lang: config.language.clone(),
        limit: options.corpus_limit,
    }
}

/// Builds the concordance request for a set of documents.
#[must_use]
pub fn build_concordance_query(
    config: &LexicalConfig,
    dhlabids: &[i64],
    options: &QueryOptions,
) -> ConcordanceQuery {
    ConcordanceQuery {
        dhlabids: dhlabids.to_vec(),
        limit: options.concordance_limit,
        query: fulltext_query(config),
        window: options.window,
        html_formatting: options.html_formatting,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lexicon::{Lemma, Word};

    fn word(form: &str) -> Word {
        Word {
            form: form.to_string(),
            ..Word::default()
        }
    }

    fn config(lemmas: &[(&str, &[&str])]) -> LexicalConfig {
        LexicalConfig {
            attribute: "tempus".to_string(),
            language: "nob".to_string(),
            lemmas: lemmas
                .iter()
                .map(|(lemma, forms)| Lemma {
                    lemma: (*lemma).to_string(),
                    words: forms.iter().map(|form| word(form)).collect(),
                })
                .collect(),
        }
    }

    fn args(from: i32, to: i32) -> RunArguments {
        RunArguments {
            config_file_name: "ga.json".to_string(),
            doctype: "digibok".to_string(),
            from_year: from,
            to_year: to,
        }
    }

    #[test]
    fn test_corpus_query_example_payload() {
        let query = build_corpus_query(
            &args(1950, 1960),
            &config(&[("gå", &["går", "gikk"])]),
            &QueryOptions::default(),
        );
        assert_eq!(query.fulltext, "går OR gikk");
        assert_eq!(query.from_year, 1950);
        assert_eq!(query.to_year, 1961);
        assert_eq!(query.limit, 10);
        assert_eq!(query.lang, "nob");
        assert_eq!(
            serde_json::to_string(&query).unwrap(),
            r#"{"doctype":"digibok","from_year":1950,"to_year":1961,"fulltext":"går OR gikk","lang":"nob","limit":10}"#
        );
    }

    #[test]
    fn test_corpus_query_upper_bound_is_exclusive_for_every_range() {
        for (from, to) in [(1800, 1800), (1814, 1905), (1, 2024), (2000, 2001)] {
            let query = build_corpus_query(&args(from, to), &config(&[]), &QueryOptions::default());
            assert_eq!(query.from_year, from);
            assert_eq!(query.to_year, to + 1, "range {from}..={to}");
        }
    }

    #[test]
    fn test_fulltext_keeps_duplicates_across_lemmas() {
        let config = config(&[("ha", &["har", "hadde"]), ("have", &["har"])]);
        assert_eq!(fulltext_query(&config), "har OR hadde OR har");
    }

    #[test]
    fn test_fulltext_skips_lemmas_without_words() {
        let config = config(&[("tom", &[]), ("gå", &["gikk"])]);
        assert_eq!(fulltext_query(&config), "gikk");
    }

    #[test]
    fn test_empty_configuration_gives_empty_expression() {
        let query = build_corpus_query(&args(1950, 1960), &config(&[]), &QueryOptions::default());
        assert_eq!(query.fulltext, "");
    }

    #[test]
    fn test_concordance_query_defaults() {
        let query = build_concordance_query(
            &config(&[("gå", &["går", "gikk"])]),
            &[100_123, 100_456],
            &QueryOptions::default(),
        );
        assert_eq!(
            serde_json::to_string(&query).unwrap(),
            r#"{"dhlabids":[100123,100456],"limit":100,"query":"går OR gikk","window":25,"html_formatting":false}"#
        );
    }

    #[test]
    fn test_concordance_query_honours_options() {
        let options = QueryOptions {
            concordance_limit: 5,
            window: 10,
            html_formatting: true,
            ..QueryOptions::default()
        };
        let query = build_concordance_query(&config(&[("gå", &["gikk"])]), &[7], &options);
        assert_eq!(query.limit, 5);
        assert_eq!(query.window, 10);
        assert!(query.html_formatting);
    }

    #[test]
    fn test_builders_are_deterministic() {
        let config = config(&[("gå", &["går", "gikk"]), ("stå", &["sto"])]);
        let first = serde_json::to_vec(&build_corpus_query(
            &args(1900, 1950),
            &config,
            &QueryOptions::default(),
        ))
        .unwrap();
        let second = serde_json::to_vec(&build_corpus_query(
            &args(1900, 1950),
            &config,
            &QueryOptions::default(),
        ))
        .unwrap();
        assert_eq!(first, second);
    }
}
