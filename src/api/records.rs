//! Response records returned by the DH-lab API.
//!
//! Both endpoints answer with a set of parallel maps keyed by document
//! identifier. Maps absent from a response decode as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of a `build_corpus` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusRecord {
    #[serde(rename = "dhlabid")]
    pub dhlab_id: BTreeMap<String, i64>,
    pub doctype: BTreeMap<String, String>,
    pub langs: BTreeMap<String, String>,
    pub title: BTreeMap<String, String>,
    pub urn: BTreeMap<String, String>,
    pub year: BTreeMap<String, i32>,
}

impl CorpusRecord {
    /// Document identifiers present in the record, in sorted order.
    ///
    /// Keys are gathered from every map so a document missing from some of
    /// them is still listed.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .dhlab_id
            .keys()
            .chain(self.doctype.keys())
            .chain(self.langs.keys())
            .chain(self.title.keys())
            .chain(self.urn.keys())
            .chain(self.year.keys())
            .map(String::as_str)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Numeric DH-lab ids of all documents, sorted and deduplicated.
    #[must_use]
    pub fn dhlab_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.dhlab_id.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of documents in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a `conc` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcordanceRecord {
    #[serde(rename = "docid")]
    pub doc_id: BTreeMap<String, i64>,
    pub urn: BTreeMap<String, String>,
    pub conc: BTreeMap<String, String>,
}

impl ConcordanceRecord {
    /// Number of concordance lines in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conc.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conc.is_empty()
    }
}
