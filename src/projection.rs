//! Projection of corpus records into flat output rows.

use serde::Serialize;

use crate::api::CorpusRecord;

/// Column names of a projected corpus row, in output order.
pub const CORPUS_COLUMNS: [&str; 6] = ["dhlabid", "doctype", "langs", "title", "urn", "year"];

/// One document of a corpus record, in fixed column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusFields {
    #[serde(rename = "dhlabid")]
    pub dhlab_id: i64,
    pub doctype: String,
    pub langs: String,
    pub title: String,
    pub urn: String,
    pub year: i32,
}

impl CorpusFields {
    /// Renders the row as strings, in [`CORPUS_COLUMNS`] order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        vec![
            self.dhlab_id.to_string(),
            self.doctype,
            self.langs,
            self.title,
            self.urn,
            self.year.to_string(),
        ]
    }
}

/// Looks `id` up in every map of `record`.
///
/// Keys missing from a map yield that field's zero value (`0` or `""`), so
/// callers needing strict presence must check membership first.
#[must_use]
pub fn project_corpus_record(id: &str, record: &CorpusRecord) -> CorpusFields {
    CorpusFields {
        dhlab_id: record.dhlab_id.get(id).copied().unwrap_or_default(),
        doctype: record.doctype.get(id).cloned().unwrap_or_default(),
        langs: record.langs.get(id).cloned().unwrap_or_default(),
        title: record.title.get(id).cloned().unwrap_or_default(),
        urn: record.urn.get(id).cloned().unwrap_or_default(),
        year: record.year.get(id).copied().unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record() -> CorpusRecord {
        let mut record = CorpusRecord::default();
        record.dhlab_id.insert("urn:123".to_string(), 123);
        record.doctype.insert("urn:123".to_string(), "digibok".to_string());
        record.langs.insert("urn:123".to_string(), "nob".to_string());
        record.title.insert("urn:123".to_string(), "X".to_string());
        record
            .urn
            .insert("urn:123".to_string(), "URN:NBN:no-nb_digibok_123".to_string());
        record
    }

    #[test]
    fn test_projection_orders_fields() {
        let mut record = record();
        record.year.insert("urn:123".to_string(), 1955);

        let row = project_corpus_record("urn:123", &record).into_vec();

        assert_eq!(
            row,
            vec!["123", "digibok", "nob", "X", "URN:NBN:no-nb_digibok_123", "1955"]
        );
        assert_eq!(row.len(), CORPUS_COLUMNS.len());
    }

    #[test]
    fn test_missing_year_projects_zero() {
        let row = project_corpus_record("urn:123", &record()).into_vec();
        assert_eq!(row.last().map(String::as_str), Some("0"));
        assert_eq!(row[3], "X");
    }

    #[test]
    fn test_unknown_identifier_projects_zero_values() {
        let fields = project_corpus_record("urn:999", &record());
        assert_eq!(fields, CorpusFields::default());
        assert_eq!(fields.into_vec(), vec!["0", "", "", "", "", "0"]);
    }

    #[test]
    fn test_serialized_keys_follow_column_names() {
        let json = serde_json::to_string(&CorpusFields::default()).unwrap();
        assert_eq!(
            json,
            r#"{"dhlabid":0,"doctype":"","langs":"","title":"","urn":"","year":0}"#
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for column in CORPUS_COLUMNS {
            assert!(value.get(column).is_some(), "missing column {column}");
        }
    }
}
