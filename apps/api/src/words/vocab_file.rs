//! Vocabulary file access. The file is a JSON array of word entries in the
//! upstream camelCase shape, occasionally interleaved with `_note`-style
//! placeholder objects that are ignored.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

/// Keys marking provenance/placeholder objects rather than word entries.
const PLACEHOLDER_KEYS: [&str; 3] = ["_note", "_source", "_format"];

/// One vocabulary entry as it appears in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub synonyms: Option<Synonyms>,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Synonyms appear either as an array or a single free-text string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Synonyms {
    List(Vec<String>),
    Text(String),
}

impl Synonyms {
    /// Stored encoding: lists become a JSON array string, text is kept as-is.
    pub fn to_stored(&self) -> String {
        match self {
            Synonyms::List(items) => serde_json::to_string(items).unwrap_or_default(),
            Synonyms::Text(text) => text.clone(),
        }
    }
}

/// Whether the vocabulary file is present at the configured path.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Reads and parses the vocabulary file. Returns the usable entries plus the
/// number of malformed entries skipped.
pub async fn load(path: &Path) -> Result<(Vec<VocabEntry>, usize), AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|_| {
        AppError::VocabFile(format!(
            "Vocabulary file not found at {}. Create it with the word list before importing.",
            path.display()
        ))
    })?;
    parse_entries(&raw)
}

/// Parses the raw file contents: placeholder objects are dropped silently,
/// entries missing a word or definition count as skipped.
pub fn parse_entries(raw: &str) -> Result<(Vec<VocabEntry>, usize), AppError> {
    let values: Vec<Value> = serde_json::from_str(raw).map_err(|_| {
        AppError::VocabFile(
            "Vocabulary file must contain a non-empty JSON array of word entries.".to_string(),
        )
    })?;
    if values.is_empty() {
        return Err(AppError::VocabFile(
            "Vocabulary file must contain a non-empty JSON array of word entries.".to_string(),
        ));
    }

    let mut entries = Vec::new();
    let mut skipped = 0;
    for value in values {
        if PLACEHOLDER_KEYS.iter().any(|key| value.get(key).is_some()) {
            continue;
        }
        match serde_json::from_value::<VocabEntry>(value) {
            Ok(entry) if !entry.word.trim().is_empty() && !entry.definition.trim().is_empty() => {
                entries.push(entry)
            }
            _ => skipped += 1,
        }
    }

    Ok((entries, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_entries_reads_camel_case_fields() {
        let raw = r#"[{
            "word": "Lucid",
            "definition": "clear and easy to understand",
            "partOfSpeech": "adj",
            "exampleSentence": "Her essay was lucid.",
            "synonyms": ["clear", "plain"]
        }]"#;
        let (entries, skipped) = parse_entries(raw).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "Lucid");
        assert_eq!(entries[0].part_of_speech.as_deref(), Some("adj"));
    }

    #[test]
    fn test_parse_entries_skips_placeholders() {
        let raw = r#"[
            {"_note": "scraped 2024", "_format": "v2"},
            {"word": "terse", "definition": "brief and to the point"}
        ]"#;
        let (entries, skipped) = parse_entries(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 0, "placeholders are dropped, not counted");
    }

    #[test]
    fn test_parse_entries_counts_malformed_as_skipped() {
        let raw = r#"[
            {"word": "terse", "definition": "brief and to the point"},
            {"word": "", "definition": "empty word"},
            {"word": "orphan"}
        ]"#;
        let (entries, skipped) = parse_entries(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_parse_entries_rejects_empty_array() {
        assert!(parse_entries("[]").is_err());
        assert!(parse_entries("not json").is_err());
    }

    #[test]
    fn test_synonyms_stored_encoding() {
        let list = Synonyms::List(vec!["clear".to_string(), "plain".to_string()]);
        assert_eq!(list.to_stored(), r#"["clear","plain"]"#);
        let text = Synonyms::Text("clear, plain".to_string());
        assert_eq!(text.to_stored(), "clear, plain");
    }

    #[tokio::test]
    async fn test_load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"word": "terse", "definition": "brief and to the point"}}]"#
        )
        .unwrap();

        let (entries, skipped) = load(file.path()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 0);
        assert!(exists(file.path()).await);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_vocab_error() {
        let result = load(Path::new("/nonexistent/sats_vocab.json")).await;
        assert!(matches!(result, Err(AppError::VocabFile(_))));
        assert!(!exists(Path::new("/nonexistent/sats_vocab.json")).await);
    }
}
