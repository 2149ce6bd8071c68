//! Vocabulary import: wipes and repopulates the words table from the
//! configured vocabulary file.

use std::path::Path;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::puzzle::builder::Difficulty;
use crate::words::vocab_file::{self, Synonyms};

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub count: usize,
    pub skipped: usize,
    pub message: String,
}

/// Infers a difficulty tier for entries that do not declare one.
/// Short words with short definitions are easy; long words or long
/// definitions are hard; everything else is medium.
pub fn infer_difficulty(word: &str, definition: &str) -> Difficulty {
    if word.len() <= 5 && definition.len() <= 50 {
        Difficulty::Easy
    } else if word.len() >= 10 || definition.len() >= 100 {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    }
}

/// Replaces the words table with the vocabulary file's contents.
///
/// The file is the source of truth: existing rows are deleted before
/// insertion so a re-import never leaves stale rows behind. Duplicate
/// words within the file count as skipped.
pub async fn run_import(db: &PgPool, path: &Path) -> Result<ImportSummary, AppError> {
    let (entries, mut skipped) = vocab_file::load(path).await?;

    sqlx::query("DELETE FROM words").execute(db).await?;

    let mut imported = 0usize;
    for entry in entries {
        let difficulty = entry
            .difficulty
            .as_deref()
            .map(Difficulty::from_tag)
            .unwrap_or_else(|| infer_difficulty(&entry.word, &entry.definition));

        let result = sqlx::query(
            r#"
            INSERT INTO words
                (id, word, part_of_speech, definition, synonyms, example_sentence, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (word) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.word.trim().to_lowercase())
        .bind(entry.part_of_speech.as_deref())
        .bind(&entry.definition)
        .bind(entry.synonyms.as_ref().map(Synonyms::to_stored))
        .bind(entry.example_sentence.as_deref())
        .bind(difficulty.as_str())
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            skipped += 1;
        } else {
            imported += 1;
        }
    }

    info!("vocabulary import finished: {imported} imported, {skipped} skipped");

    Ok(ImportSummary {
        success: true,
        count: imported,
        skipped,
        message: format!("Imported {imported} words, skipped {skipped}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_word_short_definition_is_easy() {
        assert_eq!(infer_difficulty("terse", "brief"), Difficulty::Easy);
    }

    #[test]
    fn test_long_word_is_hard() {
        assert_eq!(
            infer_difficulty("perspicacious", "sharp"),
            Difficulty::Hard
        );
    }

    #[test]
    fn test_long_definition_is_hard() {
        let definition = "a definition that rambles on well past the hundred character \
                          threshold used to decide that a word is difficult to study";
        assert_eq!(infer_difficulty("house", definition), Difficulty::Hard);
    }

    #[test]
    fn test_everything_else_is_medium() {
        assert_eq!(
            infer_difficulty("garden", "a plot of ground where plants are cultivated"),
            Difficulty::Medium
        );
    }

    #[test]
    fn test_short_word_with_longer_definition_is_not_easy() {
        // the easy rule needs both the word and the definition to be short
        let definition = "having or showing the ability to notice and understand things";
        assert_eq!(infer_difficulty("keen", definition), Difficulty::Medium);
    }
}
