use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::puzzle::builder::{Difficulty, Word};

/// A vocabulary word as stored. `synonyms` keeps the import file's encoding:
/// a JSON array string for lists, plain text otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WordRow {
    pub id: Uuid,
    pub word: String,
    pub part_of_speech: Option<String>,
    pub definition: String,
    pub synonyms: Option<String>,
    pub example_sentence: Option<String>,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

impl WordRow {
    /// Converts the row into the builder's candidate type. Rows carry tags
    /// written by the importer, so unknown tiers only appear with hand-edited
    /// data and default to medium.
    pub fn to_puzzle_word(&self) -> Word {
        Word {
            id: self.id,
            text: self.word.clone(),
            definition: self.definition.clone(),
            part_of_speech: self.part_of_speech.clone(),
            difficulty: Difficulty::from_tag(&self.difficulty),
        }
    }
}
