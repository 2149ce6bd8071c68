use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored, generated puzzle. `grid` holds the serialized cell matrix,
/// `clues` a word-text → clue-text map; both round-trip through jsonb.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrosswordRow {
    pub id: Uuid,
    pub seed: String,
    pub word_count: i32,
    pub difficulty: String,
    pub grid: Value,
    pub clues: Value,
    pub created_at: DateTime<Utc>,
}

/// Join row binding a word to its placement within one crossword.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrosswordWordRow {
    pub id: Uuid,
    pub crossword_id: Uuid,
    pub word_id: Uuid,
    pub position: Value,
}
