use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-word flashcard review state. `user_id` is NULL for anonymous study.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardProgressRow {
    pub id: Uuid,
    pub word_id: Uuid,
    pub user_id: Option<String>,
    pub accuracy: f64,
    pub review_count: i32,
    pub mastery_level: i32,
    pub last_reviewed: DateTime<Utc>,
}

/// Per-puzzle solve state. `best_time` only ever shrinks; `completed` is
/// sticky once set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CrosswordProgressRow {
    pub id: Uuid,
    pub crossword_id: Uuid,
    pub user_id: Option<String>,
    pub time_elapsed: i32,
    pub completed: bool,
    pub accuracy: f64,
    pub best_time: i32,
    pub attempts: i32,
    pub updated_at: DateTime<Utc>,
}
