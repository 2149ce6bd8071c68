use axum::{
    extract::{Query, State},
    Json,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::word::WordRow;
use crate::puzzle::builder::Difficulty;
use crate::state::AppState;
use crate::words::import::{run_import, ImportSummary};
use crate::words::vocab_file;

#[derive(Debug, Deserialize)]
pub struct WordsQuery {
    pub difficulty: Option<Difficulty>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub random: bool,
}

/// GET /api/v1/words
/// Lists words alphabetically, or as a random sample when `random=true`.
pub async fn handle_list_words(
    State(state): State<AppState>,
    Query(query): Query<WordsQuery>,
) -> Result<Json<Vec<WordRow>>, AppError> {
    let mut rows: Vec<WordRow> = match query.difficulty {
        Some(difficulty) => {
            sqlx::query_as("SELECT * FROM words WHERE difficulty = $1 ORDER BY word ASC")
                .bind(difficulty.as_str())
                .fetch_all(&state.db)
                .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM words ORDER BY word ASC")
                .fetch_all(&state.db)
                .await?
        }
    };

    if query.random {
        rows.shuffle(&mut rand::thread_rng());
    }
    if let Some(limit) = query.limit {
        rows.truncate(limit.max(0) as usize);
    }

    Ok(Json(rows))
}

/// GET /api/v1/vocab/check
/// Reports whether the configured vocabulary file exists on disk.
pub async fn handle_vocab_check(State(state): State<AppState>) -> Json<Value> {
    let exists = vocab_file::exists(&state.config.vocab_file).await;
    Json(json!({ "exists": exists }))
}

/// POST /api/v1/admin/import
pub async fn handle_import(
    State(state): State<AppState>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = run_import(&state.db, &state.config.vocab_file).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_query_defaults() {
        let query: WordsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.difficulty.is_none());
        assert!(query.limit.is_none());
        assert!(!query.random);
    }

    #[test]
    fn test_words_query_parses_difficulty() {
        let query: WordsQuery =
            serde_json::from_value(serde_json::json!({ "difficulty": "easy", "random": true }))
                .unwrap();
        assert_eq!(query.difficulty, Some(Difficulty::Easy));
        assert!(query.random);
    }
}
