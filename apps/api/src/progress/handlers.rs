//! Flashcard and crossword progress endpoints. One row per (subject, user);
//! anonymous study uses a NULL user, matched with IS NOT DISTINCT FROM.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::crossword::CrosswordRow;
use crate::models::progress::{CrosswordProgressRow, FlashcardProgressRow};
use crate::models::word::WordRow;
use crate::progress::tracking;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardProgressRequest {
    pub word_id: Uuid,
    pub user_id: Option<String>,
    pub correct: bool,
}

#[derive(Debug, Serialize)]
pub struct FlashcardProgressEntry {
    #[serde(flatten)]
    pub progress: FlashcardProgressRow,
    pub word: WordRow,
}

/// POST /api/v1/flashcards/progress
pub async fn handle_record_flashcard_progress(
    State(state): State<AppState>,
    Json(req): Json<FlashcardProgressRequest>,
) -> Result<Json<FlashcardProgressRow>, AppError> {
    let existing: Option<FlashcardProgressRow> = sqlx::query_as(
        "SELECT * FROM flashcard_progress WHERE word_id = $1 AND user_id IS NOT DISTINCT FROM $2",
    )
    .bind(req.word_id)
    .bind(&req.user_id)
    .fetch_optional(&state.db)
    .await?;

    let row = match existing {
        Some(previous) => {
            let review_count = previous.review_count + 1;
            let accuracy = tracking::rolling_accuracy(previous.accuracy, review_count, req.correct);
            let mastery = tracking::mastery_level(accuracy);
            sqlx::query_as(
                r#"
                UPDATE flashcard_progress
                SET accuracy = $1, review_count = $2, mastery_level = $3, last_reviewed = now()
                WHERE id = $4
                RETURNING *
                "#,
            )
            .bind(accuracy)
            .bind(review_count)
            .bind(mastery)
            .bind(previous.id)
            .fetch_one(&state.db)
            .await?
        }
        None => {
            // first review: accuracy is simply the outcome, mastery 1 or 0
            sqlx::query_as(
                r#"
                INSERT INTO flashcard_progress
                    (id, word_id, user_id, accuracy, review_count, mastery_level)
                VALUES ($1, $2, $3, $4, 1, $5)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(req.word_id)
            .bind(&req.user_id)
            .bind(if req.correct { 1.0 } else { 0.0 })
            .bind(if req.correct { 1 } else { 0 })
            .fetch_one(&state.db)
            .await?
        }
    };

    Ok(Json(row))
}

/// GET /api/v1/flashcards/progress
pub async fn handle_list_flashcard_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<Vec<FlashcardProgressEntry>>, AppError> {
    let rows: Vec<FlashcardProgressRow> = sqlx::query_as(
        r#"
        SELECT * FROM flashcard_progress
        WHERE user_id IS NOT DISTINCT FROM $1
        ORDER BY last_reviewed DESC
        "#,
    )
    .bind(&query.user_id)
    .fetch_all(&state.db)
    .await?;

    let word_ids: Vec<Uuid> = rows.iter().map(|r| r.word_id).collect();
    let words: Vec<WordRow> = sqlx::query_as("SELECT * FROM words WHERE id = ANY($1)")
        .bind(&word_ids)
        .fetch_all(&state.db)
        .await?;
    let by_id: HashMap<Uuid, WordRow> = words.into_iter().map(|w| (w.id, w)).collect();

    let entries = rows
        .into_iter()
        .filter_map(|progress| {
            let word = by_id.get(&progress.word_id)?.clone();
            Some(FlashcardProgressEntry { progress, word })
        })
        .collect();

    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct CrosswordProgressRequest {
    pub crossword_id: Uuid,
    pub user_id: Option<String>,
    pub time_elapsed: i32,
    #[serde(default)]
    pub completed: bool,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CrosswordProgressEntry {
    #[serde(flatten)]
    pub progress: CrosswordProgressRow,
    pub crossword: CrosswordRow,
}

/// POST /api/v1/crosswords/progress
pub async fn handle_record_crossword_progress(
    State(state): State<AppState>,
    Json(req): Json<CrosswordProgressRequest>,
) -> Result<Json<CrosswordProgressRow>, AppError> {
    let existing: Option<CrosswordProgressRow> = sqlx::query_as(
        "SELECT * FROM crossword_progress WHERE crossword_id = $1 AND user_id IS NOT DISTINCT FROM $2",
    )
    .bind(req.crossword_id)
    .bind(&req.user_id)
    .fetch_optional(&state.db)
    .await?;

    let row = match existing {
        Some(previous) => {
            let best = tracking::best_time(Some(previous.best_time), req.time_elapsed);
            sqlx::query_as(
                r#"
                UPDATE crossword_progress
                SET time_elapsed = $1,
                    completed = $2,
                    accuracy = $3,
                    best_time = $4,
                    attempts = $5,
                    updated_at = now()
                WHERE id = $6
                RETURNING *
                "#,
            )
            .bind(req.time_elapsed)
            .bind(req.completed || previous.completed)
            .bind(req.accuracy.unwrap_or(previous.accuracy))
            .bind(best)
            .bind(previous.attempts + 1)
            .bind(previous.id)
            .fetch_one(&state.db)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                INSERT INTO crossword_progress
                    (id, crossword_id, user_id, time_elapsed, completed, accuracy, best_time, attempts)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(req.crossword_id)
            .bind(&req.user_id)
            .bind(req.time_elapsed)
            .bind(req.completed)
            .bind(req.accuracy.unwrap_or(0.0))
            .bind(req.time_elapsed)
            .fetch_one(&state.db)
            .await?
        }
    };

    Ok(Json(row))
}

/// GET /api/v1/crosswords/progress
pub async fn handle_list_crossword_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<Vec<CrosswordProgressEntry>>, AppError> {
    let rows: Vec<CrosswordProgressRow> = sqlx::query_as(
        r#"
        SELECT * FROM crossword_progress
        WHERE user_id IS NOT DISTINCT FROM $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(&query.user_id)
    .fetch_all(&state.db)
    .await?;

    let crossword_ids: Vec<Uuid> = rows.iter().map(|r| r.crossword_id).collect();
    let crosswords: Vec<CrosswordRow> =
        sqlx::query_as("SELECT * FROM crosswords WHERE id = ANY($1)")
            .bind(&crossword_ids)
            .fetch_all(&state.db)
            .await?;
    let by_id: HashMap<Uuid, CrosswordRow> =
        crosswords.into_iter().map(|c| (c.id, c)).collect();

    let entries = rows
        .into_iter()
        .filter_map(|progress| {
            let crossword = by_id.get(&progress.crossword_id)?.clone();
            Some(CrosswordProgressEntry {
                progress,
                crossword,
            })
        })
        .collect();

    Ok(Json(entries))
}
