//! HTTP boundary for crossword generation: seed-idempotent fetch, candidate
//! pool assembly, builder invocation, and persistence of the result.

use std::collections::{HashMap, HashSet};

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::crossword::{CrosswordRow, CrosswordWordRow};
use crate::models::word::WordRow;
use crate::puzzle::builder::{
    Difficulty, GridBuilder, Position, DEFAULT_GRID_SIZE, DEFAULT_MAX_ATTEMPTS,
};
use crate::puzzle::grid::Cell;
use crate::state::AppState;

/// Word counts accepted for pool-based generation. Requests carrying an
/// explicit word set bypass this and use the whole set.
const ALLOWED_WORD_COUNTS: [usize; 3] = [10, 15, 20];

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Re-fetch key: when a puzzle with this seed exists, it is returned
    /// unchanged instead of generating a new one.
    pub seed: Option<String>,
    /// Explicit candidate set, e.g. the words of a flashcard study session.
    pub word_ids: Option<Vec<Uuid>>,
    pub max_attempts: Option<u32>,
}

fn default_word_count() -> usize {
    15
}

#[derive(Debug, Serialize)]
pub struct PlacedEntry {
    pub word: WordRow,
    pub position: Position,
    pub clue: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub id: Uuid,
    pub seed: String,
    pub grid: Vec<Vec<Cell>>,
    pub words: Vec<PlacedEntry>,
}

/// POST /api/v1/crosswords/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if let Some(seed) = &req.seed {
        if let Some(stored) = load_by_seed(&state.db, seed).await? {
            info!("returning stored crossword for seed {seed}");
            return Ok(Json(stored));
        }
    }

    let (rows, word_count) = load_candidates(&state.db, &req).await?;
    if rows.is_empty() {
        return Err(AppError::Validation(
            "No words found in database. Import vocabulary first.".to_string(),
        ));
    }

    let by_id: HashMap<Uuid, WordRow> = rows.iter().map(|r| (r.id, r.clone())).collect();
    let candidates: Vec<_> = rows.iter().map(WordRow::to_puzzle_word).collect();

    let builder = GridBuilder::new(DEFAULT_GRID_SIZE);
    let result = builder.generate(
        &candidates,
        word_count,
        req.difficulty,
        req.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
    );

    if !result.success {
        error!(
            placed = result.words.len(),
            requested = word_count,
            difficulty = %req.difficulty,
            "crossword generation failed"
        );
        return Err(AppError::Generation {
            placed: result.words.len(),
            requested: word_count,
        });
    }

    // a caller-supplied seed that missed the store names the new puzzle
    let seed = req.seed.clone().unwrap_or_else(|| result.seed.clone());

    let crossword_id = Uuid::new_v4();
    let grid_value = serde_json::to_value(&result.grid)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize grid: {e}")))?;
    let clues: HashMap<&str, &str> = result
        .words
        .iter()
        .map(|p| (p.word.text.as_str(), p.clue.as_str()))
        .collect();
    let clues_value = serde_json::to_value(&clues)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize clues: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO crosswords (id, seed, word_count, difficulty, grid, clues)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(crossword_id)
    .bind(&seed)
    .bind(result.words.len() as i32)
    .bind(req.difficulty.as_str())
    .bind(&grid_value)
    .bind(&clues_value)
    .execute(&state.db)
    .await?;

    for placed in &result.words {
        let position_value = serde_json::to_value(placed.position)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize position: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO crossword_words (id, crossword_id, word_id, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(crossword_id)
        .bind(placed.word.id)
        .bind(&position_value)
        .execute(&state.db)
        .await?;
    }

    info!(
        "generated crossword {crossword_id} ({} words, seed {seed})",
        result.words.len()
    );

    let words = result
        .words
        .into_iter()
        .filter_map(|p| {
            let word = by_id.get(&p.word.id)?.clone();
            Some(PlacedEntry {
                word,
                position: p.position,
                clue: p.clue,
            })
        })
        .collect();

    Ok(Json(GenerateResponse {
        id: crossword_id,
        seed,
        grid: result.grid,
        words,
    }))
}

/// Assembles the candidate pool and effective word count for a request.
async fn load_candidates(
    db: &PgPool,
    req: &GenerateRequest,
) -> Result<(Vec<WordRow>, usize), AppError> {
    if let Some(ids) = req.word_ids.as_ref().filter(|ids| !ids.is_empty()) {
        // study-set generation uses every supplied word
        let rows: Vec<WordRow> = sqlx::query_as("SELECT * FROM words WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(db)
            .await?;
        let count = rows.len();
        return Ok((rows, count));
    }

    if !ALLOWED_WORD_COUNTS.contains(&req.word_count) {
        return Err(AppError::Validation(
            "word_count must be 10, 15, or 20".to_string(),
        ));
    }

    let mut rows: Vec<WordRow> = sqlx::query_as("SELECT * FROM words WHERE difficulty = $1")
        .bind(req.difficulty.as_str())
        .fetch_all(db)
        .await?;

    if rows.len() < req.word_count {
        // top up from the rest of the vocabulary when the tier runs short
        let all: Vec<WordRow> = sqlx::query_as("SELECT * FROM words").fetch_all(db).await?;
        let seen: HashSet<Uuid> = rows.iter().map(|r| r.id).collect();
        rows.extend(all.into_iter().filter(|w| !seen.contains(&w.id)));
    }

    Ok((rows, req.word_count))
}

/// Looks up a previously generated puzzle by seed and rebuilds the response
/// from its stored grid, placements, and clues.
async fn load_by_seed(db: &PgPool, seed: &str) -> Result<Option<GenerateResponse>, AppError> {
    let crossword: Option<CrosswordRow> =
        sqlx::query_as("SELECT * FROM crosswords WHERE seed = $1")
            .bind(seed)
            .fetch_optional(db)
            .await?;
    let Some(crossword) = crossword else {
        return Ok(None);
    };

    let grid: Vec<Vec<Cell>> = serde_json::from_value(crossword.grid.clone())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored grid is malformed: {e}")))?;
    let clues: HashMap<String, String> = serde_json::from_value(crossword.clues.clone())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored clues are malformed: {e}")))?;

    let links: Vec<CrosswordWordRow> =
        sqlx::query_as("SELECT * FROM crossword_words WHERE crossword_id = $1")
            .bind(crossword.id)
            .fetch_all(db)
            .await?;
    let word_ids: Vec<Uuid> = links.iter().map(|l| l.word_id).collect();
    let rows: Vec<WordRow> = sqlx::query_as("SELECT * FROM words WHERE id = ANY($1)")
        .bind(&word_ids)
        .fetch_all(db)
        .await?;
    let by_id: HashMap<Uuid, WordRow> = rows.into_iter().map(|r| (r.id, r)).collect();

    let words = links
        .into_iter()
        .filter_map(|link| {
            let word = by_id.get(&link.word_id)?.clone();
            let position: Position = serde_json::from_value(link.position).ok()?;
            let clue = clues
                .get(&word.word)
                .cloned()
                .unwrap_or_else(|| word.definition.clone());
            Some(PlacedEntry {
                word,
                position,
                clue,
            })
        })
        .collect();

    Ok(Some(GenerateResponse {
        id: crossword.id,
        seed: crossword.seed,
        grid,
        words,
    }))
}
