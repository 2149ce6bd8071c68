pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::progress::handlers as progress;
use crate::puzzle::handlers as puzzle;
use crate::state::AppState;
use crate::words::handlers as words;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Vocabulary
        .route("/api/v1/words", get(words::handle_list_words))
        .route("/api/v1/vocab/check", get(words::handle_vocab_check))
        .route("/api/v1/admin/import", post(words::handle_import))
        // Crosswords
        .route(
            "/api/v1/crosswords/generate",
            post(puzzle::handle_generate),
        )
        .route(
            "/api/v1/crosswords/progress",
            get(progress::handle_list_crossword_progress)
                .post(progress::handle_record_crossword_progress),
        )
        // Flashcards
        .route(
            "/api/v1/flashcards/progress",
            get(progress::handle_list_flashcard_progress)
                .post(progress::handle_record_flashcard_progress),
        )
        .with_state(state)
}
