use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The crossword builder itself is stateless, so nothing generation-related
/// lives here; each request constructs its own grid.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}
