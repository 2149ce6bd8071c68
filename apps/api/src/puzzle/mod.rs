// Crossword generation core.
// The builder is pure and synchronous; only handlers touch the database.

pub mod builder;
pub mod clues;
pub mod grid;
pub mod handlers;
