// Study progress bookkeeping for flashcards and crossword solves.

pub mod handlers;
pub mod tracking;
