//! Clue text generation. Difficulty controls how much the clue gives away:
//! easy clues hand over the full definition, hard clues truncate it to the
//! first sentence behind the part of speech.

use crate::puzzle::builder::{Difficulty, Word};

/// Builds the clue for a word at the requested difficulty.
///
/// Words without a known part of speech always fall back to the raw
/// definition, whatever the tier.
pub fn clue_for(word: &Word, difficulty: Difficulty) -> String {
    match difficulty {
        Difficulty::Easy => word.definition.clone(),
        Difficulty::Medium => match &word.part_of_speech {
            Some(pos) => format!("{pos}: {}", word.definition),
            None => word.definition.clone(),
        },
        Difficulty::Hard => match &word.part_of_speech {
            Some(pos) => {
                let fragment = word.definition.split('.').next().unwrap_or("");
                format!("{pos}: {fragment}")
            }
            None => word.definition.clone(),
        },
    }
}
