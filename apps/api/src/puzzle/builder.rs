//! Crossword grid builder: places a subset of candidate words on a fixed
//! grid so that placed words intersect on matching letters and never extend
//! another word in their own direction. The feasibility check is local:
//! letters written next to a perpendicular word at non-intersection cells
//! can still form unintended words, a known limitation.
//!
//! The builder is stateless and synchronous: all grid and word-set state is
//! local to a single `generate` call, so concurrent requests need no
//! coordination. Randomness comes from `thread_rng`; the seed string in the
//! result identifies the puzzle for re-fetch, it does not replay the RNG.

use std::collections::HashSet;
use std::fmt;

use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::puzzle::clues::clue_for;
use crate::puzzle::grid::{Cell, Direction, Grid};

pub const DEFAULT_GRID_SIZE: usize = 15;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Word difficulty tier. Filters the candidate pool and selects clue style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parses a stored tier tag. Unknown tags fall back to medium.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate vocabulary word. Immutable input to the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    pub text: String,
    pub definition: String,
    pub part_of_speech: Option<String>,
    pub difficulty: Difficulty,
}

/// Where a placed word sits on the grid.
///
/// Clue numbers are unique per puzzle and assigned in placement order, not
/// in the reading order a printed crossword would use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub number: u32,
}

/// A word bound to a grid position, with its generated clue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: Word,
    pub position: Position,
    pub clue: String,
}

/// Final output of one generation call. Immutable after return.
///
/// `success` is false only when zero words were placed across all attempts;
/// a partial puzzle that met the acceptance threshold reports true with a
/// shorter placement list.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleResult {
    pub success: bool,
    pub grid: Vec<Vec<Cell>>,
    pub words: Vec<PlacedWord>,
    pub seed: String,
}

/// A would-be start position for a candidate word, derived from a shared
/// letter with an already-placed word.
#[derive(Debug, Clone, Copy)]
struct Site {
    row: usize,
    col: usize,
    direction: Direction,
}

/// Stateless builder; per-call state lives in [`Attempt`].
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder {
    size: usize,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl GridBuilder {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Builds a puzzle from `words`, aiming for `word_count` placements.
    ///
    /// Candidates are filtered to the requested difficulty (falling back to
    /// the full pool when the filter empties it), sorted longest-first, then
    /// shuffled per attempt. An attempt is accepted once the placed count
    /// reaches `min(word_count, working set size)`; after `max_attempts`
    /// the last attempt is returned best-effort with `success` iff anything
    /// was placed.
    pub fn generate(
        &self,
        words: &[Word],
        word_count: usize,
        difficulty: Difficulty,
        max_attempts: u32,
    ) -> PuzzleResult {
        let mut pool: Vec<&Word> = words.iter().filter(|w| w.difficulty == difficulty).collect();
        if pool.is_empty() {
            // never fail solely because no word carries the requested tier
            pool = words.iter().collect();
        }

        // longer words first: they offer more intersection opportunities
        pool.sort_by(|a, b| b.text.len().cmp(&a.text.len()));

        let mut rng = rand::thread_rng();
        let mut last_attempt: Option<Attempt> = None;

        for attempt_index in 0..max_attempts {
            let mut shuffled = pool.clone();
            shuffled.shuffle(&mut rng);
            let working = &shuffled[..word_count.min(shuffled.len())];

            let mut attempt = Attempt::new(self.size);

            if let Some(&first) = working.first() {
                let letters = lowercase_letters(&first.text);
                if letters.len() <= self.size {
                    let row = self.size / 2;
                    let col = (self.size - letters.len()) / 2;
                    // infeasible center placement drops the word for this attempt
                    attempt.try_place(first, &letters, row, col, Direction::Across, difficulty);
                }
            }

            for &candidate in working.iter().skip(1) {
                if attempt.placed_ids.contains(&candidate.id) {
                    continue;
                }
                let letters = lowercase_letters(&candidate.text);
                let sites = intersection_sites(self.size, &letters, &attempt.placed);
                if !sites.is_empty() {
                    // uniform choice among intersections; a failed feasibility
                    // check skips the word rather than trying another site
                    if let Some(&site) = sites.choose(&mut rng) {
                        attempt.try_place(
                            candidate,
                            &letters,
                            site.row,
                            site.col,
                            site.direction,
                            difficulty,
                        );
                    }
                } else {
                    // adjacency fallback is first-match, not randomized
                    for site in adjacency_sites(&letters, &attempt.placed) {
                        if attempt.try_place(
                            candidate,
                            &letters,
                            site.row,
                            site.col,
                            site.direction,
                            difficulty,
                        ) {
                            break;
                        }
                    }
                }
            }

            attempt.grid.fill_black_squares();

            let threshold = word_count.min(working.len());
            if attempt.placed.len() >= threshold {
                debug!(
                    attempt = attempt_index + 1,
                    placed = attempt.placed.len(),
                    requested = word_count,
                    "crossword attempt accepted"
                );
                return attempt.into_result(true, word_count, difficulty);
            }

            debug!(
                attempt = attempt_index + 1,
                placed = attempt.placed.len(),
                threshold,
                "crossword attempt below threshold"
            );
            last_attempt = Some(attempt);
        }

        // best effort: last attempt's grid and placements
        let attempt = last_attempt.unwrap_or_else(|| Attempt::new(self.size));
        let success = !attempt.placed.is_empty();
        attempt.into_result(success, word_count, difficulty)
    }
}

/// Mutable state for a single generation attempt.
struct Attempt {
    grid: Grid,
    placed: Vec<PlacedWord>,
    placed_ids: HashSet<Uuid>,
    next_number: u32,
}

impl Attempt {
    fn new(size: usize) -> Self {
        Self {
            grid: Grid::new(size),
            placed: Vec::new(),
            placed_ids: HashSet::new(),
            next_number: 1,
        }
    }

    /// Places the word if feasible, recording its placement and clue.
    fn try_place(
        &mut self,
        word: &Word,
        letters: &[char],
        row: usize,
        col: usize,
        direction: Direction,
        difficulty: Difficulty,
    ) -> bool {
        if !self.grid.can_place(letters, row, col, direction) {
            return false;
        }
        let number = self.next_number;
        self.grid.place(letters, row, col, direction, number);
        self.placed.push(PlacedWord {
            word: word.clone(),
            position: Position {
                row,
                col,
                direction,
                number,
            },
            clue: clue_for(word, difficulty),
        });
        self.placed_ids.insert(word.id);
        self.next_number += 1;
        true
    }

    fn into_result(self, success: bool, word_count: usize, difficulty: Difficulty) -> PuzzleResult {
        PuzzleResult {
            success,
            grid: self.grid.into_rows(),
            words: self.placed,
            seed: make_seed(word_count, difficulty),
        }
    }
}

fn lowercase_letters(text: &str) -> Vec<char> {
    text.to_lowercase().chars().collect()
}

/// Seed identifying this generation call for idempotent re-fetch.
/// Format is stable: `"<unix-millis>-<wordCount>-<difficulty>"`.
fn make_seed(word_count: usize, difficulty: Difficulty) -> String {
    format!("{}-{}-{}", Utc::now().timestamp_millis(), word_count, difficulty)
}

/// All candidate start positions sharing a letter with a placed word, in the
/// opposite direction, with the shared-letter offset applied along the
/// placed word's axis. Positions running off the grid's leading edge or past
/// its trailing edge on that axis are discarded; the full feasibility check
/// happens at placement time.
fn intersection_sites(size: usize, letters: &[char], placed: &[PlacedWord]) -> Vec<Site> {
    let mut sites = Vec::new();
    for existing in placed {
        let existing_letters = lowercase_letters(&existing.word.text);
        let pos = existing.position;
        for (i, &a) in letters.iter().enumerate() {
            for (j, &b) in existing_letters.iter().enumerate() {
                if a != b {
                    continue;
                }
                let offset = j as isize - i as isize;
                match pos.direction {
                    Direction::Across => {
                        let col = pos.col as isize + offset;
                        if col >= 0 && col as usize + letters.len() <= size {
                            sites.push(Site {
                                row: pos.row,
                                col: col as usize,
                                direction: pos.direction.opposite(),
                            });
                        }
                    }
                    Direction::Down => {
                        let row = pos.row as isize + offset;
                        if row >= 0 && row as usize + letters.len() <= size {
                            sites.push(Site {
                                row: row as usize,
                                col: pos.col,
                                direction: pos.direction.opposite(),
                            });
                        }
                    }
                }
            }
        }
    }
    sites
}

/// Same shared-letter positions as `intersection_sites`, but only screened
/// for non-negative coordinates; scanned in order, first feasible wins.
fn adjacency_sites(letters: &[char], placed: &[PlacedWord]) -> Vec<Site> {
    let mut sites = Vec::new();
    for existing in placed {
        let existing_letters = lowercase_letters(&existing.word.text);
        let pos = existing.position;
        for (i, &a) in letters.iter().enumerate() {
            for (j, &b) in existing_letters.iter().enumerate() {
                if a != b {
                    continue;
                }
                let offset = j as isize - i as isize;
                let (row, col) = match pos.direction {
                    Direction::Across => (pos.row as isize, pos.col as isize + offset),
                    Direction::Down => (pos.row as isize + offset, pos.col as isize),
                };
                if row >= 0 && col >= 0 {
                    sites.push(Site {
                        row: row as usize,
                        col: col as usize,
                        direction: pos.direction.opposite(),
                    });
                }
            }
        }
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, difficulty: Difficulty) -> Word {
        Word {
            id: Uuid::new_v4(),
            text: text.to_string(),
            definition: format!("definition of {text}."),
            part_of_speech: Some("noun".to_string()),
            difficulty,
        }
    }

    fn shared_letter_pool() -> Vec<Word> {
        // all share 'a', 'n', 't', so intersections are plentiful
        ["lantern", "planet", "animal", "nectar", "antler"]
            .iter()
            .map(|t| word(t, Difficulty::Medium))
            .collect()
    }

    #[test]
    fn test_first_word_placed_across_at_center_row() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        assert!(result.success);
        assert!(!result.words.is_empty() && result.words.len() <= 5);

        let first = &result.words[0];
        assert_eq!(first.position.number, 1);
        assert_eq!(first.position.direction, Direction::Across);
        assert_eq!(first.position.row, DEFAULT_GRID_SIZE / 2);
        let expected_col = (DEFAULT_GRID_SIZE - first.word.text.len()) / 2;
        assert_eq!(first.position.col, expected_col);
    }

    #[test]
    fn test_placements_read_back_from_grid() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        for placed in &result.words {
            let text = placed.word.text.to_lowercase();
            for (i, ch) in text.chars().enumerate() {
                let (row, col) = match placed.position.direction {
                    Direction::Across => (placed.position.row, placed.position.col + i),
                    Direction::Down => (placed.position.row + i, placed.position.col),
                };
                assert_eq!(
                    result.grid[row][col].letter,
                    Some(ch),
                    "letter mismatch in '{}' at offset {}",
                    text,
                    i
                );
            }
        }
    }

    #[test]
    fn test_no_black_cell_holds_a_letter() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        for row in &result.grid {
            for cell in row {
                assert!(!(cell.is_black && cell.letter.is_some()));
            }
        }
    }

    #[test]
    fn test_intersections_carry_identical_letters() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        // every cell claimed by both an across and a down word holds one
        // letter, which both words agree on (checked via read-back above);
        // here we assert the structural half: letter present, not black
        for row in &result.grid {
            for cell in row {
                if cell.across.is_some() && cell.down.is_some() {
                    assert!(cell.letter.is_some());
                    assert!(!cell.is_black);
                }
            }
        }
    }

    #[test]
    fn test_clue_numbers_are_unique_and_sequential() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        for (index, placed) in result.words.iter().enumerate() {
            assert_eq!(placed.position.number, index as u32 + 1);
        }
    }

    #[test]
    fn test_disjoint_words_place_only_the_first() {
        // no pair of these shares a letter: no intersections, no adjacency
        let pool: Vec<Word> = ["jury", "stomp", "cliff"]
            .iter()
            .map(|t| word(t, Difficulty::Medium))
            .collect();
        let result = GridBuilder::default().generate(&pool, 3, Difficulty::Medium, 10);

        assert_eq!(result.words.len(), 1);
        // best-effort rule: anything placed still counts as success
        assert!(result.success);
    }

    #[test]
    fn test_difficulty_filter_falls_back_to_full_pool() {
        let pool: Vec<Word> = ["lantern", "planet", "animal"]
            .iter()
            .map(|t| word(t, Difficulty::Easy))
            .collect();
        let result = GridBuilder::default().generate(&pool, 3, Difficulty::Hard, 10);

        assert!(result.success);
        assert!(!result.words.is_empty(), "fallback pool must still be used");
    }

    #[test]
    fn test_word_count_above_pool_size_lowers_threshold() {
        let pool = vec![word("lantern", Difficulty::Medium)];
        let result = GridBuilder::default().generate(&pool, 20, Difficulty::Medium, 10);

        // threshold collapses to the pool size, so one placement is enough
        assert!(result.success);
        assert_eq!(result.words.len(), 1);
    }

    #[test]
    fn test_unplaceable_word_yields_failure() {
        // longer than the grid: the center placement is infeasible
        let pool = vec![word("incomprehensibilities", Difficulty::Medium)];
        let result = GridBuilder::default().generate(&pool, 1, Difficulty::Medium, 3);

        assert!(!result.success);
        assert!(result.words.is_empty());
    }

    #[test]
    fn test_seed_format_is_stable() {
        let pool = shared_letter_pool();
        let result = GridBuilder::default().generate(&pool, 5, Difficulty::Medium, 10);

        let parts: Vec<&str> = result.seed.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<i64>().is_ok(), "timestamp component");
        assert_eq!(parts[1], "5");
        assert_eq!(parts[2], "medium");
    }

    #[test]
    fn test_intersection_sites_respect_grid_bounds() {
        let placed = vec![PlacedWord {
            word: word("planet", Difficulty::Medium),
            position: Position {
                row: 7,
                col: 4,
                direction: Direction::Across,
                number: 1,
            },
            clue: String::new(),
        }];
        let letters: Vec<char> = "lantern".chars().collect();
        for site in intersection_sites(15, &letters, &placed) {
            assert_eq!(site.direction, Direction::Down);
            assert!(site.col + letters.len() <= 15);
        }
    }

    #[test]
    fn test_difficulty_tags_round_trip() {
        for tier in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_tag(tier.as_str()), tier);
        }
        assert_eq!(Difficulty::from_tag("expert"), Difficulty::Medium);
    }
}
