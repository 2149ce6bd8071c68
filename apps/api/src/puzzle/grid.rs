//! Grid state for crossword construction: cells, placement feasibility,
//! placement application, and black-square fill.

use serde::{Deserialize, Serialize};

/// Orientation of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }
}

/// One square of the puzzle grid.
///
/// A cell is either black or carries at most one letter. A letter cell may
/// belong to zero, one, or two words; `across`/`down` hold the clue numbers
/// of the words passing through it. `number` is the printed label; the
/// first word to touch a cell claims it, so intersecting words share one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    pub letter: Option<char>,
    pub is_black: bool,
    pub number: Option<u32>,
    pub across: Option<u32>,
    pub down: Option<u32>,
}

/// A fixed square grid of cells, local to one generation attempt.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::default(); size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    /// Consumes the grid into its rectangular cell array for the response.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.cells
    }

    /// Checks whether `letters` can be written starting at (`row`, `col`)
    /// in `direction`:
    /// - every target cell is in bounds and not black,
    /// - occupied target cells already hold the matching letter,
    /// - the cell before the start and after the end (when in bounds) hold
    ///   no letter, so the word cannot silently extend a neighbor.
    ///
    /// The check is purely local: it does not detect accidental words
    /// formed in the perpendicular direction at non-intersection cells.
    pub fn can_place(&self, letters: &[char], row: usize, col: usize, direction: Direction) -> bool {
        match direction {
            Direction::Across => {
                if row >= self.size || col + letters.len() > self.size {
                    return false;
                }
                for (i, &ch) in letters.iter().enumerate() {
                    let cell = &self.cells[row][col + i];
                    if cell.is_black {
                        return false;
                    }
                    if cell.letter.map_or(false, |existing| existing != ch) {
                        return false;
                    }
                }
                if col > 0 && self.cells[row][col - 1].letter.is_some() {
                    return false;
                }
                if col + letters.len() < self.size
                    && self.cells[row][col + letters.len()].letter.is_some()
                {
                    return false;
                }
                true
            }
            Direction::Down => {
                if col >= self.size || row + letters.len() > self.size {
                    return false;
                }
                for (i, &ch) in letters.iter().enumerate() {
                    let cell = &self.cells[row + i][col];
                    if cell.is_black {
                        return false;
                    }
                    if cell.letter.map_or(false, |existing| existing != ch) {
                        return false;
                    }
                }
                if row > 0 && self.cells[row - 1][col].letter.is_some() {
                    return false;
                }
                if row + letters.len() < self.size
                    && self.cells[row + letters.len()][col].letter.is_some()
                {
                    return false;
                }
                true
            }
        }
    }

    /// Writes a word into the grid. Callers must have verified `can_place`.
    ///
    /// Sets the across or down word reference on every target cell, and the
    /// printed number only on cells that do not already carry one.
    pub fn place(&mut self, letters: &[char], row: usize, col: usize, direction: Direction, number: u32) {
        for (i, &ch) in letters.iter().enumerate() {
            let (r, c) = match direction {
                Direction::Across => (row, col + i),
                Direction::Down => (row + i, col),
            };
            let cell = &mut self.cells[r][c];
            cell.letter = Some(ch);
            match direction {
                Direction::Across => cell.across = Some(number),
                Direction::Down => cell.down = Some(number),
            }
            if cell.number.is_none() {
                cell.number = Some(number);
            }
        }
    }

    /// Marks every empty, non-black cell with no four-connected letter
    /// neighbor as black, so the rendered grid has no stray open cells.
    pub fn fill_black_squares(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[row][col].letter.is_some() || self.cells[row][col].is_black {
                    continue;
                }
                let has_letter_neighbor = (row > 0 && self.cells[row - 1][col].letter.is_some())
                    || (row + 1 < self.size && self.cells[row + 1][col].letter.is_some())
                    || (col > 0 && self.cells[row][col - 1].letter.is_some())
                    || (col + 1 < self.size && self.cells[row][col + 1].letter.is_some());
                if !has_letter_neighbor {
                    self.cells[row][col].is_black = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_can_place_rejects_out_of_bounds() {
        let grid = Grid::new(5);
        assert!(grid.can_place(&letters("hello"), 2, 0, Direction::Across));
        assert!(!grid.can_place(&letters("hello"), 2, 1, Direction::Across));
        assert!(!grid.can_place(&letters("hello"), 1, 2, Direction::Down));
        assert!(!grid.can_place(&letters("toolong"), 0, 0, Direction::Across));
    }

    #[test]
    fn test_can_place_accepts_matching_intersection() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        // "cab" shares 'c' at its first letter with the existing word
        assert!(grid.can_place(&letters("cab"), 2, 1, Direction::Down));
    }

    #[test]
    fn test_can_place_rejects_conflicting_letter() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        // "dog" down through (2,1) would need 'd' where 'c' sits
        assert!(!grid.can_place(&letters("dog"), 2, 1, Direction::Down));
    }

    #[test]
    fn test_can_place_rejects_black_cell() {
        let mut grid = Grid::new(5);
        grid.fill_black_squares(); // empty grid: everything goes black
        assert!(!grid.can_place(&letters("cat"), 2, 1, Direction::Across));
    }

    #[test]
    fn test_can_place_rejects_letter_before_start() {
        let mut grid = Grid::new(10);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        // starting right after "cat" on the same row would extend it
        assert!(!grid.can_place(&letters("top"), 2, 4, Direction::Across));
    }

    #[test]
    fn test_can_place_rejects_letter_after_end() {
        let mut grid = Grid::new(10);
        grid.place(&letters("cat"), 2, 5, Direction::Across, 1);
        // ending right before "cat" on the same row would merge into it
        assert!(!grid.can_place(&letters("tip"), 2, 2, Direction::Across));
    }

    #[test]
    fn test_place_sets_letters_and_word_refs() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        assert_eq!(grid.cell(2, 1).letter, Some('c'));
        assert_eq!(grid.cell(2, 2).letter, Some('a'));
        assert_eq!(grid.cell(2, 3).letter, Some('t'));
        assert_eq!(grid.cell(2, 2).across, Some(1));
        assert_eq!(grid.cell(2, 2).down, None);
    }

    #[test]
    fn test_intersecting_word_shares_display_number() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        grid.place(&letters("cab"), 2, 1, Direction::Down, 2);
        let shared = grid.cell(2, 1);
        assert_eq!(shared.number, Some(1), "first word keeps the printed number");
        assert_eq!(shared.across, Some(1));
        assert_eq!(shared.down, Some(2));
        // cells the second word reached first carry its number
        assert_eq!(grid.cell(3, 1).number, Some(2));
    }

    #[test]
    fn test_fill_black_squares_isolates_unreachable_cells() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        grid.fill_black_squares();
        assert!(grid.cell(0, 4).is_black, "far corner has no letter neighbor");
        assert!(!grid.cell(1, 1).is_black, "cell above 'c' borders a letter");
        assert!(!grid.cell(2, 0).is_black, "cell left of 'c' borders a letter");
        assert!(!grid.cell(2, 2).is_black, "letter cells are never blacked");
    }

    #[test]
    fn test_no_cell_is_both_black_and_lettered() {
        let mut grid = Grid::new(5);
        grid.place(&letters("cat"), 2, 1, Direction::Across, 1);
        grid.fill_black_squares();
        for row in grid.into_rows() {
            for cell in row {
                assert!(!(cell.is_black && cell.letter.is_some()));
            }
        }
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Across.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Across);
    }
}
