pub mod crossword;
pub mod progress;
pub mod word;
