// Vocabulary management: listing, file checks, and admin import.

pub mod handlers;
pub mod import;
pub mod vocab_file;
