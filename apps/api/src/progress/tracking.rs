//! Progress math shared by the flashcard and crossword progress handlers.

/// Rolling accuracy over `review_count` reviews, where `review_count`
/// already includes the review being recorded.
pub fn rolling_accuracy(previous: f64, review_count: i32, correct: bool) -> f64 {
    let n = review_count as f64;
    let hit = if correct { 1.0 } else { 0.0 };
    (previous * (n - 1.0) + hit) / n
}

/// Mastery tier derived from accuracy, capped at 5.
pub fn mastery_level(accuracy: f64) -> i32 {
    ((accuracy * 5.0).floor() as i32).min(5)
}

/// Fastest solve so far, in seconds.
pub fn best_time(existing: Option<i32>, elapsed: i32) -> i32 {
    existing.map_or(elapsed, |best| best.min(elapsed))
}
