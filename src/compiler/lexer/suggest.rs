//! "Did you mean" suggestions for misspelled keywords.

/// Candidates must score above this to be suggested.
const MIN_SIMILARITY: f64 = 0.5;
const MAX_SUGGESTIONS: usize = 4;

/// Dice coefficient over the character bigrams of the two words.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: Vec<(char, char)> = a.windows(2).map(|w| (w[0], w[1])).collect();
    let mut shared = 0;
    for w in b.windows(2) {
        if let Some(pos) = bigrams.iter().position(|bg| *bg == (w[0], w[1])) {
            bigrams.swap_remove(pos);
            shared += 1;
        }
    }

    (2.0 * shared as f64) / ((a.len() - 1) + (b.len() - 1)) as f64
}

/// Returns the candidates which are close to `word`, best match first.
pub fn suggest(word: &str, candidates: &[&str]) -> Vec<String> {
    let mut rated: Vec<(f64, &str)> = candidates
        .iter()
        .map(|c| (similarity(word, c), *c))
        .filter(|(rating, _)| *rating > MIN_SIMILARITY)
        .collect();
    rated.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    rated
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c.to_string())
        .collect()
}
