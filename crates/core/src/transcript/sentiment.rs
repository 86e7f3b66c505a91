//! Lexical sentiment scoring for final transcript chunks.
//!
//! Each final chunk contributes exactly one sample to the rolling sentiment
//! window: the signed keyword tally, normalized by dividing by 3 and clamped
//! to [-1, 1].

const POSITIVE: &[&str] = &[
    "good",
    "great",
    "love",
    "happy",
    "excited",
    "amazing",
    "wonderful",
    "excellent",
    "fantastic",
    "confident",
    "glad",
    "thanks",
    "best",
    "clear",
    "strong",
    "win",
];

const NEGATIVE: &[&str] = &[
    "bad",
    "hate",
    "sad",
    "terrible",
    "awful",
    "angry",
    "worried",
    "problem",
    "wrong",
    "fail",
    "worst",
    "unclear",
    "weak",
    "boring",
    "nervous",
    "lose",
];

/// Scores one chunk: +1 per positive keyword, -1 per negative keyword, then
/// `clamp(raw / 3, -1, 1)`.
pub fn score_chunk(text: &str) -> f64 {
    let mut raw = 0i64;
    for token in text.split_whitespace() {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if POSITIVE.contains(&word.as_str()) {
            raw += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            raw -= 1;
        }
    }
    (raw as f64 / 3.0).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero() {
        assert_eq!(score_chunk("the meeting starts at noon"), 0.0);
    }

    #[test]
    fn positive_and_negative_words_cancel() {
        assert_eq!(score_chunk("good results but a bad quarter"), 0.0);
    }

    #[test]
    fn score_is_normalized_by_three() {
        assert!((score_chunk("good") - 1.0 / 3.0).abs() < 1e-12);
        assert!((score_chunk("bad problem") + 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn score_clamps_at_plus_minus_one() {
        assert_eq!(score_chunk("great great great great great"), 1.0);
        assert_eq!(score_chunk("awful awful awful awful"), -1.0);
    }

    #[test]
    fn matching_ignores_case_and_punctuation() {
        assert!(score_chunk("Great! Really GOOD.") > 0.0);
    }
}
