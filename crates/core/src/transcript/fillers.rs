//! Filler-word detection over final transcript chunks.

/// Single-token fillers, matched case-insensitively after trimming
/// punctuation.
const SINGLE_FILLERS: &[&str] = &["um", "uh", "er", "ah", "like", "actually", "basically"];

/// Two-token fillers. A match consumes both tokens.
const PAIR_FILLERS: &[(&str, &str)] = &[("you", "know"), ("sort", "of"), ("kind", "of")];

/// Counts filler occurrences in one chunk of final transcript text.
pub fn count_fillers(text: &str) -> u64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect();

    let mut count = 0;
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len()
            && PAIR_FILLERS
                .iter()
                .any(|(a, b)| tokens[i] == *a && tokens[i + 1] == *b)
        {
            count += 1;
            i += 2;
            continue;
        }
        if SINGLE_FILLERS.contains(&tokens[i].as_str()) {
            count += 1;
        }
        i += 1;
    }
    count
}

fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_single_fillers_case_insensitively() {
        assert_eq!(count_fillers("Um, so I was, uh, thinking"), 2);
        assert_eq!(count_fillers("UM UH ER"), 3);
    }

    #[test]
    fn counts_pair_fillers_once_per_pair() {
        assert_eq!(count_fillers("you know what I mean"), 1);
        assert_eq!(count_fillers("it was sort of kind of fine"), 2);
    }

    #[test]
    fn pair_match_consumes_both_tokens() {
        // "kind of" must not also count "of" against anything else.
        assert_eq!(count_fillers("kind of like that"), 2);
    }

    #[test]
    fn clean_text_has_no_fillers() {
        assert_eq!(count_fillers("the quarterly numbers were strong"), 0);
        assert_eq!(count_fillers(""), 0);
    }

    #[test]
    fn punctuation_does_not_hide_a_filler() {
        assert_eq!(count_fillers("well... um. right"), 1);
    }
}
