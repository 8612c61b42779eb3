//! Per-letter guess feedback with Wordle-family duplicate handling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Verdict for a single letter of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterMark {
    /// Right letter in the right position.
    Exact,
    /// Letter occurs elsewhere in the secret word.
    Present,
    /// Letter does not occur (or all its occurrences are claimed).
    Absent,
}

impl LetterMark {
    /// Display glyph for chat and terminal front ends.
    pub fn symbol(self) -> char {
        match self {
            LetterMark::Exact => '🟩',
            LetterMark::Present => '🟨',
            LetterMark::Absent => '⬜',
        }
    }
}

/// Evaluates a guess against the secret word, one mark per guess letter.
///
/// Comparison is case-insensitive. Duplicate letters never earn more marks
/// than the secret contains: exact matches claim their letter first, then
/// remaining occurrences are handed out as [`LetterMark::Present`] left to
/// right, and any surplus is [`LetterMark::Absent`].
#[instrument(skip(secret))]
pub fn evaluate(secret: &str, guess: &str) -> Vec<LetterMark> {
    let secret: Vec<char> = secret.to_ascii_uppercase().chars().collect();
    let guess: Vec<char> = guess.to_ascii_uppercase().chars().collect();

    // Occurrences of each secret letter not yet claimed by a mark.
    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &letter in &secret {
        *remaining.entry(letter).or_insert(0) += 1;
    }

    let mut marks = vec![LetterMark::Absent; guess.len()];

    // First pass: positional matches claim their letter before anything else.
    for (i, &letter) in guess.iter().enumerate() {
        if secret.get(i) == Some(&letter) {
            marks[i] = LetterMark::Exact;
            if let Some(count) = remaining.get_mut(&letter) {
                *count -= 1;
            }
        }
    }

    // Second pass: leftover occurrences become Present, left to right.
    for (i, &letter) in guess.iter().enumerate() {
        if marks[i] == LetterMark::Exact {
            continue;
        }
        if let Some(count) = remaining.get_mut(&letter) {
            if *count > 0 {
                marks[i] = LetterMark::Present;
                *count -= 1;
            }
        }
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    use LetterMark::{Absent, Exact, Present};

    #[test]
    fn test_all_exact_when_guess_matches() {
        assert_eq!(evaluate("CRANE", "CRANE"), vec![Exact; 5]);
    }

    #[test]
    fn test_all_absent_when_no_letters_shared() {
        assert_eq!(evaluate("CRANE", "SPILT"), vec![Absent; 5]);
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        assert_eq!(evaluate("crane", "CRANE"), vec![Exact; 5]);
        assert_eq!(evaluate("CRANE", "crane"), vec![Exact; 5]);
    }

    #[test]
    fn test_mixed_marks() {
        assert_eq!(
            evaluate("CRANE", "TRACE"),
            vec![Absent, Exact, Exact, Present, Exact]
        );
    }

    #[test]
    fn test_duplicate_guess_letters_capped_by_secret_count() {
        // SPEED has two Es; ERASE asks for three.
        assert_eq!(
            evaluate("SPEED", "ERASE"),
            vec![Present, Absent, Absent, Present, Present]
        );
    }

    #[test]
    fn test_exact_match_claims_letter_before_present() {
        // ALLOY has two Ls; the exact L in position 2 claims one first, so
        // only one of the remaining Ls in LLAMA can be Present.
        assert_eq!(
            evaluate("ALLOY", "LLAMA"),
            vec![Present, Exact, Present, Absent, Absent]
        );
    }

    #[test]
    fn test_exhausted_duplicates_go_absent() {
        // ABBEY has two Bs; both exact matches claim them, leaving none.
        assert_eq!(
            evaluate("ABBEY", "BBBBB"),
            vec![Absent, Exact, Exact, Absent, Absent]
        );
    }

    #[test]
    fn test_feedback_length_matches_guess() {
        for guess in ["CRANE", "AB", "ABCDEFG", ""] {
            assert_eq!(evaluate("CRANE", guess).len(), guess.chars().count());
        }
    }

    #[test]
    fn test_marks_never_exceed_secret_occurrences() {
        let marks = evaluate("SPEED", "EEEEE");
        let earned = marks.iter().filter(|m| **m != Absent).count();
        assert_eq!(earned, 2);
    }
}
