//! Classifying guesses against the target word.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The classification of one guess against the target word.
///
/// Produced by [`classify()`]. Each letter of the guess lands in exactly one
/// of the three buckets, so the bucket lengths always sum to the guess
/// length. Letters appear in the order they were consumed: positional
/// matches first (left to right), then the remaining letters left to right.
///
/// In the case that the guess or the target contains two or more of the same
/// letter, each target letter is consumed at most once across both passes.
/// For instance, against the target `BOOK`, the guess `OBOE` yields one
/// positional `O` (index 2), after which only one `O` remains in the target
/// for the out-of-position pass.
///
/// # Examples
///
/// ```rust
/// use wordmind::feedback::classify;
///
/// let feedback = classify("OBOE", "BOOK");
/// assert_eq!(feedback.correct_positions, vec!['O']);
/// assert_eq!(feedback.wrong_positions, vec!['O', 'B']);
/// assert_eq!(feedback.absent_letters, vec!['E']);
/// assert!(feedback.exact_length());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Feedback {
    /// Letters matched at the same index in guess and target.
    pub correct_positions: Vec<char>,

    /// Letters present in the target but at a different index, after the
    /// positional pass has consumed its matches on both sides.
    pub wrong_positions: Vec<char>,

    /// Letters with no remaining match in the target.
    pub absent_letters: Vec<char>,

    /// Absolute difference between guess length and target length.
    pub length_delta: usize,
}

impl Feedback {
    /// Returns true if the guess and target had the same length.
    pub fn exact_length(&self) -> bool {
        self.length_delta == 0
    }
}

/// Classifies `guess` against `target`, letter by letter.
///
/// The classification runs in two passes. The first pass walks indices
/// `0..min(len)` and consumes every exact positional match from both words.
/// The second pass takes each remaining guess letter left to right and
/// greedily consumes the first remaining occurrence of it in the target;
/// letters with no occurrence left are absent.
///
/// This function is pure: it depends only on its two inputs and returns a
/// fresh [`Feedback`] each call. Empty strings are valid and produce empty
/// buckets. Letters are compared exactly, so case matters, and non-letter
/// characters are treated as opaque symbols.
pub fn classify(guess: &str, target: &str) -> Feedback {
    let mut guess_letters: Vec<Option<char>> = guess.chars().map(Some).collect();
    let mut target_letters: Vec<Option<char>> = target.chars().map(Some).collect();

    let mut feedback = Feedback {
        length_delta: guess_letters.len().abs_diff(target_letters.len()),
        ..Feedback::default()
    };

    // Positional pass: exact matches get priority and consume both sides.
    for i in 0..guess_letters.len().min(target_letters.len()) {
        if guess_letters[i] == target_letters[i] {
            if let Some(c) = guess_letters[i].take() {
                feedback.correct_positions.push(c);
            }
            target_letters[i] = None;
        }
    }

    // Out-of-position pass: greedy, left to right, each target letter
    // consumed at most once.
    for letter in guess_letters.into_iter().flatten() {
        match target_letters.iter().position(|&t| t == Some(letter)) {
            Some(index) => {
                feedback.wrong_positions.push(letter);
                target_letters[index] = None;
            }
            None => feedback.absent_letters.push(letter),
        }
    }

    feedback
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn identity_guess_is_all_correct() {
        for target in ["Ball", "a", "Mississippi", "BOOK"] {
            let feedback = classify(target, target);
            assert_eq!(
                feedback.correct_positions,
                target.chars().collect::<Vec<_>>()
            );
            assert!(feedback.wrong_positions.is_empty());
            assert!(feedback.absent_letters.is_empty());
            assert_eq!(feedback.length_delta, 0);
            assert!(feedback.exact_length());
        }
    }

    #[test]
    fn duplicate_letters_consume_target_once() {
        let feedback = classify("OBOE", "BOOK");
        assert_eq!(feedback.correct_positions, vec!['O']);
        assert_eq!(feedback.wrong_positions, vec!['O', 'B']);
        assert_eq!(feedback.absent_letters, vec!['E']);
    }

    #[test]
    fn extra_duplicates_fall_through_to_absent() {
        // Both target Os sit at guess indices 1 and 2, so the positional
        // pass consumes them; the leftover index-0 O has no match left.
        let feedback = classify("OOO", "BOOK");
        assert_eq!(feedback.correct_positions, vec!['O', 'O']);
        assert!(feedback.wrong_positions.is_empty());
        assert_eq!(feedback.absent_letters, vec!['O']);
    }

    #[test]
    fn length_delta_is_symmetric() {
        assert_eq!(classify("cat", "cats").length_delta, 1);
        assert_eq!(classify("cats", "cat").length_delta, 1);
        assert!(!classify("cat", "cats").exact_length());
    }

    #[test]
    fn empty_inputs_produce_empty_buckets() {
        let feedback = classify("", "");
        assert!(feedback.correct_positions.is_empty());
        assert!(feedback.wrong_positions.is_empty());
        assert!(feedback.absent_letters.is_empty());
        assert_eq!(feedback.length_delta, 0);

        assert_eq!(classify("", "word").length_delta, 4);
        assert_eq!(classify("word", "").absent_letters.len(), 4);
    }

    fn count(letters: &[char], c: char) -> usize {
        letters.iter().filter(|&&l| l == c).count()
    }

    proptest! {
        #[test]
        fn buckets_partition_the_guess(
            guess in "[a-e]{0,10}",
            target in "[a-e]{0,10}",
        ) {
            let feedback = classify(&guess, &target);
            let total = feedback.correct_positions.len()
                + feedback.wrong_positions.len()
                + feedback.absent_letters.len();
            prop_assert_eq!(total, guess.chars().count());
        }

        #[test]
        fn matches_never_exceed_target_occurrences(
            guess in "[a-e]{0,10}",
            target in "[a-e]{0,10}",
        ) {
            let feedback = classify(&guess, &target);
            for c in 'a'..='e' {
                let matched = count(&feedback.correct_positions, c)
                    + count(&feedback.wrong_positions, c);
                prop_assert!(matched <= target.chars().filter(|&t| t == c).count());
            }
        }
    }
}
