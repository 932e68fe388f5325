//! Generating the next guess from accumulated knowledge.

use itertools::Itertools;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::knowledge::{letter_bit, KnowledgeStore, REWARD_SIGNAL_THRESHOLD};

/// Reward for a letter placed at its correct position.
pub const CORRECT_REWARD: i64 = 500;

/// Reward for a letter present in the target but placed elsewhere.
pub const PRESENT_REWARD: i64 = 10;

/// Penalty for a letter absent from the target.
pub const ABSENT_PENALTY: i64 = -10;

/// Bonus added when the finalized word equals the target verbatim.
pub const EXACT_WORD_BONUS: i64 = 100;

/// Boost applied to the recorded history reward when the chosen length
/// equals the true target length.
pub const LENGTH_MATCH_BONUS: i64 = 50;

/// Incorrect candidates tolerated at one position before falling back to the
/// lowest-average letter.
const MAX_POSITION_MISSES: u32 = 5;

/// Shortest word the generator will ever produce.
const MIN_LENGTH: usize = 3;

/// One finished guess and the reward it earned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct GeneratedGuess {
    /// The word, first letter uppercased and the rest lowercased.
    pub word: String,

    /// Total reward accumulated by the letters actually placed, plus the
    /// exact-match bonus when the word equals the target.
    pub reward: i64,

    /// The length chosen before letter selection began.
    pub length: usize,
}

/// The guess generator.
///
/// The generator is stateless apart from its configuration; all learning
/// state lives in the [`KnowledgeStore`] passed to
/// [`next_guess()`](Generator::next_guess()). Configuration methods consume
/// the existing generator and return a new one.
///
/// # Examples
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use wordmind::{Generator, KnowledgeStore};
///
/// let generator = Generator::new().allow_length_peek(false);
/// let mut knowledge = KnowledgeStore::new();
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let guess = generator.next_guess(&mut knowledge, "Crate", &mut rng);
/// assert!(guess.word.len() >= 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generator {
    allow_length_peek: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            allow_length_peek: true,
        }
    }
}

impl Generator {
    /// Creates a generator with default configuration.
    ///
    /// Defaults:
    /// 1. length peeking allowed
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the generator may return the true target length once the
    /// average historical reward is strong.
    ///
    /// The peek eases the length search considerably and is on by default,
    /// matching the behavior this heuristic has always had. Turn it off to
    /// make the generator learn the length from history alone.
    pub fn allow_length_peek(self, allow: bool) -> Self {
        Generator {
            allow_length_peek: allow,
        }
    }

    /// Produces the next guess, folding reward observations into `knowledge`.
    ///
    /// `target` must be the round's normalized target word; letter
    /// comparisons happen on its lowercased form. The word is built by
    /// choosing a length, filling each position left to right (locked
    /// positions emit their proven letter), applying the stagnation escape,
    /// and finalizing the casing. A single call terminates after at most a
    /// bounded number of candidate scans per position.
    pub fn next_guess<R: Rng + ?Sized>(
        &self,
        knowledge: &mut KnowledgeStore,
        target: &str,
        rng: &mut R,
    ) -> GeneratedGuess {
        let target_letters: Vec<char> = target.chars().map(|c| c.to_ascii_lowercase()).collect();
        let length = self.choose_length(knowledge, target_letters.len(), rng);

        let mut word: Vec<char> = Vec::with_capacity(length);
        let mut used: u32 = 0;
        let mut reward = 0;

        for position in 0..length {
            if let Some(letter) = knowledge.locked_letter(position) {
                // Locked positions are re-credited every visit and stay out
                // of the duplicate-avoidance set.
                knowledge.rewards_mut().record(letter, CORRECT_REWARD);
                reward += CORRECT_REWARD;
                word.push(letter);
                continue;
            }

            let letter =
                self.fill_position(knowledge, &target_letters, position, used, &mut reward);
            used |= letter_bit(letter);
            word.push(letter);
        }

        if knowledge.stagnation_mut().observe(reward) {
            self.escape_stagnation(knowledge, &mut word);
        }

        let guessed = finalize(&word);
        if guessed == target {
            reward += EXACT_WORD_BONUS;
        }

        let recorded = if length == target_letters.len() {
            reward + LENGTH_MATCH_BONUS
        } else {
            reward
        };
        knowledge.lengths_mut().record(length, recorded);

        GeneratedGuess {
            word: guessed,
            reward,
            length,
        }
    }

    /// Picks the length of the next guess.
    fn choose_length<R: Rng + ?Sized>(
        &self,
        knowledge: &KnowledgeStore,
        target_length: usize,
        rng: &mut R,
    ) -> usize {
        if knowledge.lengths().is_empty() {
            return MIN_LENGTH + rng.gen_range(0..6);
        }

        if let Some(length) = knowledge.lengths().preferred_length() {
            return length;
        }

        if self.allow_length_peek
            && knowledge.lengths().average_reward() > REWARD_SIGNAL_THRESHOLD as f64
        {
            return target_length;
        }

        let variance: i64 = rng.gen_range(-1..=1);
        (target_length as i64 + variance).max(MIN_LENGTH as i64) as usize
    }

    /// Chooses the letter for one unlocked position.
    ///
    /// Candidates are scanned best-average first, excluding letters already
    /// placed in this guess. Every candidate considered has its reward stat
    /// updated; a correct candidate locks the position. After
    /// `MAX_POSITION_MISSES` incorrect candidates the globally
    /// lowest-average letter is placed regardless of correctness. Only the
    /// placed letter's delta counts toward the guess total.
    fn fill_position(
        &self,
        knowledge: &mut KnowledgeStore,
        target_letters: &[char],
        position: usize,
        used: u32,
        reward: &mut i64,
    ) -> char {
        let mut misses = 0;
        let mut tried: u32 = 0;

        loop {
            let letter = if misses >= MAX_POSITION_MISSES {
                knowledge.rewards().lowest_average_letter()
            } else {
                match knowledge.rewards().best_letter(used | tried) {
                    Some(letter) => letter,
                    None => knowledge.rewards().lowest_average_letter(),
                }
            };

            let delta = letter_delta(letter, position, target_letters);
            knowledge.rewards_mut().record(letter, delta);

            if delta == CORRECT_REWARD {
                knowledge.lock(position, letter);
                *reward += delta;
                return letter;
            }

            if misses >= MAX_POSITION_MISSES {
                *reward += delta;
                return letter;
            }

            misses += 1;
            tried |= letter_bit(letter);
        }
    }

    /// Swaps an exploratory letter into the word after a long dry spell.
    ///
    /// The replacement is the best-average letter not already in the word
    /// (falling back to the full alphabet if the word uses all 26), spliced
    /// over the position whose letter has the lowest average reward. Locked
    /// positions are never touched.
    fn escape_stagnation(&self, knowledge: &KnowledgeStore, word: &mut [char]) {
        let in_word = word.iter().fold(0_u32, |mask, &c| mask | letter_bit(c));
        let replacement = match knowledge
            .rewards()
            .best_letter(in_word)
            .or_else(|| knowledge.rewards().best_letter(0))
        {
            Some(letter) => letter,
            None => return,
        };

        let weakest = word
            .iter()
            .position_min_by(|a, b| {
                knowledge
                    .rewards()
                    .average(**a)
                    .total_cmp(&knowledge.rewards().average(**b))
            });

        if let Some(position) = weakest {
            if !knowledge.is_locked(position) {
                word[position] = replacement;
            }
        }
    }
}

fn letter_delta(letter: char, position: usize, target_letters: &[char]) -> i64 {
    if target_letters.get(position) == Some(&letter) {
        CORRECT_REWARD
    } else if target_letters.contains(&letter) {
        PRESENT_REWARD
    } else {
        ABSENT_PENALTY
    }
}

fn finalize(word: &[char]) -> String {
    word.iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}
