//! The mutable knowledge a guesser accumulates during a round.
//!
//! Everything the [generator](crate::generator) learns lives in an owned
//! [`KnowledgeStore`]: which positions are proven correct, how well each
//! letter has paid off historically, which word lengths have been rewarded,
//! and how long it has been since a guess improved on the best reward seen.
//! There are no process-wide singletons, so independent rounds simply hold
//! independent stores.

use std::collections::{BTreeMap, VecDeque};

/// Number of entries the word-length history retains before evicting.
pub const LENGTH_HISTORY_CAP: usize = 200;

/// Number of non-improving guesses before the stagnation escape fires.
pub const STAGNATION_THRESHOLD: u32 = 100;

/// Reward threshold above which a signal counts as "strong".
pub const REWARD_SIGNAL_THRESHOLD: i64 = 50;

const A_ASCII: usize = 0x61;

/// Returns the alphabet index of a lowercase ascii letter.
///
/// WARNING: this method WILL panic if you do not provide a lowercase ascii
/// alphabetic char.
pub(crate) fn letter_index(c: char) -> usize {
    if c.is_ascii_lowercase() {
        c as usize - A_ASCII
    } else {
        panic!("did not provide ascii lowercase letter")
    }
}

pub(crate) fn letter_at(index: usize) -> char {
    (A_ASCII + index) as u8 as char
}

pub(crate) fn letter_bit(c: char) -> u32 {
    1 << letter_index(c)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct LetterStat {
    total: i64,
    count: u64,
}

/// Per-letter reward accumulators over the lowercase ascii alphabet.
///
/// Each letter carries a running total and a count; its average is the
/// learning signal the generator selects on. Letters never seen average
/// 0.0, which keeps them neutral between rewarded and penalized letters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterRewards {
    stats: [LetterStat; 26],
}

impl LetterRewards {
    /// Adds a reward observation for `letter`.
    ///
    /// WARNING: this method WILL panic if you do not provide a lowercase
    /// ascii alphabetic char.
    pub fn record(&mut self, letter: char, delta: i64) {
        let stat = &mut self.stats[letter_index(letter)];
        stat.total += delta;
        stat.count += 1;
    }

    /// Returns the average reward for `letter`, or 0.0 if it was never seen.
    ///
    /// WARNING: this method WILL panic if you do not provide a lowercase
    /// ascii alphabetic char.
    pub fn average(&self, letter: char) -> f64 {
        let stat = self.stats[letter_index(letter)];
        if stat.count == 0 {
            0.0
        } else {
            stat.total as f64 / stat.count as f64
        }
    }

    /// Returns the letter with the highest average reward, skipping letters
    /// whose bit is set in `exclude`.
    ///
    /// Ties go to the first letter found scanning a–z, so with no reward
    /// data at all this degenerates to "first unused letter in alphabet
    /// order". Returns `None` only when every letter is excluded.
    pub fn best_letter(&self, exclude: u32) -> Option<char> {
        let mut best: Option<(char, f64)> = None;
        for index in 0..26 {
            if exclude & (1 << index) != 0 {
                continue;
            }
            let letter = letter_at(index);
            let average = self.average(letter);
            match best {
                Some((_, best_average)) if average <= best_average => {}
                _ => best = Some((letter, average)),
            }
        }
        best.map(|(letter, _)| letter)
    }

    /// Returns the letter with the lowest average reward over the full
    /// alphabet, ties going to the first scanning a–z.
    pub fn lowest_average_letter(&self) -> char {
        let mut worst = ('a', self.average('a'));
        for index in 1..26 {
            let letter = letter_at(index);
            let average = self.average(letter);
            if average < worst.1 {
                worst = (letter, average);
            }
        }
        worst.0
    }
}

/// A bounded FIFO history of `(guessed length, reward)` pairs.
///
/// Holds at most [`LENGTH_HISTORY_CAP`] entries; recording the next entry
/// evicts the oldest. The generator uses it to bias future length choices
/// toward lengths that have paid off.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LengthHistory {
    entries: VecDeque<(usize, i64)>,
}

impl LengthHistory {
    /// Appends an entry, evicting the oldest once the cap is reached.
    pub fn record(&mut self, length: usize, reward: i64) {
        if self.entries.len() == LENGTH_HISTORY_CAP {
            self.entries.pop_front();
        }
        self.entries.push_back((length, reward));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.entries.iter().copied()
    }

    /// Returns the first-seen length recorded with reward above 50 more than
    /// twice, or `None` if no length qualifies.
    pub fn preferred_length(&self) -> Option<usize> {
        let mut counts: Vec<(usize, u32)> = Vec::new();
        for (length, reward) in self.iter() {
            if reward > REWARD_SIGNAL_THRESHOLD {
                match counts.iter_mut().find(|(l, _)| *l == length) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((length, 1)),
                }
            }
        }
        counts
            .into_iter()
            .find(|&(_, count)| count > 2)
            .map(|(length, _)| length)
    }

    /// Returns the average reward across all entries, or 0.0 when empty.
    pub fn average_reward(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: i64 = self.iter().map(|(_, reward)| reward).sum();
        total as f64 / self.entries.len() as f64
    }
}

/// Tracking for the best guess reward seen and the dry spell since.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stagnation {
    best_reward: i64,
    since_improvement: u32,
}

impl Stagnation {
    /// Folds in the reward of one finished guess.
    ///
    /// A strict improvement records the new best and resets the counter.
    /// Otherwise the counter grows, and the moment it reaches
    /// [`STAGNATION_THRESHOLD`] this returns `true` and resets it to zero,
    /// whether or not the caller ends up acting on the escape.
    pub fn observe(&mut self, reward: i64) -> bool {
        if reward > self.best_reward {
            self.best_reward = reward;
            self.since_improvement = 0;
            return false;
        }

        self.since_improvement += 1;
        if self.since_improvement >= STAGNATION_THRESHOLD {
            self.since_improvement = 0;
            true
        } else {
            false
        }
    }

    pub fn best_reward(&self) -> i64 {
        self.best_reward
    }

    pub fn since_improvement(&self) -> u32 {
        self.since_improvement
    }
}

/// Everything the guesser knows, owned by one round.
///
/// The store is mutated in place across turns by the generator and turn
/// controller; it holds no interior mutability and is reset by constructing
/// a fresh one for the next round.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeStore {
    locked: BTreeMap<usize, char>,
    rewards: LetterRewards,
    lengths: LengthHistory,
    stagnation: Stagnation,
}

impl KnowledgeStore {
    /// Creates an empty store: nothing locked, no reward data, no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the letter locked at `position`, if any.
    pub fn locked_letter(&self, position: usize) -> Option<char> {
        self.locked.get(&position).copied()
    }

    /// Returns true if `position` has been proven correct.
    pub fn is_locked(&self, position: usize) -> bool {
        self.locked.contains_key(&position)
    }

    /// Locks `letter` at `position`.
    ///
    /// Locks only grow within a round; locking an already-locked position
    /// again is a no-op, since the letter there was proven correct.
    pub fn lock(&mut self, position: usize, letter: char) {
        self.locked.entry(position).or_insert(letter);
    }

    /// Positions proven correct so far, with their letters.
    pub fn locked_letters(&self) -> &BTreeMap<usize, char> {
        &self.locked
    }

    pub fn rewards(&self) -> &LetterRewards {
        &self.rewards
    }

    pub fn rewards_mut(&mut self) -> &mut LetterRewards {
        &mut self.rewards
    }

    pub fn lengths(&self) -> &LengthHistory {
        &self.lengths
    }

    pub fn lengths_mut(&mut self) -> &mut LengthHistory {
        &mut self.lengths
    }

    pub fn stagnation(&self) -> &Stagnation {
        &self.stagnation
    }

    pub fn stagnation_mut(&mut self) -> &mut Stagnation {
        &mut self.stagnation
    }
}
