//! Running rounds turn by turn.
//!
//! A [`Round`] owns one target word and one [`KnowledgeStore`]. An external
//! trigger calls [`start_guessing()`](Round::start_guessing()); a
//! display-refresh loop then calls [`frame()`](Round::frame()) once per
//! frame, which runs at most one turn while guessing is in process. Turns
//! are synchronous, but `frame()` still refuses to re-enter turn logic while
//! a turn is outstanding, so a frame callback firing from inside turn
//! handling cannot overlap another turn.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    feedback::{classify, Feedback},
    generator::{GeneratedGuess, Generator},
    knowledge::KnowledgeStore,
    Result, RoundError,
};

/// Where the turn state machine currently rests.
///
/// `Idle` means no guessing is in process. `GuessPending` means the next
/// frame will run a turn. `Evaluating` is only observable from within a
/// turn: generation has finished and classification has not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnState {
    Idle,
    GuessPending,
    Evaluating,
}

/// What one turn produced, for an external renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// The finalized guess word.
    pub word: String,

    /// Total reward the guess earned.
    pub reward: i64,

    /// Classification of the guess against the target.
    pub feedback: Feedback,

    /// True when this guess equaled the target exactly and ended the round.
    pub solved: bool,

    /// Number of guesses made so far, this one included.
    pub guess_count: u64,
}

/// A snapshot of a round's outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Summary {
    /// The normalized target word.
    pub target: String,

    /// Guesses made so far.
    pub guess_count: u64,

    /// Whether the target was found.
    pub solved: bool,

    /// The most recent guess, if any turn has run.
    pub final_guess: Option<String>,

    /// The best guess reward seen during the round.
    pub best_reward: i64,
}

/// One round of guessing against a hidden target word.
///
/// # Examples
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use wordmind::Round;
///
/// let mut round = Round::new("Ball")?;
/// let mut rng = StdRng::seed_from_u64(42);
///
/// round.start_guessing();
/// let solved = round.run(5000, &mut rng);
/// assert!(solved.is_some());
/// #
/// # Ok::<_, wordmind::WordmindError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Round {
    target: String,
    generator: Generator,
    knowledge: KnowledgeStore,
    state: TurnState,
    guess_count: u64,
    guessing_in_process: bool,
    turn_in_flight: bool,
    solved: bool,
    last_guess: Option<GeneratedGuess>,
    last_feedback: Option<Feedback>,
}

impl Round {
    /// Creates a round for `target` with a default [`Generator`].
    ///
    /// The target must be non-empty and ascii-alphabetic; it is normalized
    /// to first-letter-uppercase, rest-lowercase form, the same shape the
    /// generator emits, so win detection can use exact string equality.
    pub fn new(target: &str) -> Result<Self> {
        Self::with_generator(target, Generator::new())
    }

    /// Creates a round for `target` using a configured [`Generator`].
    pub fn with_generator(target: &str, generator: Generator) -> Result<Self> {
        if target.is_empty() {
            return Err(RoundError::EmptyTarget.into());
        }
        if !target.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RoundError::NotAlphabetic(target.to_string()).into());
        }

        Ok(Round {
            target: normalize(target),
            generator,
            knowledge: KnowledgeStore::new(),
            state: TurnState::Idle,
            guess_count: 0,
            guessing_in_process: false,
            turn_in_flight: false,
            solved: false,
            last_guess: None,
            last_feedback: None,
        })
    }

    /// Starts (or resumes) guessing; the next [`frame()`](Self::frame())
    /// call will run a turn.
    pub fn start_guessing(&mut self) {
        if !self.solved {
            self.guessing_in_process = true;
            self.state = TurnState::GuessPending;
        }
    }

    /// Stops guessing without a win; the external reset path.
    pub fn stop_guessing(&mut self) {
        self.guessing_in_process = false;
        self.state = TurnState::Idle;
    }

    /// Runs at most one turn, gated the way a display-refresh callback is.
    ///
    /// Returns `None` without touching any state when guessing is not in
    /// process or a turn is already outstanding.
    pub fn frame<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TurnReport> {
        if !self.guessing_in_process || self.turn_in_flight {
            return None;
        }

        self.turn_in_flight = true;
        let report = self.turn(rng);
        self.turn_in_flight = false;
        Some(report)
    }

    /// Runs one full turn: generate, classify, and check for the win.
    fn turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TurnReport {
        self.guess_count += 1;

        let guess = self
            .generator
            .next_guess(&mut self.knowledge, &self.target, rng);
        self.state = TurnState::Evaluating;

        let feedback = classify(&guess.word, &self.target);

        // Win detection is exact string equality, not feedback-based.
        let solved = guess.word == self.target;
        if solved {
            self.solved = true;
            self.guessing_in_process = false;
            self.state = TurnState::Idle;
        } else {
            self.state = TurnState::GuessPending;
        }

        let report = TurnReport {
            word: guess.word.clone(),
            reward: guess.reward,
            feedback: feedback.clone(),
            solved,
            guess_count: self.guess_count,
        };

        self.last_guess = Some(guess);
        self.last_feedback = Some(feedback);

        report
    }

    /// Drives the frame loop for up to `max_turns` turns.
    ///
    /// Returns the number of guesses it took to solve the round, or `None`
    /// if the budget ran out first.
    pub fn run<R: Rng + ?Sized>(&mut self, max_turns: usize, rng: &mut R) -> Option<u64> {
        for _ in 0..max_turns {
            match self.frame(rng) {
                Some(report) if report.solved => return Some(report.guess_count),
                Some(_) => {}
                None => return None,
            }
        }
        None
    }

    /// The normalized target word.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn guess_count(&self) -> u64 {
        self.guess_count
    }

    pub fn guessing_in_process(&self) -> bool {
        self.guessing_in_process
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    /// The most recent guess, for an external renderer.
    pub fn last_guess(&self) -> Option<&GeneratedGuess> {
        self.last_guess.as_ref()
    }

    /// The most recent classification, for an external renderer.
    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// The knowledge accumulated so far this round.
    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// Snapshots the round for reporting.
    pub fn summary(&self) -> Summary {
        Summary {
            target: self.target.clone(),
            guess_count: self.guess_count,
            solved: self.solved,
            final_guess: self.last_guess.as_ref().map(|g| g.word.clone()),
            best_reward: self.knowledge.stagnation().best_reward(),
        }
    }
}

fn normalize(target: &str) -> String {
    target
        .chars()
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

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::WordmindError;

    #[test]
    fn empty_target_fails_fast() {
        assert!(matches!(
            Round::new(""),
            Err(WordmindError::Round {
                kind: RoundError::EmptyTarget
            })
        ));
    }

    #[test]
    fn non_letter_target_fails_fast() {
        assert!(matches!(
            Round::new("b4ll"),
            Err(WordmindError::Round {
                kind: RoundError::NotAlphabetic(_)
            })
        ));
    }

    #[test]
    fn target_is_normalized() -> Result<()> {
        assert_eq!(Round::new("bALL")?.target(), "Ball");
        assert_eq!(Round::new("BALL")?.target(), "Ball");
        Ok(())
    }

    #[test]
    fn frames_are_inert_until_triggered() -> Result<()> {
        let mut round = Round::new("Ball")?;
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(round.state(), TurnState::Idle);
        assert!(round.frame(&mut rng).is_none());
        assert_eq!(round.guess_count(), 0);

        round.start_guessing();
        assert_eq!(round.state(), TurnState::GuessPending);
        assert!(round.frame(&mut rng).is_some());
        assert_eq!(round.guess_count(), 1);
        Ok(())
    }

    #[test]
    fn solves_ball_within_budget() -> Result<()> {
        let mut round = Round::new("Ball")?;
        let mut rng = StdRng::seed_from_u64(0);
        round.start_guessing();

        let mut solved_at = None;
        for _ in 0..5000 {
            let report = match round.frame(&mut rng) {
                Some(report) => report,
                None => break,
            };

            if report.solved {
                assert_eq!(report.word, "Ball");
                assert!(!round.guessing_in_process());
                solved_at = Some(report.guess_count);
                break;
            }

            // The in-process flag must stay set until the exact match.
            assert_ne!(report.word, "Ball");
            assert!(round.guessing_in_process());
        }

        assert!(solved_at.is_some(), "round never solved");
        assert_eq!(round.state(), TurnState::Idle);
        assert!(round.solved());
        Ok(())
    }

    #[test]
    fn winning_turn_reports_full_feedback() -> Result<()> {
        let mut round = Round::new("Cab")?;
        let mut rng = StdRng::seed_from_u64(9);
        round.start_guessing();

        let turns = round.run(5000, &mut rng);
        assert!(turns.is_some());

        let feedback = round.last_feedback().unwrap();
        assert_eq!(feedback.correct_positions, vec!['C', 'a', 'b']);
        assert!(feedback.wrong_positions.is_empty());
        assert!(feedback.exact_length());
        assert_eq!(round.last_guess().unwrap().word, "Cab");
        Ok(())
    }

    #[test]
    fn stop_guessing_halts_the_loop() -> Result<()> {
        let mut round = Round::new("Ball")?;
        let mut rng = StdRng::seed_from_u64(4);

        round.start_guessing();
        round.frame(&mut rng);
        round.stop_guessing();

        assert!(round.frame(&mut rng).is_none());
        assert_eq!(round.guess_count(), 1);
        assert_eq!(round.state(), TurnState::Idle);
        Ok(())
    }

    #[test]
    fn start_after_win_stays_idle() -> Result<()> {
        let mut round = Round::new("Cab")?;
        let mut rng = StdRng::seed_from_u64(2);
        round.start_guessing();
        round.run(5000, &mut rng).unwrap();

        round.start_guessing();
        assert!(!round.guessing_in_process());
        assert!(round.frame(&mut rng).is_none());
        Ok(())
    }

    #[test]
    fn summary_reflects_the_round() -> Result<()> {
        let mut round = Round::new("cab")?;
        let mut rng = StdRng::seed_from_u64(6);
        round.start_guessing();
        round.run(5000, &mut rng).unwrap();

        let summary = round.summary();
        assert_eq!(summary.target, "Cab");
        assert!(summary.solved);
        assert_eq!(summary.final_guess.as_deref(), Some("Cab"));
        assert_eq!(summary.guess_count, round.guess_count());
        assert!(summary.best_reward > 0);
        Ok(())
    }
}
