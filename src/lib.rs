#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod feedback;
pub use feedback::{classify, Feedback};

pub mod knowledge;
pub use knowledge::KnowledgeStore;

pub mod generator;
pub use generator::{GeneratedGuess, Generator};

pub mod round;
pub use round::Round;

/// A convenient result type for `wordmind` operations.
pub type Result<T> = std::result::Result<T, WordmindError>;

/// The errors that `wordmind` can produce.
#[derive(Debug, Error)]
pub enum WordmindError {
    #[error("round encountered error")]
    Round {
        #[from]
        kind: RoundError,
    },
}

/// Errors produced while configuring or running a round.
#[derive(Debug, Error)]
pub enum RoundError {
    /// The target word supplied to [`Round::new()`](round::Round::new()) was
    /// empty. The target comes from an external collaborator and must never
    /// be empty entering a round.
    #[error("the target word is empty")]
    EmptyTarget,

    /// The target word contains characters outside the ascii alphabet.
    #[error("the target word \"{0}\" contains non-letter characters")]
    NotAlphabetic(String),
}
